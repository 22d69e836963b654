use reqwest::Response;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DashboardError, Result};
use crate::models::{
    AnalyzeRequest, AnalyzeResponse, ApiErrorBody, CostAnalysis, CostRequest,
    LiteratureSearchRequest, LiteratureResponse, LoginRequest, LoginResponse, PopulationAnalysis,
    PopulationRequest, RiskAssessment, RiskRequest,
};

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub relay_url: String,
}

impl ApiClientConfig {
    /// Read the relay origin from `RELAY_URL`, falling back to the local
    /// dev default.
    pub fn from_env() -> Self {
        let relay_url =
            std::env::var("RELAY_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self { relay_url }
    }
}

/// Typed client for the upstream operations, addressed through the relay's
/// `/api/proxy` surface.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.relay_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/proxy/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("auth/login"))
            .json(&request)
            .send()
            .await?;
        read_json(response, "Login failed").await
    }

    pub async fn health(&self) -> Result<Value> {
        let response = self.http.get(self.url("health")).send().await?;
        read_json(response, "Health check failed").await
    }

    pub async fn search_literature(
        &self,
        request: &LiteratureSearchRequest,
        token: &str,
    ) -> Result<LiteratureResponse> {
        self.post_authorized("literature/search", request, token, "Literature search failed")
            .await
    }

    pub async fn predict_risk(&self, request: &RiskRequest, token: &str) -> Result<RiskAssessment> {
        self.post_authorized("analytics/predict-risk", request, token, "Risk prediction failed")
            .await
    }

    pub async fn predict_cost(&self, request: &CostRequest, token: &str) -> Result<CostAnalysis> {
        self.post_authorized("analytics/predict-cost", request, token, "Cost prediction failed")
            .await
    }

    pub async fn population_trends(
        &self,
        request: &PopulationRequest,
        token: &str,
    ) -> Result<PopulationAnalysis> {
        self.post_authorized(
            "analytics/population-trends",
            request,
            token,
            "Population trends failed",
        )
        .await
    }

    pub async fn analyze(&self, request: &AnalyzeRequest, token: &str) -> Result<AnalyzeResponse> {
        self.post_authorized("ai/analyze", request, token, "AI analysis failed")
            .await
    }

    async fn post_authorized<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: &str,
        fallback: &str,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        read_json(response, fallback).await
    }
}

/// Success bodies deserialize into the caller's type. Application failures
/// carry the status and whatever `message` the body held, so the caller can
/// show the backend's own wording.
async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| fallback.to_string());
    Err(DashboardError::Api { status, message })
}
