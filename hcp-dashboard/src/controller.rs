use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::error::{DashboardError, Result};
use crate::models::{
    AnalyzeRequest, CohortPatient, CostAnalysis, CostPatientData, CostRequest,
    LiteratureSearchRequest, PopulationAnalysis, PopulationRequest, RiskAssessment,
    RiskPatientData, RiskRequest, SearchFilters, SearchResult, UserProfile,
};
use crate::session::{Session, SessionStore};
use crate::terms;

/// Model requested for every AI-assisted call.
pub const AI_MODEL: &str = "llama-3.1-8b-instant";

/// Everything the dashboard renders. Each search replaces `results`
/// wholesale; the analytics slots fill independently and keep their last
/// value when a refresh fails.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub results: Vec<SearchResult>,
    pub risk: Option<RiskAssessment>,
    pub cost: Option<CostAnalysis>,
    pub population: Option<PopulationAnalysis>,
    pub ai_summary: Option<String>,
    pub search_tags: Vec<String>,
}

/// Sequences the dashboard's upstream calls and owns the view state they
/// populate. One instance per signed-in terminal.
pub struct DashboardController {
    api: ApiClient,
    sessions: Arc<dyn SessionStore>,
    state: RwLock<ViewState>,
    // Bumped at every search entry; in-flight responses from older searches
    // are discarded when the counter has moved on.
    generation: AtomicU64,
}

impl DashboardController {
    pub fn new(api: ApiClient, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            sessions,
            state: RwLock::new(ViewState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current view state.
    pub async fn view(&self) -> ViewState {
        self.state.read().await.clone()
    }

    pub async fn current_session(&self) -> Result<Option<Session>> {
        self.sessions.load().await
    }

    async fn require_session(&self) -> Result<Session> {
        self.sessions
            .load()
            .await?
            .ok_or(DashboardError::NotAuthenticated)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile> {
        match self.api.login(username, password).await {
            Ok(response) => {
                self.sessions
                    .save(Session {
                        token: response.access_token,
                        user: response.user.clone(),
                    })
                    .await?;
                info!("Login succeeded for {}", response.user.username);
                Ok(response.user)
            }
            Err(DashboardError::Transport(e)) => {
                error!("Login request failed at the transport layer: {}", e);
                // Probe the proxied health endpoint to tell an unreachable
                // backend from a request-level failure, like the browser
                // build did.
                match self.api.health().await {
                    Ok(_) => warn!("Backend is reachable; the login request itself failed"),
                    Err(health_err) => error!("Health probe failed as well: {}", health_err),
                }
                Err(DashboardError::Connection(connection_message(&e)))
            }
            Err(other) => Err(other),
        }
    }

    pub async fn logout(&self) -> Result<()> {
        self.sessions.clear().await?;
        info!("Session cleared");
        Ok(())
    }

    /// Run the full search pipeline: literature, then the three analytics
    /// calls, then the AI summary. Failures past the literature call are
    /// logged and leave their own slot untouched.
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Result<ViewState> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DashboardError::EmptyQuery);
        }
        let session = self.require_session().await?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.write().await;
            state.ai_summary = None;
            if !state.search_tags.iter().any(|tag| tag == query) {
                state.search_tags.push(query.to_string());
            }
        }

        if let Err(e) = self.api.health().await {
            error!("Backend health check failed, abandoning search: {}", e);
            return Ok(self.view().await);
        }

        let keywords = terms::extract_keywords(query);
        let conditions = terms::match_conditions(query);
        info!(
            "Searching literature: keywords {:?}, conditions {:?}",
            keywords, conditions
        );

        let request = LiteratureSearchRequest {
            specialty: filters
                .specialty
                .clone()
                .unwrap_or_else(|| "General Medicine".to_string()),
            keywords,
            patient_conditions: conditions.clone(),
            max_results: 10,
            enable_ai_analysis: true,
            ai_model: AI_MODEL.to_string(),
        };

        let embedded_summary = match self.api.search_literature(&request, &session.token).await {
            Ok(response) => {
                let (studies, summary) = response.into_studies_and_summary();
                if self.is_stale(generation) {
                    debug!("Discarding stale literature response (generation {})", generation);
                    return Ok(self.view().await);
                }
                info!("Literature search returned {} studies", studies.len());
                let mut state = self.state.write().await;
                state.results = studies;
                state.ai_summary = summary.clone();
                summary
            }
            Err(e) => {
                error!("Literature search failed: {}", e);
                if self.is_stale(generation) {
                    return Ok(self.view().await);
                }
                self.state.write().await.results = Vec::new();
                None
            }
        };

        self.fetch_analytics(&session, &conditions, generation).await;

        if self.is_stale(generation) {
            debug!("Discarding stale search (generation {})", generation);
            return Ok(self.view().await);
        }

        // Only fall back to ai/analyze when the literature response did not
        // already embed a summary.
        if embedded_summary.is_none() {
            self.generate_summary(&session, generation).await;
        }

        Ok(self.view().await)
    }

    async fn fetch_analytics(&self, session: &Session, conditions: &[String], generation: u64) {
        match self
            .api
            .predict_risk(&baseline::risk_request(conditions), &session.token)
            .await
        {
            Ok(assessment) if !self.is_stale(generation) => {
                self.state.write().await.risk = Some(assessment);
            }
            Ok(_) => debug!("Discarding stale risk response"),
            Err(e) => error!("Risk assessment failed: {}", e),
        }

        match self
            .api
            .predict_cost(&baseline::cost_request(), &session.token)
            .await
        {
            Ok(analysis) if !self.is_stale(generation) => {
                self.state.write().await.cost = Some(analysis);
            }
            Ok(_) => debug!("Discarding stale cost response"),
            Err(e) => error!("Cost analysis failed: {}", e),
        }

        match self
            .api
            .population_trends(&baseline::population_request(conditions), &session.token)
            .await
        {
            Ok(analysis) if !self.is_stale(generation) => {
                self.state.write().await.population = Some(analysis);
            }
            Ok(_) => debug!("Discarding stale population response"),
            Err(e) => error!("Population analysis failed: {}", e),
        }
    }

    async fn generate_summary(&self, session: &Session, generation: u64) {
        let digest = build_digest(&self.view().await);
        if digest.is_empty() {
            debug!("Nothing to summarize");
            return;
        }

        let request = AnalyzeRequest {
            text: digest,
            analysis_type: "summary".to_string(),
            model: AI_MODEL.to_string(),
            context: "AI summary for HCP dashboard combining literature search and analytics"
                .to_string(),
        };

        match self.api.analyze(&request, &session.token).await {
            Ok(response) => {
                let analysis = response.analysis_text();
                if self.is_stale(generation) {
                    debug!("Discarding stale summary response");
                    return;
                }
                self.state.write().await.ai_summary = analysis;
            }
            Err(e) => error!("AI summary failed: {}", e),
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}

fn connection_message(error: &reqwest::Error) -> String {
    let detail = error.to_string();
    if detail.contains("CORS") {
        "CORS error: the API is running but blocked the request.".to_string()
    } else if error.is_connect() || detail.contains("NetworkError") {
        "Network error: cannot connect to the API. Check that the relay and backend are running."
            .to_string()
    } else {
        format!("Connection error: {}", detail)
    }
}

/// Compact textual digest of the current view state, the payload for the
/// fallback `ai/analyze` call.
pub fn build_digest(state: &ViewState) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !state.results.is_empty() {
        lines.push(format!("Top {} studies:", state.results.len().min(5)));
        for (i, study) in state.results.iter().take(5).enumerate() {
            lines.push(format!(
                "{}. {} ({}, {})\nAbstract: {}",
                i + 1,
                study.title,
                study.journal,
                study.publication_date,
                study.abstract_text
            ));
        }
    }
    if let Some(risk) = &state.risk {
        lines.push(format!(
            "Risk Assessment -> Level: {}, Score: {}, Factors: {}",
            risk.risk_level,
            risk.risk_score,
            risk.risk_factors.join(", ")
        ));
    }
    if let Some(cost) = &state.cost {
        lines.push(format!(
            "Cost Analysis -> Estimated cost: ${}, Efficiency: {}",
            cost.estimated_cost, cost.cost_efficiency
        ));
    }
    if let Some(population) = &state.population {
        let regions: Vec<&str> = population
            .risk_distribution
            .keys()
            .map(|level| level.as_str())
            .collect();
        lines.push(format!(
            "Population -> Risk distribution regions: {}",
            regions.join(", ")
        ));
    }

    lines.join("\n\n")
}

/// Baseline synthetic patient attributes for the analytics calls. The query
/// only contributes the matched conditions; the demographics stay fixed.
mod baseline {
    use super::*;

    pub fn risk_request(conditions: &[String]) -> RiskRequest {
        RiskRequest {
            patient_data: RiskPatientData {
                age: 65,
                systolic_bp: 150,
                glucose: 130,
                cholesterol: 260,
                bmi: 32,
                smoking: 1,
                conditions: conditions.to_vec(),
            },
            model_type: "risk".to_string(),
        }
    }

    pub fn cost_request() -> CostRequest {
        CostRequest {
            patient_data: CostPatientData {
                age: 65,
                systolic_bp: 150,
                proposed_treatments: vec![
                    "medication".to_string(),
                    "lab".to_string(),
                    "consultation".to_string(),
                ],
            },
            model_type: "cost".to_string(),
        }
    }

    pub fn population_request(conditions: &[String]) -> PopulationRequest {
        let cohort = [(45, 120, 100), (65, 150, 130), (35, 110, 90), (55, 140, 115)];
        PopulationRequest {
            patients: cohort
                .iter()
                .map(|&(age, systolic_bp, glucose)| CohortPatient {
                    age,
                    systolic_bp,
                    glucose,
                    conditions: conditions.to_vec(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClientConfig;
    use crate::session::InMemorySessionStore;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn controller_for(server_uri: &str) -> (Arc<DashboardController>, Arc<InMemorySessionStore>) {
        let api = ApiClient::new(ApiClientConfig {
            relay_url: server_uri.to_string(),
        });
        let store = Arc::new(InMemorySessionStore::new());
        let controller = Arc::new(DashboardController::new(api, store.clone()));
        (controller, store)
    }

    async fn seed_session(store: &InMemorySessionStore) {
        store
            .save(Session {
                token: "tok-1".to_string(),
                user: UserProfile {
                    username: "demo_provider".to_string(),
                    role: "provider".to_string(),
                    specialty: None,
                },
            })
            .await
            .unwrap();
    }

    async fn mount_health(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/proxy/health"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ok" })),
            )
            .mount(server)
            .await;
    }

    fn study(id: &str, title: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "journal": "NEJM",
            "publication_date": "2024-01-15",
            "relevance_score": 0.9,
            "abstract": "Study abstract.",
            "authors": ["Doe J"],
            "source": "pubmed"
        })
    }

    async fn mount_analytics(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/proxy/analytics/predict-risk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "risk_score": 0.7,
                "risk_level": "high",
                "risk_factors": ["smoking", "hypertension"],
                "confidence": 0.8,
                "method": "gradient_boosting"
            })))
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/analytics/predict-cost"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "estimated_cost": 1250.0,
                "cost_efficiency": "medium",
                "cost_breakdown": { "base_visit": 150.0, "procedures": 900.0, "complexity_factor": 1.3 },
                "method": "regression"
            })))
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/analytics/population-trends"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "average_age": 50.0,
                "risk_distribution": { "high": 1.0, "medium": 2.0, "low": 1.0 },
                "common_conditions": {},
                "timestamp": "2024-01-15T10:00:00Z"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn login_stores_session_and_returns_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/proxy/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-9",
                "user": { "username": "demo_admin", "role": "admin", "specialty": "Oncology" }
            })))
            .mount(&server)
            .await;

        let (controller, store) = controller_for(&server.uri());
        let profile = controller.login("demo_admin", "admin123").await.unwrap();

        assert_eq!(profile.username, "demo_admin");
        let session = store.load().await.unwrap().unwrap();
        assert_eq!(session.token, "tok-9");
        assert_eq!(session.user.specialty.as_deref(), Some("Oncology"));
    }

    #[tokio::test]
    async fn rejected_login_stores_nothing_and_surfaces_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/proxy/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Invalid credentials"
            })))
            .mount(&server)
            .await;

        let (controller, store) = controller_for(&server.uri());
        let err = controller.login("demo_admin", "wrong").await.unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unreachable_relay_maps_to_connection_error() {
        let (controller, store) = controller_for("http://127.0.0.1:9");
        let err = controller.login("demo_admin", "admin123").await.unwrap_err();

        assert!(matches!(err, DashboardError::Connection(_)));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_without_session_is_rejected() {
        let server = MockServer::start().await;
        let (controller, _store) = controller_for(&server.uri());

        let err = controller
            .search("heart failure", &SearchFilters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::NotAuthenticated));
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let server = MockServer::start().await;
        let (controller, store) = controller_for(&server.uri());
        seed_session(&store).await;

        let err = controller
            .search("   ", &SearchFilters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::EmptyQuery));
    }

    #[tokio::test]
    async fn search_populates_results_analytics_and_summary() {
        let server = MockServer::start().await;
        mount_health(&server).await;
        mount_analytics(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/literature/search"))
            .and(body_partial_json(serde_json::json!({
                "specialty": "Cardiology",
                "keywords": ["heart", "failure", "treatment"],
                "patient_conditions": ["heart failure"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "studies": [study("s-1", "SGLT2 inhibitors in HFrEF")] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/ai/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "analysis": "Generated summary." }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (controller, store) = controller_for(&server.uri());
        seed_session(&store).await;

        let filters = SearchFilters {
            specialty: Some("Cardiology".to_string()),
            ..SearchFilters::default()
        };
        let state = controller
            .search("heart failure treatment", &filters)
            .await
            .unwrap();

        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].id, "s-1");
        assert_eq!(state.risk.as_ref().unwrap().risk_level, "high");
        assert_eq!(state.cost.as_ref().unwrap().cost_efficiency, "medium");
        assert_eq!(state.population.as_ref().unwrap().average_age, 50.0);
        assert_eq!(state.ai_summary.as_deref(), Some("Generated summary."));
        assert_eq!(state.search_tags, vec!["heart failure treatment"]);
    }

    #[tokio::test]
    async fn embedded_summary_suppresses_analyze_call() {
        let server = MockServer::start().await;
        mount_health(&server).await;
        mount_analytics(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/literature/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "studies": [study("s-1", "Trial A")],
                    "ai_analysis": { "summary": "Embedded summary." }
                }
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/ai/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let (controller, store) = controller_for(&server.uri());
        seed_session(&store).await;

        let state = controller
            .search("diabetes management", &SearchFilters::default())
            .await
            .unwrap();
        assert_eq!(state.ai_summary.as_deref(), Some("Embedded summary."));
    }

    #[tokio::test]
    async fn population_failure_leaves_other_panels_renderable() {
        let server = MockServer::start().await;
        mount_health(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/literature/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "studies": [study("s-1", "Trial A")] }
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/analytics/predict-risk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "risk_score": 0.4, "risk_level": "medium"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/analytics/predict-cost"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "estimated_cost": 900.0, "cost_efficiency": "high"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/analytics/population-trends"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "message": "model unavailable"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/ai/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "analysis": "Partial summary." }
            })))
            .mount(&server)
            .await;

        let (controller, store) = controller_for(&server.uri());
        seed_session(&store).await;

        let state = controller
            .search("hypertension guidelines", &SearchFilters::default())
            .await
            .unwrap();

        assert!(state.risk.is_some());
        assert!(state.cost.is_some());
        assert!(state.population.is_none());
        assert_eq!(state.ai_summary.as_deref(), Some("Partial summary."));
    }

    #[tokio::test]
    async fn failed_literature_search_clears_results() {
        let server = MockServer::start().await;
        mount_health(&server).await;
        mount_analytics(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/literature/search"))
            .respond_with(ResponseTemplate::new(502).set_body_json(serde_json::json!({
                "message": "search backend down"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/ai/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "analysis": "Analytics-only summary." }
            })))
            .mount(&server)
            .await;

        let (controller, store) = controller_for(&server.uri());
        seed_session(&store).await;

        let state = controller
            .search("stroke prevention", &SearchFilters::default())
            .await
            .unwrap();

        assert!(state.results.is_empty());
        assert!(state.risk.is_some());
    }

    #[tokio::test]
    async fn unhealthy_backend_abandons_search() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/proxy/health"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "status": "down"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/literature/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let (controller, store) = controller_for(&server.uri());
        seed_session(&store).await;

        let state = controller
            .search("diabetes management", &SearchFilters::default())
            .await
            .unwrap();
        assert!(state.results.is_empty());
    }

    #[tokio::test]
    async fn superseded_search_is_discarded() {
        let server = MockServer::start().await;
        mount_health(&server).await;
        mount_analytics(&server).await;

        // The first search's literature response arrives late.
        Mock::given(method("POST"))
            .and(path("/api/proxy/literature/search"))
            .and(body_partial_json(serde_json::json!({ "keywords": ["slow", "query"] })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "data": { "studies": [study("slow-1", "Stale study")] }
                    }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/proxy/literature/search"))
            .and(body_partial_json(serde_json::json!({ "keywords": ["fast", "query"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "studies": [study("fast-1", "Fresh study")],
                    "ai_analysis": { "summary": "Fresh summary." }
                }
            })))
            .mount(&server)
            .await;

        let (controller, store) = controller_for(&server.uri());
        seed_session(&store).await;

        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .search("slow query", &SearchFilters::default())
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller
            .search("fast query", &SearchFilters::default())
            .await
            .unwrap();
        slow.await.unwrap().unwrap();

        let state = controller.view().await;
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].id, "fast-1");
        assert_eq!(state.ai_summary.as_deref(), Some("Fresh summary."));
        assert_eq!(state.search_tags, vec!["slow query", "fast query"]);
    }

    #[test]
    fn digest_includes_only_populated_sections() {
        let mut state = ViewState::default();
        assert!(build_digest(&state).is_empty());

        state.results = vec![SearchResult {
            id: "s-1".to_string(),
            title: "Trial A".to_string(),
            journal: "NEJM".to_string(),
            publication_date: "2024-01-15".to_string(),
            relevance_score: 0.9,
            abstract_text: "Abstract text.".to_string(),
            url: None,
            authors: vec![],
            source: "pubmed".to_string(),
        }];
        state.risk = Some(RiskAssessment {
            risk_score: 0.7,
            risk_level: "high".to_string(),
            risk_factors: vec!["smoking".to_string()],
            confidence: 0.8,
            method: "gb".to_string(),
        });

        let digest = build_digest(&state);
        assert!(digest.starts_with("Top 1 studies:"));
        assert!(digest.contains("Trial A (NEJM, 2024-01-15)"));
        assert!(digest.contains("Risk Assessment -> Level: high"));
        assert!(!digest.contains("Cost Analysis"));
        assert!(!digest.contains("Population"));
    }

    #[test]
    fn digest_caps_studies_at_five() {
        let mut state = ViewState::default();
        state.results = (0..8)
            .map(|i| SearchResult {
                id: format!("s-{i}"),
                title: format!("Study {i}"),
                journal: String::new(),
                publication_date: String::new(),
                relevance_score: 0.0,
                abstract_text: String::new(),
                url: None,
                authors: vec![],
                source: String::new(),
            })
            .collect();

        let digest = build_digest(&state);
        assert!(digest.starts_with("Top 5 studies:"));
        assert!(digest.contains("Study 4"));
        assert!(!digest.contains("Study 5"));
    }
}
