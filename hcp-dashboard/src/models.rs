use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Body the backend attaches to application failures.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Literature,
    Risk,
    Cost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateRange {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "1year")]
    LastYear,
    #[serde(rename = "2years")]
    LastTwoYears,
    #[serde(rename = "5years")]
    LastFiveYears,
}

/// Filter selections accompanying a search. Only the specialty reaches the
/// backend; search type and date range stay in view state.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub specialty: Option<String>,
    pub search_type: SearchType,
    pub date_range: DateRange,
}

#[derive(Debug, Serialize)]
pub struct LiteratureSearchRequest {
    pub specialty: String,
    pub keywords: Vec<String>,
    pub patient_conditions: Vec<String>,
    pub max_results: u32,
    pub enable_ai_analysis: bool,
    pub ai_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub publication_date: String,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub clinical_implications: Vec<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

/// Literature search response. Studies live either under `data.studies` or
/// at the top level, depending on the backend version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiteratureResponse {
    #[serde(default)]
    pub data: Option<LiteratureData>,
    #[serde(default)]
    pub studies: Option<Vec<SearchResult>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiteratureData {
    #[serde(default)]
    pub studies: Option<Vec<SearchResult>>,
    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,
}

impl LiteratureResponse {
    pub fn into_studies_and_summary(self) -> (Vec<SearchResult>, Option<String>) {
        let LiteratureResponse { data, studies } = self;
        let (nested, summary) = match data {
            Some(data) => (data.studies, data.ai_analysis.and_then(|a| a.summary)),
            None => (None, None),
        };
        (nested.or(studies).unwrap_or_default(), summary)
    }
}

#[derive(Debug, Serialize)]
pub struct RiskRequest {
    pub patient_data: RiskPatientData,
    pub model_type: String,
}

#[derive(Debug, Serialize)]
pub struct RiskPatientData {
    pub age: u32,
    pub systolic_bp: u32,
    pub glucose: u32,
    pub cholesterol: u32,
    pub bmi: u32,
    pub smoking: u8,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskAssessment {
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub method: String,
}

#[derive(Debug, Serialize)]
pub struct CostRequest {
    pub patient_data: CostPatientData,
    pub model_type: String,
}

#[derive(Debug, Serialize)]
pub struct CostPatientData {
    pub age: u32,
    pub systolic_bp: u32,
    pub proposed_treatments: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostAnalysis {
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub cost_efficiency: String,
    #[serde(default)]
    pub cost_breakdown: CostBreakdown,
    #[serde(default)]
    pub method: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CostBreakdown {
    #[serde(default)]
    pub base_visit: f64,
    #[serde(default)]
    pub procedures: f64,
    #[serde(default)]
    pub complexity_factor: f64,
}

#[derive(Debug, Serialize)]
pub struct PopulationRequest {
    pub patients: Vec<CohortPatient>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CohortPatient {
    pub age: u32,
    pub systolic_bp: u32,
    pub glucose: u32,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopulationAnalysis {
    #[serde(default)]
    pub average_age: f64,
    #[serde(default)]
    pub risk_distribution: HashMap<String, f64>,
    #[serde(default)]
    pub common_conditions: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub analysis_type: String,
    pub model: String,
    pub context: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub data: Option<AnalyzeData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeData {
    #[serde(default)]
    pub analysis: Option<String>,
}

impl AnalyzeResponse {
    /// The generated text, or `None` when the backend returned nothing
    /// usable.
    pub fn analysis_text(self) -> Option<String> {
        self.data
            .and_then(|data| data.analysis)
            .filter(|text| !text.trim().is_empty())
    }
}
