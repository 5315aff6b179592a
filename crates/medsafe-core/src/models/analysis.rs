//! Symptom, side-effect and OCR analysis bodies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    Safe,
    Caution,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Request body for a symptom analysis.
#[derive(Debug, Clone, Serialize)]
pub struct SymptomRequest<'a> {
    pub symptom: &'a str,
}

/// Handle for an analysis that completes asynchronously on the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisTicket {
    #[serde(alias = "analysisId", deserialize_with = "super::id::string_or_number")]
    pub analysis_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedMedication {
    pub name: String,
    pub reason: String,
    pub safety_level: SafetyLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationToAvoid {
    pub name: String,
    pub reason: String,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSummary {
    pub total_risks: u32,
    pub high_risk_ingredients: Vec<String>,
    pub warnings: Vec<String>,
    pub gpt_analysis: String,
}

/// Result of a symptom analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomAnalysis {
    #[serde(default)]
    pub recommended_medications: Vec<RecommendedMedication>,
    #[serde(default)]
    pub medications_to_avoid: Vec<MedicationToAvoid>,
    #[serde(default)]
    pub risk_summary: RiskSummary,
}

/// Request body for a side-effect analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideEffectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub medication_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitiveIngredient {
    pub ingredient_name: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub severity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonSideEffectIngredient {
    pub ingredient_name: String,
    #[serde(default)]
    pub side_effect_description: String,
    #[serde(default)]
    pub frequency: String,
}

/// Result of a side-effect analysis across several medications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SideEffectAnalysis {
    pub common_ingredients: Vec<String>,
    pub user_sensitive_ingredients: Vec<SensitiveIngredient>,
    pub common_side_effect_ingredients: Vec<CommonSideEffectIngredient>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrStatus {
    Safe,
    Caution,
    HighRisk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrFindings {
    pub status: OcrStatus,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub matching_allergens: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub gpt_summary: String,
}

/// Result of analysing a photographed ingredient label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrAnalysis {
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub normalized_ingredients: Vec<String>,
    pub analysis: OcrFindings,
}
