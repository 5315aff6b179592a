//! Request and response bodies exchanged with the backend.
//!
//! These are the backend's contracts; the client only moves them around.
//! Fields the two backend generations name differently carry serde aliases.

mod allergy;
mod analysis;
mod auth;
mod community;
mod medicine;

pub use allergy::{Allergy, NewAllergy, Severity};
pub use analysis::{
    AnalysisTicket, CommonSideEffectIngredient, MedicationToAvoid, OcrAnalysis, OcrFindings,
    OcrStatus, RecommendedMedication, RiskLevel, RiskSummary, SafetyLevel, SensitiveIngredient,
    SideEffectAnalysis, SideEffectRequest, SymptomAnalysis, SymptomRequest,
};
pub use auth::{
    AuthResponse, ChangeNicknameRequest, ChangePasswordRequest, FindPasswordRequest,
    FindUsernameRequest, LoginOutput, MessageResponse, Profile, RefreshRequest, RefreshResponse,
};
pub use community::{
    Comment, CommentUpdate, ImageUpload, LikeStatus, NewComment, NewPost, Page, Post, PostUpdate,
};
pub use medicine::Medicine;

/// Identifiers arrive as strings from one backend and numbers from the other.
pub(crate) mod id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s,
            Raw::Int(n) => n.to_string(),
        })
    }

    pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Str(s)) => Some(s),
            Some(Raw::Int(n)) => Some(n.to_string()),
            None => None,
        })
    }
}
