//! Allergy registrations.

use serde::{Deserialize, Serialize};

/// How strongly a user reacts to an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[serde(alias = "mild")]
    Mild,
    #[serde(alias = "moderate")]
    Moderate,
    #[serde(alias = "severe")]
    Severe,
}

/// An ingredient the user is allergic to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allergy {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    #[serde(alias = "ingredientName", alias = "ingredient_name")]
    pub ingredient: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// Request body for registering an allergy.
#[derive(Debug, Clone, Serialize)]
pub struct NewAllergy {
    pub ingredient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl NewAllergy {
    pub fn new(ingredient: impl Into<String>) -> Self {
        Self {
            ingredient: ingredient.into(),
            description: None,
            severity: None,
        }
    }
}
