//! Medicine search results.

use serde::{Deserialize, Serialize};

/// A medicine as returned by search and detail lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    #[serde(default, deserialize_with = "super::id::opt_string_or_number")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, alias = "manufacturer")]
    pub company: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}
