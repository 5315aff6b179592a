//! Medicine lookup.

use serde::Serialize;
use tracing::instrument;

use medsafe_core::error::InvalidInputError;
use medsafe_core::models::Medicine;
use medsafe_core::{Result, Transport};

use crate::client::ApiClient;
use crate::http::endpoints::{self, MEDICINE};

#[derive(Serialize)]
struct BatchSearch<'a> {
    names: &'a [String],
}

impl<T: Transport> ApiClient<T> {
    #[instrument(skip(self))]
    pub async fn search_medicines(&self, keyword: &str) -> Result<Vec<Medicine>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(InvalidInputError::Other {
                message: "search keyword must not be empty".to_string(),
            }
            .into());
        }
        self.get_with_query(endpoints::MEDICINE_SEARCH, &[("keyword", keyword.to_string())])
            .await
    }

    #[instrument(skip(self))]
    pub async fn medicine(&self, id: &str) -> Result<Medicine> {
        self.get(&endpoints::path(&[MEDICINE, id])).await
    }

    /// Look up several medicines by name in one call.
    #[instrument(skip(self), fields(count = names.len()))]
    pub async fn search_medicines_batch(&self, names: &[String]) -> Result<Vec<Medicine>> {
        self.post(endpoints::MEDICATIONS_BATCH, &BatchSearch { names })
            .await
    }
}
