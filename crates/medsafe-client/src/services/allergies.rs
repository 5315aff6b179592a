//! Registered allergy ingredients.

use tracing::{debug, instrument};

use medsafe_core::models::{Allergy, NewAllergy};
use medsafe_core::{Result, Transport};

use crate::client::ApiClient;
use crate::http::endpoints::{self, ALLERGIES};

impl<T: Transport> ApiClient<T> {
    #[instrument(skip(self))]
    pub async fn list_allergies(&self) -> Result<Vec<Allergy>> {
        let allergies: Vec<Allergy> = self.get(&endpoints::path(&[ALLERGIES])).await?;
        debug!(count = allergies.len(), "Listed allergies");
        Ok(allergies)
    }

    #[instrument(skip(self), fields(ingredient = %allergy.ingredient))]
    pub async fn add_allergy(&self, allergy: &NewAllergy) -> Result<Allergy> {
        self.post(&endpoints::path(&[ALLERGIES]), allergy).await
    }

    #[instrument(skip(self))]
    pub async fn remove_allergy(&self, id: &str) -> Result<()> {
        self.delete(&endpoints::path(&[ALLERGIES, id])).await
    }
}
