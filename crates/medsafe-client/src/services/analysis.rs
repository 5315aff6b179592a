//! Symptom and side-effect analysis.

use tracing::{debug, instrument};

use medsafe_core::models::{
    AnalysisTicket, SideEffectAnalysis, SideEffectRequest, SymptomAnalysis, SymptomRequest,
};
use medsafe_core::{Result, Transport};

use crate::client::ApiClient;
use crate::http::endpoints::{self, ANALYSIS};

impl<T: Transport> ApiClient<T> {
    /// Submit a symptom description. The analysis runs server-side; fetch it
    /// with [`ApiClient::analysis_result`].
    #[instrument(skip(self, symptom))]
    pub async fn request_symptom_analysis(&self, symptom: &str) -> Result<AnalysisTicket> {
        let ticket: AnalysisTicket = self
            .post(endpoints::ANALYSIS_SYMPTOM, &SymptomRequest { symptom })
            .await?;
        debug!(analysis_id = %ticket.analysis_id, "Symptom analysis requested");
        Ok(ticket)
    }

    #[instrument(skip(self))]
    pub async fn analysis_result(&self, analysis_id: &str) -> Result<SymptomAnalysis> {
        self.get(&endpoints::path(&[ANALYSIS, analysis_id])).await
    }

    #[instrument(skip(self, request), fields(count = request.medication_names.len()))]
    pub async fn analyze_side_effects(
        &self,
        request: &SideEffectRequest,
    ) -> Result<SideEffectAnalysis> {
        self.post(endpoints::ANALYSIS_SIDE_EFFECT, request).await
    }
}
