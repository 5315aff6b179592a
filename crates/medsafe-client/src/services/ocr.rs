//! Label photo analysis.

use std::path::Path;

use tracing::{debug, instrument};

use medsafe_core::error::InvalidInputError;
use medsafe_core::models::OcrAnalysis;
use medsafe_core::{MultipartForm, Result, Transport};

use crate::client::ApiClient;
use crate::http::endpoints;

const IMAGE_FIELD: &str = "image";

impl<T: Transport> ApiClient<T> {
    /// Upload a photo of an ingredient label for OCR and allergen matching.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn analyze_image(&self, filename: &str, bytes: Vec<u8>) -> Result<OcrAnalysis> {
        if bytes.is_empty() {
            return Err(InvalidInputError::Other {
                message: format!("image '{}' is empty", filename),
            }
            .into());
        }
        let form = MultipartForm::new().file(IMAGE_FIELD, filename, bytes);
        let analysis: OcrAnalysis = self.upload(endpoints::OCR_ANALYZE, form).await?;
        debug!(status = ?analysis.analysis.status, "Image analyzed");
        Ok(analysis)
    }

    /// Read an image from disk and analyze it.
    pub async fn analyze_image_file(&self, path: impl AsRef<Path>) -> Result<OcrAnalysis> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| InvalidInputError::Other {
            message: format!("{}: {}", path.display(), e),
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.jpg".to_string());
        self.analyze_image(&filename, bytes).await
    }
}
