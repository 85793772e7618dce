pub mod gemini;
pub mod schema;

use crate::error::RecognitionError;
use crate::models::image::SelectedImage;
use crate::models::scan_record::RecognitionResult;
use async_trait::async_trait;

pub use gemini::GeminiClient;

/// Recognizer abstraction - one structured extraction per call, no retries.
#[async_trait]
pub trait PlateRecognizer: Send + Sync {
    async fn recognize(&self, image: &SelectedImage) -> Result<RecognitionResult, RecognitionError>;
}
