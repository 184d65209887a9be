use async_trait::async_trait;

use crate::core::models::AnnotationResult;

/// Sends one image to a vision backend.
///
/// Implementations never return an error: every transport or parsing problem
/// is folded into `AnnotationResult::Failure`.
#[async_trait]
pub trait VisionAnnotationService: Send + Sync {
    async fn annotate(&self, image_bytes: &[u8]) -> AnnotationResult;
}
