use std::sync::Arc;
use uuid::Uuid;

use super::{result_interpreter, BatchCancellation};
use crate::core::interfaces::adapters::VisionAnnotationService;
use crate::core::interfaces::ports::BoundingBoxRenderer;
use crate::core::models::{AnnotationResult, ImageBuffer, ImageOutcome, ImageReport, ImageUpload};

pub struct AnnotationOrchestrator {
    annotation_service: Arc<dyn VisionAnnotationService>,
    box_renderer: Arc<dyn BoundingBoxRenderer>,
}

impl AnnotationOrchestrator {
    pub fn build(
        annotation_service: Arc<dyn VisionAnnotationService>,
        box_renderer: Arc<dyn BoundingBoxRenderer>,
    ) -> Self {
        Self {
            annotation_service,
            box_renderer,
        }
    }

    /// Decode, annotate and interpret a single upload. Never fails: every
    /// problem ends up in the returned outcome.
    pub async fn process_image(&self, upload: ImageUpload) -> ImageOutcome {
        let image = match ImageBuffer::decode(upload.file_name, upload.bytes) {
            Ok(image) => image,
            Err(error) => {
                log::warn!("[ORCHESTRATOR] Rejected upload: {:#}", error);
                return ImageOutcome::Failed {
                    message: format!("{:#}", error),
                };
            }
        };
        log::info!(
            "[ORCHESTRATOR] Annotating {} ({:?}, {}x{})",
            image.file_name(),
            image.format(),
            image.width(),
            image.height()
        );

        match self.annotation_service.annotate(image.encoded_bytes()).await {
            AnnotationResult::Success(annotations) => {
                let view = result_interpreter::interpret(&annotations, &image, self.box_renderer.as_ref());
                ImageOutcome::Annotated {
                    view,
                    raw_response: annotations.raw_response,
                }
            }
            AnnotationResult::Failure { message } => ImageOutcome::Failed { message },
        }
    }

    /// Processes uploads one after another. `on_report` sees each report as
    /// soon as its image is done.
    pub async fn process_batch<F>(
        &self,
        uploads: Vec<ImageUpload>,
        cancellation: &BatchCancellation,
        mut on_report: F,
    ) -> Vec<ImageReport>
    where
        F: FnMut(&ImageReport),
    {
        log::info!("[ORCHESTRATOR] Processing batch of {} images", uploads.len());
        let mut reports = Vec::with_capacity(uploads.len());

        for upload in uploads {
            let job_id = Uuid::new_v4();
            let file_name = upload.file_name.clone();
            log::info!("[ORCHESTRATOR] [{}] Starting {}", job_id, file_name);

            let outcome = if cancellation.is_batch_cancelled() {
                ImageOutcome::Cancelled
            } else {
                cancellation
                    .run(self.process_image(upload))
                    .await
                    .unwrap_or(ImageOutcome::Cancelled)
            };

            match &outcome {
                ImageOutcome::Annotated { .. } => {
                    log::info!("[ORCHESTRATOR] [{}] Annotated {}", job_id, file_name)
                }
                ImageOutcome::Failed { message } => {
                    log::warn!("[ORCHESTRATOR] [{}] {} failed: {}", job_id, file_name, message)
                }
                ImageOutcome::Cancelled => {
                    log::info!("[ORCHESTRATOR] [{}] {} cancelled", job_id, file_name)
                }
            }

            let report = ImageReport {
                job_id,
                file_name,
                outcome,
            };
            on_report(&report);
            reports.push(report);
        }

        reports
    }
}
