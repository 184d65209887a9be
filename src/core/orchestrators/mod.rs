mod annotation_orchestrator;
mod batch_cancellation;
mod result_interpreter;

pub use annotation_orchestrator::AnnotationOrchestrator;
pub use batch_cancellation::BatchCancellation;
