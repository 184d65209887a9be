use crate::core::models::{DetectedObject, ImageBuffer, RenderedBoxes};

pub trait BoundingBoxRenderer: Send + Sync {
    fn draw_boxes(&self, image: &ImageBuffer, objects: &[DetectedObject]) -> RenderedBoxes;
}
