mod bounding_box_renderer;

pub use bounding_box_renderer::BoundingBoxRenderer;
