use image::RgbImage;

use super::GeometryError;

/// Output of the bounding-box renderer.
///
/// Objects with unusable geometry are left out of `image` and listed in
/// `rejected` instead.
#[derive(Debug, Clone)]
pub struct RenderedBoxes {
    pub image: RgbImage,
    pub drawn_count: usize,
    pub rejected: Vec<GeometryError>,
}

impl RenderedBoxes {
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}
