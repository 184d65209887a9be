use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

use crate::core::interfaces::ports::BoundingBoxRenderer;
use crate::core::models::{BoxStyle, DetectedObject, ImageBuffer, PixelRect, RenderedBoxes};
use crate::global_constants;

pub struct ImageprocBoxRenderer {
    color: Rgb<u8>,
    line_thickness: u32,
    label_scale: PxScale,
    label_font: Option<FontVec>,
}

impl ImageprocBoxRenderer {
    pub fn build(style: &BoxStyle) -> Self {
        let label_font = Self::load_label_font(style.label_font_path.as_deref());
        Self::with_font(style, label_font)
    }

    pub fn with_font(style: &BoxStyle, label_font: Option<FontVec>) -> Self {
        Self {
            color: Rgb(style.color_rgb),
            line_thickness: style.line_thickness.max(1),
            label_scale: PxScale::from(style.label_font_size),
            label_font,
        }
    }

    fn load_label_font(configured_path: Option<&Path>) -> Option<FontVec> {
        let candidates: Vec<PathBuf> = match configured_path {
            Some(path) => vec![path.to_path_buf()],
            None => global_constants::LABEL_FONT_CANDIDATES
                .iter()
                .map(PathBuf::from)
                .collect(),
        };

        for path in candidates {
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(error) => {
                    log::debug!("[BOX_RENDERER] Font {:?} unavailable: {}", path, error);
                    continue;
                }
            };

            match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    log::info!("[BOX_RENDERER] Using label font {:?}", path);
                    return Some(font);
                }
                Err(error) => log::warn!("[BOX_RENDERER] Font {:?} is not usable: {}", path, error),
            }
        }

        log::warn!("[BOX_RENDERER] No label font found, boxes will be drawn without names");
        None
    }

    fn draw_outline(&self, canvas: &mut RgbImage, rect: &PixelRect) {
        let left = rect.left.min(rect.right) as i64;
        let top = rect.top.min(rect.bottom) as i64;
        let width = (rect.left as i64 - rect.right as i64).abs() + 1;
        let height = (rect.top as i64 - rect.bottom as i64).abs() + 1;

        // Thicker lines grow inward so the outer edge stays on the detected corners.
        for inset in 0..self.line_thickness as i64 {
            let inner_width = width - 2 * inset;
            let inner_height = height - 2 * inset;
            if inner_width <= 0 || inner_height <= 0 {
                break;
            }

            let (Ok(x), Ok(y), Ok(w), Ok(h)) = (
                i32::try_from(left + inset),
                i32::try_from(top + inset),
                u32::try_from(inner_width),
                u32::try_from(inner_height),
            ) else {
                log::warn!("[BOX_RENDERER] Outline {:?} does not fit the canvas", rect);
                break;
            };
            draw_hollow_rect_mut(canvas, Rect::at(x, y).of_size(w, h), self.color);
        }
    }

    fn draw_label(&self, canvas: &mut RgbImage, name: &str, x: i32, baseline: i32) {
        let Some(font) = &self.label_font else {
            return;
        };
        if name.is_empty() {
            return;
        }

        let ascent = font.as_scaled(self.label_scale).ascent();
        let y = baseline - ascent.round() as i32;

        draw_text_mut(canvas, self.color, x, y, self.label_scale, font, name);
    }
}

impl BoundingBoxRenderer for ImageprocBoxRenderer {
    fn draw_boxes(&self, image: &ImageBuffer, objects: &[DetectedObject]) -> RenderedBoxes {
        let mut canvas = image.pixels().to_rgb8();
        let (width, height) = canvas.dimensions();
        let mut drawn_count = 0;
        let mut rejected = Vec::new();

        for object in objects {
            match object.pixel_rect(width, height) {
                Ok(rect) => {
                    log::debug!("[BOX_RENDERER] Drawing '{}' at {:?}", object.name, rect);
                    self.draw_outline(&mut canvas, &rect);
                    self.draw_label(&mut canvas, &object.name, rect.left, rect.label_baseline());
                    drawn_count += 1;
                }
                Err(error) => {
                    log::warn!("[BOX_RENDERER] Skipping box in {}: {}", image.file_name(), error);
                    rejected.push(error);
                }
            }
        }

        log::info!(
            "[BOX_RENDERER] Drew {} of {} boxes on {}",
            drawn_count,
            objects.len(),
            image.file_name()
        );

        RenderedBoxes {
            image: canvas,
            drawn_count,
            rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{encode_test_png, GeometryError};
    use serde_json::json;

    const BACKGROUND: Rgb<u8> = Rgb([10, 20, 30]);
    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

    fn object(name: &str, vertices: &[(f64, f64)]) -> DetectedObject {
        let normalized_vertices: Vec<_> = vertices.iter().map(|(x, y)| json!({"x": x, "y": y})).collect();
        serde_json::from_value(json!({
            "name": name,
            "score": 0.9,
            "boundingPoly": {"normalizedVertices": normalized_vertices}
        }))
        .unwrap()
    }

    fn quad(x0: f64, y0: f64, x2: f64, y2: f64) -> Vec<(f64, f64)> {
        vec![(x0, y0), (x2, y0), (x2, y2), (x0, y2)]
    }

    fn renderer_without_labels() -> ImageprocBoxRenderer {
        ImageprocBoxRenderer::with_font(&BoxStyle::default(), None)
    }

    fn renderer_with_fixture_font() -> ImageprocBoxRenderer {
        let bytes = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/fonts/DejaVuSans.ttf"));
        let font = FontVec::try_from_vec(bytes.to_vec()).unwrap();
        ImageprocBoxRenderer::with_font(&BoxStyle::default(), Some(font))
    }

    fn painted_pixels(image: &RgbImage, columns: std::ops::Range<u32>, rows: std::ops::Range<u32>) -> usize {
        rows.flat_map(|y| columns.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| *image.get_pixel(x, y) != BACKGROUND)
            .count()
    }

    fn test_image() -> ImageBuffer {
        ImageBuffer::decode("street.png", encode_test_png(200, 100)).unwrap()
    }

    #[test]
    fn test_draw_boxes_outlines_converted_rectangle() {
        let image = test_image();
        let objects = vec![object("Car", &quad(0.1, 0.2, 0.5, 0.6))];

        let rendered = renderer_without_labels().draw_boxes(&image, &objects);

        assert_eq!(rendered.drawn_count, 1);
        assert_eq!(*rendered.image.get_pixel(20, 20), GREEN);
        assert_eq!(*rendered.image.get_pixel(100, 60), GREEN);
        assert_eq!(*rendered.image.get_pixel(60, 20), GREEN);
        assert_eq!(*rendered.image.get_pixel(20, 40), GREEN);
        assert_eq!(*rendered.image.get_pixel(60, 40), BACKGROUND);
        assert_eq!(*rendered.image.get_pixel(19, 19), BACKGROUND);
        assert_eq!(*rendered.image.get_pixel(101, 61), BACKGROUND);
    }

    #[test]
    fn test_draw_boxes_applies_line_thickness_inward() {
        let image = test_image();
        let objects = vec![object("Car", &quad(0.1, 0.2, 0.5, 0.6))];

        let rendered = renderer_without_labels().draw_boxes(&image, &objects);

        assert_eq!(*rendered.image.get_pixel(21, 21), GREEN);
        assert_eq!(*rendered.image.get_pixel(99, 59), GREEN);
        assert_eq!(*rendered.image.get_pixel(22, 22), BACKGROUND);
    }

    #[test]
    fn test_draw_boxes_keeps_resolution_and_source_bytes() {
        let image = test_image();
        let original_bytes = image.encoded_bytes().to_vec();

        let rendered = renderer_without_labels().draw_boxes(&image, &[object("Car", &quad(0.0, 0.0, 1.0, 1.0))]);

        assert_eq!(rendered.image.dimensions(), (200, 100));
        assert_eq!(image.encoded_bytes(), original_bytes.as_slice());
        assert_eq!(*image.pixels().to_rgb8().get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_draw_boxes_rejects_bad_geometry_and_draws_the_rest() {
        let image = test_image();
        let objects = vec![
            object("Broken", &[(0.1, 0.1), (0.2, 0.2)]),
            object("Car", &quad(0.1, 0.2, 0.5, 0.6)),
        ];

        let rendered = renderer_without_labels().draw_boxes(&image, &objects);

        assert_eq!(rendered.drawn_count, 1);
        assert!(rendered.has_rejections());
        assert_eq!(
            rendered.rejected,
            vec![GeometryError::NotAQuadrilateral {
                object_name: "Broken".to_string(),
                vertex_count: 2
            }]
        );
        assert_eq!(*rendered.image.get_pixel(20, 20), GREEN);
    }

    #[test]
    fn test_draw_boxes_survives_out_of_range_vertices() {
        let image = test_image();
        let objects = vec![
            object("Runaway", &[(0.0, 0.0), (1e10, 0.0), (1e10, 0.5), (0.0, 0.5)]),
            object("Car", &quad(0.1, 0.2, 0.5, 0.6)),
        ];

        let rendered = renderer_without_labels().draw_boxes(&image, &objects);

        assert_eq!(rendered.drawn_count, 1);
        assert_eq!(
            rendered.rejected,
            vec![GeometryError::OutOfRange {
                object_name: "Runaway".to_string()
            }]
        );
        assert_eq!(*rendered.image.get_pixel(20, 20), GREEN);
    }

    #[test]
    fn test_draw_boxes_writes_label_above_box_with_room() {
        let image = test_image();
        let objects = vec![object("Car", &quad(0.1, 0.5, 0.5, 0.9))];

        let rendered = renderer_with_fixture_font().draw_boxes(&image, &objects);

        assert_eq!(rendered.drawn_count, 1);
        assert!(painted_pixels(&rendered.image, 20..100, 20..50) > 0);
        assert_eq!(painted_pixels(&rendered.image, 0..200, 0..20), 0);
        assert_eq!(painted_pixels(&rendered.image, 22..99, 52..89), 0);
    }

    #[test]
    fn test_draw_boxes_writes_label_inside_box_near_image_top() {
        let image = test_image();
        let objects = vec![object("Car", &quad(0.1, 0.05, 0.5, 0.9))];

        let rendered = renderer_with_fixture_font().draw_boxes(&image, &objects);

        assert_eq!(rendered.drawn_count, 1);
        assert_eq!(painted_pixels(&rendered.image, 0..200, 0..5), 0);
        assert!(painted_pixels(&rendered.image, 22..99, 7..30) > 0);
    }

    #[test]
    fn test_draw_boxes_without_font_still_draws_every_box() {
        let style = BoxStyle {
            label_font_path: Some(std::env::temp_dir().join("vision-annotator-no-such-font.ttf")),
            ..BoxStyle::default()
        };
        let renderer = ImageprocBoxRenderer::build(&style);
        let objects = vec![
            object("Car", &quad(0.1, 0.5, 0.3, 0.9)),
            object("Dog", &quad(0.6, 0.5, 0.9, 0.9)),
        ];

        let rendered = renderer.draw_boxes(&test_image(), &objects);

        assert_eq!(rendered.drawn_count, 2);
        assert!(!rendered.has_rejections());
        assert_eq!(*rendered.image.get_pixel(20, 50), GREEN);
        assert_eq!(*rendered.image.get_pixel(120, 50), GREEN);
        assert_eq!(painted_pixels(&rendered.image, 0..200, 0..50), 0);
    }

    #[test]
    fn test_load_label_font_reads_configured_font() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/fonts/DejaVuSans.ttf");

        assert!(ImageprocBoxRenderer::load_label_font(Some(&path)).is_some());
    }

    #[test]
    fn test_draw_boxes_uses_configured_color() {
        let style = BoxStyle {
            color_rgb: [255, 0, 0],
            ..BoxStyle::default()
        };
        let renderer = ImageprocBoxRenderer::with_font(&style, None);

        let rendered = renderer.draw_boxes(&test_image(), &[object("Car", &quad(0.1, 0.2, 0.5, 0.6))]);

        assert_eq!(*rendered.image.get_pixel(20, 20), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_load_label_font_returns_none_for_missing_file() {
        let missing = std::env::temp_dir().join("vision-annotator-no-such-font.ttf");

        assert!(ImageprocBoxRenderer::load_label_font(Some(&missing)).is_none());
    }

    #[test]
    fn test_load_label_font_returns_none_for_non_font_file() {
        let path = std::env::temp_dir().join(format!("vision-annotator-{}.ttf", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"not a font").unwrap();

        assert!(ImageprocBoxRenderer::load_label_font(Some(&path)).is_none());

        std::fs::remove_file(&path).ok();
    }
}
