use serde::Deserialize;
use std::fmt;

use crate::global_constants;

/// A point expressed as a fraction of image width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct NormalizedVertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Axis-aligned rectangle in pixel space, corners inclusive.
///
/// `(left, top)` comes from the first vertex and `(right, bottom)` from the
/// third. The corners are not reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    /// Only the first and third vertices are read. That is exact for upright
    /// boxes; a rotated quadrilateral comes out as the rectangle spanned by
    /// those two corners, not its true outline. Vertex order is not validated.
    pub fn from_normalized_quad(
        object_name: &str,
        vertices: &[NormalizedVertex],
        width: u32,
        height: u32,
    ) -> Result<Self, GeometryError> {
        if vertices.len() != 4 {
            return Err(GeometryError::NotAQuadrilateral {
                object_name: object_name.to_string(),
                vertex_count: vertices.len(),
            });
        }

        let first = vertices[0];
        let third = vertices[2];
        if ![first.x, first.y, third.x, third.y].iter().all(|c| c.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate {
                object_name: object_name.to_string(),
            });
        }
        if ![first.x, first.y, third.x, third.y]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
        {
            return Err(GeometryError::OutOfRange {
                object_name: object_name.to_string(),
            });
        }

        Ok(Self {
            left: to_pixel(first.x, width),
            top: to_pixel(first.y, height),
            right: to_pixel(third.x, width),
            bottom: to_pixel(third.y, height),
        })
    }

    pub fn label_baseline(&self) -> i32 {
        label_baseline_for_top(self.top)
    }
}

// Truncates toward zero.
fn to_pixel(fraction: f64, extent: u32) -> i32 {
    (fraction * extent as f64) as i32
}

pub fn label_baseline_for_top(top: i32) -> i32 {
    let above = top - global_constants::LABEL_OFFSET_ABOVE_PIXELS;
    if above >= global_constants::LABEL_MIN_TOP_PIXELS {
        above
    } else {
        top + global_constants::LABEL_OFFSET_BELOW_PIXELS
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    NotAQuadrilateral { object_name: String, vertex_count: usize },
    NonFiniteCoordinate { object_name: String },
    OutOfRange { object_name: String },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::NotAQuadrilateral {
                object_name,
                vertex_count,
            } => write!(
                f,
                "object '{}' has {} normalized vertices, expected 4",
                object_name, vertex_count
            ),
            GeometryError::NonFiniteCoordinate { object_name } => {
                write!(f, "object '{}' has a non-finite coordinate", object_name)
            }
            GeometryError::OutOfRange { object_name } => {
                write!(f, "object '{}' has a coordinate outside [0, 1]", object_name)
            }
        }
    }
}

impl std::error::Error for GeometryError {}
