use anyhow::Context;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GeometryError, NormalizedVertex, PixelRect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FeatureKind {
    #[serde(rename = "LABEL_DETECTION")]
    Label,
    #[serde(rename = "TEXT_DETECTION")]
    Text,
    #[serde(rename = "OBJECT_LOCALIZATION")]
    Object,
}

impl FeatureKind {
    pub const REQUESTED: [FeatureKind; 3] = [FeatureKind::Label, FeatureKind::Text, FeatureKind::Object];
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequest {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageContent {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<FeatureRequest>,
}

/// Body of a single `images:annotate` call.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

impl AnnotationRequest {
    pub fn for_image(image_bytes: &[u8], max_results: u32) -> Self {
        let content = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        let features = FeatureKind::REQUESTED
            .iter()
            .map(|kind| FeatureRequest {
                kind: *kind,
                max_results,
            })
            .collect();

        Self {
            requests: vec![AnnotateImageRequest {
                image: ImageContent { content },
                features,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingPoly {
    #[serde(default)]
    pub normalized_vertices: Vec<NormalizedVertex>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
}

impl DetectedObject {
    pub fn pixel_rect(&self, width: u32, height: u32) -> Result<PixelRect, GeometryError> {
        PixelRect::from_normalized_quad(&self.name, &self.bounding_poly.normalized_vertices, width, height)
    }
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<Label>,
    #[serde(default)]
    text_annotations: Vec<TextBlock>,
    #[serde(default)]
    localized_object_annotations: Vec<DetectedObject>,
    #[serde(default)]
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct VisionResponseEnvelope {
    responses: Option<Vec<AnnotateImageResponse>>,
}

/// Parsed annotations for one image, alongside the exact JSON they came from.
#[derive(Debug, Clone)]
pub struct ImageAnnotations {
    pub labels: Vec<Label>,
    pub text_blocks: Vec<TextBlock>,
    pub objects: Vec<DetectedObject>,
    pub raw_response: Value,
}

impl ImageAnnotations {
    pub fn parse(raw_response: Value) -> anyhow::Result<Self> {
        let envelope: VisionResponseEnvelope = serde_json::from_value(raw_response.clone())
            .context("Malformed vision response")?;

        let first = envelope
            .responses
            .and_then(|responses| responses.into_iter().next())
            .ok_or_else(|| anyhow::anyhow!("Malformed vision response: `responses` is missing or empty"))?;

        if let Some(status) = first.error {
            anyhow::bail!(
                "Vision API rejected the image (code {}): {}",
                status.code,
                status.message
            );
        }

        Ok(Self {
            labels: first.label_annotations,
            text_blocks: first.text_annotations,
            objects: first.localized_object_annotations,
            raw_response,
        })
    }

    /// The first text annotation aggregates every piece of text found in the image.
    pub fn full_text(&self) -> Option<&str> {
        self.text_blocks.first().map(|block| block.description.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum AnnotationResult {
    Success(ImageAnnotations),
    Failure { message: String },
}

impl AnnotationResult {
    pub fn failure(message: impl Into<String>) -> Self {
        AnnotationResult::Failure {
            message: message.into(),
        }
    }

    pub fn from_response_body(raw_response: Value) -> Self {
        match ImageAnnotations::parse(raw_response) {
            Ok(annotations) => AnnotationResult::Success(annotations),
            Err(error) => AnnotationResult::failure(format!("{:#}", error)),
        }
    }

    #[cfg(test)]
    pub fn is_success(&self) -> bool {
        matches!(self, AnnotationResult::Success(_))
    }
}
