use crate::core::interfaces::ports::BoundingBoxRenderer;
use crate::core::models::{
    AnnotationView, ImageAnnotations, ImageBuffer, LabelsSection, ObjectsSection, ScoredEntry, TextSection,
};

/// Maps parsed annotations onto the three display sections.
///
/// Each section is independent: an absent feature becomes its "none detected"
/// variant. The renderer is only called when there are objects to draw.
pub fn interpret(
    annotations: &ImageAnnotations,
    image: &ImageBuffer,
    renderer: &dyn BoundingBoxRenderer,
) -> AnnotationView {
    let labels = if annotations.labels.is_empty() {
        LabelsSection::NoLabelsDetected
    } else {
        LabelsSection::Detected(
            annotations
                .labels
                .iter()
                .map(|label| ScoredEntry::new(label.description.clone(), label.score))
                .collect(),
        )
    };

    let text = match annotations.full_text() {
        Some(full_text) => TextSection::Detected(full_text.to_string()),
        None => TextSection::NoTextDetected,
    };

    let objects = if annotations.objects.is_empty() {
        ObjectsSection::NoObjectsDetected
    } else {
        let entries = annotations
            .objects
            .iter()
            .map(|object| ScoredEntry::new(object.name.clone(), object.score))
            .collect();
        let rendered = renderer.draw_boxes(image, &annotations.objects);
        ObjectsSection::Detected { entries, rendered }
    };

    AnnotationView {
        labels,
        text,
        objects,
    }
}
