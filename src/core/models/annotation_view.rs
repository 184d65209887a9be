use super::RenderedBoxes;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry {
    pub name: String,
    pub score: f32,
}

impl ScoredEntry {
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    pub fn formatted_score(&self) -> String {
        format!("{:.2}", self.score)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LabelsSection {
    Detected(Vec<ScoredEntry>),
    NoLabelsDetected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextSection {
    Detected(String),
    NoTextDetected,
}

#[derive(Debug, Clone)]
pub enum ObjectsSection {
    Detected {
        entries: Vec<ScoredEntry>,
        rendered: RenderedBoxes,
    },
    NoObjectsDetected,
}

/// Everything a presentation layer needs to show one successfully annotated image.
#[derive(Debug, Clone)]
pub struct AnnotationView {
    pub labels: LabelsSection,
    pub text: TextSection,
    pub objects: ObjectsSection,
}
