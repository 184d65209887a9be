use std::fmt::Write;

use crate::core::models::{ImageOutcome, ImageReport, LabelsSection, ObjectsSection, TextSection};
use crate::global_constants;

pub fn render_report(report: &ImageReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "=== {} ===", report.file_name);

    match &report.outcome {
        ImageOutcome::Failed { message } => {
            let _ = writeln!(output, "⚠ API Error: {}", message);
        }
        ImageOutcome::Cancelled => {
            let _ = writeln!(output, "{}", global_constants::MESSAGE_CANCELLED);
        }
        ImageOutcome::Annotated { view, .. } => {
            render_labels(&mut output, &view.labels);
            render_text(&mut output, &view.text);
            render_objects(&mut output, &view.objects);
        }
    }

    output
}

fn render_labels(output: &mut String, labels: &LabelsSection) {
    let _ = writeln!(output, "[Labels]");
    match labels {
        LabelsSection::Detected(entries) => {
            for entry in entries {
                let _ = writeln!(output, "- {} (confidence: {})", entry.name, entry.formatted_score());
            }
        }
        LabelsSection::NoLabelsDetected => {
            let _ = writeln!(output, "{}", global_constants::MESSAGE_NO_LABELS);
        }
    }
}

fn render_text(output: &mut String, text: &TextSection) {
    let _ = writeln!(output, "[Text]");
    match text {
        TextSection::Detected(full_text) => {
            let _ = writeln!(output, "Extracted text: {}", full_text);
        }
        TextSection::NoTextDetected => {
            let _ = writeln!(output, "{}", global_constants::MESSAGE_NO_TEXT);
        }
    }
}

fn render_objects(output: &mut String, objects: &ObjectsSection) {
    let _ = writeln!(output, "[Objects]");
    match objects {
        ObjectsSection::Detected { entries, rendered } => {
            for entry in entries {
                let _ = writeln!(output, "- {} (confidence: {})", entry.name, entry.formatted_score());
            }
            let _ = writeln!(output, "Boxes drawn: {}", rendered.drawn_count);
            if rendered.has_rejections() {
                for error in &rendered.rejected {
                    let _ = writeln!(output, "⚠ Box skipped: {}", error);
                }
            }
        }
        ObjectsSection::NoObjectsDetected => {
            let _ = writeln!(output, "{}", global_constants::MESSAGE_NO_OBJECTS);
        }
    }
}
