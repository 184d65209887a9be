mod adapters;
mod core;
mod global_constants;
mod presentation;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use crate::adapters::{GoogleCloudVisionService, ImageprocBoxRenderer, LocalFileExporter};
use crate::core::interfaces::adapters::ArtifactExporter;
use crate::core::models::{display_name, AnnotatorSettings, ImageOutcome, ImageReport, ImageUpload, ObjectsSection};
use crate::core::orchestrators::{AnnotationOrchestrator, BatchCancellation};
use crate::presentation::console_report;

#[derive(Debug, Parser)]
#[command(name = "vision-annotator", version, about = "Label, read and box images with a cloud vision API")]
struct CliArgs {
    /// JPEG or PNG files to annotate, processed in order
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Directory for exported artifacts
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Save the raw API response as annotations_<file>.json
    #[arg(long)]
    export_json: bool,

    /// Save the image with object boxes as objects_<stem>.png
    #[arg(long)]
    export_boxes: bool,

    /// Override the request timeout from the settings file
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Read settings from this file instead of the user config directory
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    log::info!("[MAIN] Starting {}", global_constants::APPLICATION_NAME);

    let mut settings = match &args.settings {
        Some(path) => AnnotatorSettings::load_from_path(path)?,
        None => AnnotatorSettings::load().unwrap_or_else(|e| {
            log::warn!("[MAIN] Failed to load settings: {}, using defaults", e);
            AnnotatorSettings::default()
        }),
    };
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_seconds = timeout_secs;
    }

    let api_key = settings.resolve_api_key()?;
    let annotation_service = GoogleCloudVisionService::from_settings(&settings, api_key)?;
    let box_renderer = ImageprocBoxRenderer::build(&settings.box_style);
    let orchestrator = AnnotationOrchestrator::build(Arc::new(annotation_service), Arc::new(box_renderer));
    let exporter = LocalFileExporter::new(args.output_dir.clone());

    let cancellation = Arc::new(BatchCancellation::new());
    let signal_cancellation = Arc::clone(&cancellation);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("[MAIN] Ctrl-C received");
            signal_cancellation.cancel_batch();
        }
    });

    let mut uploads = Vec::with_capacity(args.images.len());
    for path in &args.images {
        match ImageUpload::read_from_path(path).await {
            Ok(upload) => uploads.push(upload),
            Err(error) => {
                log::error!("[MAIN] {:#}", error);
                let report = ImageReport::failed(display_name(path), format!("{:#}", error));
                println!("{}", console_report::render_report(&report));
            }
        }
    }

    let reports = orchestrator
        .process_batch(uploads, &cancellation, |report| {
            println!("{}", console_report::render_report(report));
            export_artifacts(&exporter, report, &args);
        })
        .await;

    let failed = reports.iter().filter(|report| report.is_failed()).count();
    log::info!(
        "[MAIN] Finished: {} images, {} failed",
        reports.len(),
        failed
    );

    Ok(())
}

fn export_artifacts(exporter: &dyn ArtifactExporter, report: &ImageReport, args: &CliArgs) {
    let ImageOutcome::Annotated { view, raw_response } = &report.outcome else {
        return;
    };

    if args.export_json {
        match exporter.export_annotations(&report.file_name, raw_response) {
            Ok(path) => println!("📥 Saved {}", path.display()),
            Err(error) => log::error!("[MAIN] Export failed for {}: {:#}", report.file_name, error),
        }
    }

    if args.export_boxes {
        if let ObjectsSection::Detected { rendered, .. } = &view.objects {
            match exporter.export_boxed_image(&report.file_name, &rendered.image) {
                Ok(path) => println!("📦 Saved {}", path.display()),
                Err(error) => log::error!("[MAIN] Export failed for {}: {:#}", report.file_name, error),
            }
        }
    }
}
