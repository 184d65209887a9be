mod google_cloud_vision_service;
mod imageproc_box_renderer;
mod local_file_exporter;

pub use google_cloud_vision_service::GoogleCloudVisionService;
pub use imageproc_box_renderer::ImageprocBoxRenderer;
pub use local_file_exporter::LocalFileExporter;
