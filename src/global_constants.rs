pub const APPLICATION_NAME: &str = "vision-annotator";

pub const VISION_API_URL: &str = "https://vision.googleapis.com/v1/images:annotate";
pub const API_KEY_ENV_VAR: &str = "VISION_API_KEY";

pub const DEFAULT_MAX_RESULTS: u32 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

pub const DEFAULT_BOX_COLOR_RGB: [u8; 3] = [0, 255, 0];
pub const DEFAULT_BOX_LINE_THICKNESS: u32 = 2;
pub const DEFAULT_LABEL_FONT_SIZE: f32 = 18.0;

pub const LABEL_OFFSET_ABOVE_PIXELS: i32 = 10;
pub const LABEL_OFFSET_BELOW_PIXELS: i32 = 20;
pub const LABEL_MIN_TOP_PIXELS: i32 = 10;

pub const LABEL_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub const EXPORT_FILE_PREFIX: &str = "annotations_";
pub const BOXED_IMAGE_FILE_PREFIX: &str = "objects_";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const MESSAGE_NO_LABELS: &str = "No labels detected.";
pub const MESSAGE_NO_TEXT: &str = "No text detected.";
pub const MESSAGE_NO_OBJECTS: &str = "No objects detected.";
pub const MESSAGE_CANCELLED: &str = "Processing cancelled.";
