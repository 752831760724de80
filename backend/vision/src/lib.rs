//! Vision pipeline: image validation, the Gemini client, JSON
//! extraction, and the image-to-JSON tool that ties them together.

pub mod extract;
pub mod gemini;
pub mod mock;
pub mod probe;
pub mod retry;
pub mod settings;
pub mod tool;

pub use extract::{Extraction, extract_json};
pub use gemini::GeminiVision;
pub use mock::MockVision;
pub use probe::{ImageInfo, probe_image};
pub use retry::RetryPolicy;
pub use settings::VisionSettings;
pub use tool::{DEFAULT_PROMPT, ImageToJsonTool, ToolMetadata, ToolResponse};
