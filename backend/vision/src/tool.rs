//! Image-to-JSON conversion tool.
//!
//! Composes validation, the vision model call, and JSON extraction into
//! a single operation, and optionally writes the result to disk.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use pantrysnap_core::{PantryError, VisionModel, VisionRequest};

use crate::extract::extract_json;
use crate::probe::probe_image;
use crate::settings::VisionSettings;

/// Instruction sent with every image when the caller does not supply
/// its own prompt.
pub const DEFAULT_PROMPT: &str = "Analyze this image and convert it to a structured JSON format.\n\
Include the following information:\n\
- A description of what you see in the image\n\
- Any text that appears in the image (OCR)\n\
- Objects, people, or items visible\n\
- Colors, shapes, and visual elements\n\
- Any other relevant details that can be extracted\n\
\n\
Return the response as a valid JSON object with clear structure.";

/// Details about how a conversion ran.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolMetadata {
    pub image_path: String,
    /// (width, height) in pixels.
    pub image_size: (u32, u32),
    pub model: String,
    pub tokens_used: u64,
    pub raw_response: String,
}

/// The tool's complete answer for one image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResponse {
    pub success: bool,
    pub json_data: Value,
    pub metadata: ToolMetadata,
}

/// Converts a single image into structured JSON via a vision model.
pub struct ImageToJsonTool {
    model: Arc<dyn VisionModel>,
    settings: VisionSettings,
}

impl ImageToJsonTool {
    pub fn new(model: Arc<dyn VisionModel>, settings: VisionSettings) -> Self {
        Self { model, settings }
    }

    pub fn settings(&self) -> &VisionSettings {
        &self.settings
    }

    /// Where a requested output path will actually land: relative paths
    /// go under the configured output directory.
    pub fn resolve_output_path(&self, output_path: &Path) -> PathBuf {
        if output_path.is_absolute() {
            output_path.to_path_buf()
        } else {
            self.settings.output_dir.join(output_path)
        }
    }

    /// Convert one image to structured JSON.
    ///
    /// The image is validated before any network call is made, and the
    /// whole conversion runs under the configured request deadline.
    pub async fn convert(
        &self,
        image_path: &Path,
        custom_prompt: Option<&str>,
        output_path: Option<&Path>,
    ) -> Result<ToolResponse, PantryError> {
        let info = probe_image(image_path)?;
        let bytes = tokio::fs::read(image_path)
            .await
            .with_context(|| format!("failed to read image {}", image_path.display()))?;

        let prompt = custom_prompt.unwrap_or(DEFAULT_PROMPT);
        let request = VisionRequest {
            image: bytes.into(),
            mime_type: info.mime_type.to_string(),
            prompt: prompt.to_string(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let deadline = self.settings.request_timeout();
        let response = tokio::time::timeout(deadline, self.model.describe(&request))
            .await
            .map_err(|_| PantryError::ModelTimeout(deadline))??;

        if self.settings.verbose {
            info!(model = %response.model, raw = %response.raw_text, "Vision model raw output");
        } else {
            debug!(
                model = %response.model,
                chars = response.raw_text.len(),
                "Vision model replied"
            );
        }

        let extraction = extract_json(&response.raw_text);
        if !extraction.parsed {
            warn!(
                image = %image_path.display(),
                "Model output was not valid JSON, wrapped in fallback envelope"
            );
        }

        let tool_response = ToolResponse {
            success: true,
            json_data: extraction.json,
            metadata: ToolMetadata {
                image_path: image_path.display().to_string(),
                image_size: (info.width, info.height),
                model: response.model,
                tokens_used: response.tokens_used,
                raw_response: response.raw_text,
            },
        };

        if let Some(output_path) = output_path {
            let dest = self.resolve_output_path(output_path);
            write_json_atomic(&dest, &tool_response).await?;
            info!(path = %dest.display(), "Wrote conversion result");
        }

        Ok(tool_response)
    }
}

/// Write the response as pretty JSON, all-or-nothing: content goes to a
/// staging file in the destination directory first, then replaces the
/// destination in one rename.
async fn write_json_atomic(dest: &Path, response: &ToolResponse) -> Result<(), PantryError> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent)
        .await
        .with_context(|| format!("failed to create output directory {}", parent.display()))?;

    let body =
        serde_json::to_string_pretty(response).context("failed to serialize tool response")?;

    let mut staged = tempfile::Builder::new()
        .prefix(".pantrysnap-")
        .suffix(".json")
        .tempfile_in(&parent)
        .context("failed to create staging file for output")?;
    staged
        .write_all(body.as_bytes())
        .context("failed to write output")?;
    staged
        .persist(dest)
        .with_context(|| format!("failed to move output into place at {}", dest.display()))?;

    Ok(())
}
