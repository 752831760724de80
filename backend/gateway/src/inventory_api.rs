//! Inventory extraction endpoint.
//!
//! `POST /process-inventory` accepts a multipart image upload and
//! answers with an `InventorySnapshot`. Internally the pipeline is an
//! explicit `Result`, but the HTTP surface never fails: any pipeline
//! error is logged and absorbed into the canned mock snapshot with
//! status 200. Clients tell the two apart via `is_mock`.

use std::io::Write as _;

use anyhow::Context;
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
};
use tracing::{error, info};
use uuid::Uuid;

use logging::redact_api_keys;
use pantrysnap_core::{InventorySnapshot, PantryError};
use pantrysnap_inventory::{current_date, mock_inventory, snapshot_from_json};
use pantrysnap_vision::probe::extension_for_mime;

use crate::server::GatewayState;

/// Multipart field names accepted for the image.
const IMAGE_FIELDS: [&str; 2] = ["image", "file"];

/// An image pulled out of a multipart body.
pub struct UploadedImage {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Handler for `POST /process-inventory`.
pub async fn process_inventory(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Json<InventorySnapshot> {
    let request_id = Uuid::new_v4();

    let result = async {
        let upload = read_image_field(multipart).await?;
        info!(
            %request_id,
            filename = upload.filename.as_deref().unwrap_or("<unnamed>"),
            size_bytes = upload.bytes.len(),
            "Processing inventory upload"
        );
        process_upload(&state, &upload).await
    }
    .await;

    Json(resolve_pipeline(result, request_id))
}

/// Find the image field in a multipart body.
async fn read_image_field(mut multipart: Multipart) -> Result<UploadedImage, PantryError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| PantryError::InvalidImage(format!("malformed multipart body: {e}")))?;
        let Some(field) = field else {
            return Err(PantryError::InvalidImage(
                "no image field in multipart body (expected \"image\" or \"file\")".to_string(),
            ));
        };

        let name = field.name().unwrap_or_default().to_string();
        if !IMAGE_FIELDS.contains(&name.as_str()) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| PantryError::InvalidImage(format!("failed to read upload: {e}")))?;

        return Ok(UploadedImage {
            filename,
            content_type,
            bytes,
        });
    }
}

/// Run the full pipeline for one upload: stage to a temp file, convert,
/// map the result to a snapshot. The staged file is removed on every
/// exit path.
pub async fn process_upload(
    state: &GatewayState,
    upload: &UploadedImage,
) -> Result<InventorySnapshot, PantryError> {
    let extension = staging_extension(upload)?;

    let mut staged = tempfile::Builder::new()
        .prefix("receipt_")
        .suffix(&format!(".{extension}"))
        .tempfile_in(&state.staging_dir)
        .context("failed to create staging file")?;
    staged
        .write_all(&upload.bytes)
        .context("failed to write staged upload")?;

    let response = state.tool.convert(staged.path(), None, None).await?;
    Ok(snapshot_from_json(&response.json_data, &current_date()))
}

/// Pick the staging file extension from the client's filename, falling
/// back to the declared content type.
fn staging_extension(upload: &UploadedImage) -> Result<String, PantryError> {
    if let Some(ext) = upload
        .filename
        .as_deref()
        .and_then(|name| std::path::Path::new(name).extension())
        .and_then(|ext| ext.to_str())
    {
        return Ok(ext.to_lowercase());
    }
    if let Some(ext) = upload.content_type.as_deref().and_then(extension_for_mime) {
        return Ok(ext.to_string());
    }
    Err(PantryError::InvalidImage(
        "upload carries neither a usable filename nor an image content type".to_string(),
    ))
}

/// Resolve the pipeline result to a response body, absorbing errors
/// into the canned mock snapshot.
fn resolve_pipeline(
    result: Result<InventorySnapshot, PantryError>,
    request_id: Uuid,
) -> InventorySnapshot {
    match result {
        Ok(snapshot) => {
            info!(%request_id, items = snapshot.items.len(), "Inventory extracted");
            snapshot
        }
        Err(err) => {
            error!(
                %request_id,
                error = %redact_api_keys(&err.to_string()),
                "Inventory pipeline failed, serving mock snapshot"
            );
            mock_inventory(&current_date())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use pantrysnap_inventory::MockPlanner;
    use pantrysnap_vision::{ImageToJsonTool, MockVision, VisionSettings};
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    const RECEIPT_REPLY: &str = r#"{"items": [{"name": "Milk", "quantity": 1, "unit": "bottle"}]}"#;

    fn state_with(mock: Arc<MockVision>, staging: &Path) -> GatewayState {
        let tool = Arc::new(ImageToJsonTool::new(mock, VisionSettings::default()));
        GatewayState::new(tool, Arc::new(MockPlanner)).with_staging_dir(staging)
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbImage::from_pixel(2, 2, Rgb([120, 90, 60]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn upload(filename: Option<&str>, content_type: Option<&str>, bytes: Vec<u8>) -> UploadedImage {
        UploadedImage {
            filename: filename.map(str::to_string),
            content_type: content_type.map(str::to_string),
            bytes: bytes.into(),
        }
    }

    fn staged_file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn upload_is_converted_and_staging_cleaned() {
        let staging = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockVision::new(RECEIPT_REPLY));
        let state = state_with(mock.clone(), staging.path());

        let snapshot = process_upload(
            &state,
            &upload(Some("receipt.png"), Some("image/png"), png_bytes()),
        )
        .await
        .unwrap();

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].name, "Milk");
        assert_eq!(snapshot.items[0].quantity, "1 bottle");
        assert!(!snapshot.is_mock);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(staged_file_count(staging.path()), 0);
    }

    #[tokio::test]
    async fn content_type_stands_in_for_missing_filename() {
        let staging = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockVision::new(RECEIPT_REPLY));
        let state = state_with(mock.clone(), staging.path());

        let snapshot = process_upload(&state, &upload(None, Some("image/png"), png_bytes()))
            .await
            .unwrap();

        assert!(!snapshot.items.is_empty());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn zero_byte_receipt_is_rejected_without_model_call() {
        let staging = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockVision::new(RECEIPT_REPLY));
        let state = state_with(mock.clone(), staging.path());

        let err = process_upload(
            &state,
            &upload(Some("receipt.jpg"), Some("image/jpeg"), Vec::new()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PantryError::InvalidImage(_)));
        assert_eq!(mock.call_count(), 0);
        assert_eq!(staged_file_count(staging.path()), 0);
    }

    #[tokio::test]
    async fn failed_model_call_still_cleans_staging() {
        let staging = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockVision::unavailable());
        let state = state_with(mock, staging.path());

        let err = process_upload(
            &state,
            &upload(Some("receipt.png"), Some("image/png"), png_bytes()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PantryError::ModelUnavailable(_)));
        assert_eq!(staged_file_count(staging.path()), 0);
    }

    #[test]
    fn staging_extension_prefers_filename() {
        let chosen = staging_extension(&upload(
            Some("photo.JPG"),
            Some("image/png"),
            Vec::new(),
        ))
        .unwrap();
        assert_eq!(chosen, "jpg");
    }

    #[test]
    fn staging_extension_requires_some_hint() {
        let err = staging_extension(&upload(None, None, Vec::new())).unwrap_err();
        assert!(matches!(err, PantryError::InvalidImage(_)));

        let err = staging_extension(&upload(None, Some("text/plain"), Vec::new())).unwrap_err();
        assert!(matches!(err, PantryError::InvalidImage(_)));
    }

    #[test]
    fn pipeline_error_resolves_to_mock() {
        let snapshot = resolve_pipeline(
            Err(PantryError::ModelTimeout(Duration::from_secs(60))),
            Uuid::new_v4(),
        );
        assert!(snapshot.is_mock);
        assert_eq!(snapshot.items.len(), 5);
        assert_eq!(snapshot.items[0].name, "Milk");
    }

    #[test]
    fn successful_pipeline_passes_through() {
        let real = InventorySnapshot::new("2024-06-01", vec![]);
        let snapshot = resolve_pipeline(Ok(real.clone()), Uuid::new_v4());
        assert_eq!(snapshot, real);
        assert!(!snapshot.is_mock);
    }
}
