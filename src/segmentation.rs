//! HTTP client for the segmentation API.
//!
//! One operation: POST the chosen file as multipart form data (field `file`)
//! to the fixed endpoint and decode the `mask` field of the JSON reply, a
//! base64-encoded PNG, into displayable pixels. No retries; every failure
//! maps onto one [`AppError`] variant and surfaces as a single message.

use crate::error::{AppError, Result};
use crate::state::MaskResult;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::debug;
use serde::Deserialize;

/// JSON body of a successful `/segment` response.
/// `mask` is optional so its absence maps to a protocol error, not a parse error.
#[derive(Deserialize)]
struct SegmentResponse {
    mask: Option<String>,
}

/// Client for the remote segmentation service.
#[derive(Clone)]
pub struct SegmentationClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SegmentationClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Sends the raw file bytes to the service and decodes the returned mask.
    pub async fn segment(&self, file_name: String, bytes: Vec<u8>) -> Result<MaskResult> {
        debug!(
            "POST {} ({} bytes as {})",
            self.endpoint,
            bytes.len(),
            file_name
        );

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Request(status.as_u16()));
        }

        let body: SegmentResponse = response.json().await?;
        let encoded = body
            .mask
            .ok_or_else(|| AppError::Protocol("Mask not returned by API".to_string()))?;

        decode_mask(&encoded)
    }
}

/// Decodes a base64 PNG payload into Luma8 mask pixels.
fn decode_mask(encoded: &str) -> Result<MaskResult> {
    let png_bytes = BASE64
        .decode(encoded)
        .map_err(|e| AppError::Protocol(format!("Mask is not valid base64: {}", e)))?;

    let decoded = image::load_from_memory_with_format(&png_bytes, image::ImageFormat::Png)
        .map_err(|e| AppError::Protocol(format!("Mask is not a decodable PNG: {}", e)))?;

    let luma = decoded.to_luma8();
    Ok(MaskResult {
        width: luma.width(),
        height: luma.height(),
        data: luma.into_raw(),
    })
}
