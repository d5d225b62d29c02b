//! Resource endpoints of the admin API.

use pixelsmith_core::ResourceKind;
use serde::Deserialize;

use crate::{ApiClient, ApiResult};

/// Conversion add-on that produces video transcripts.
pub const TRANSCRIPTION_ADDON: &str = "google_speech";

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDetails {
    pub public_id: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub secure_url: Option<String>,
    #[serde(default)]
    pub info: Option<ResourceInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceInfo {
    #[serde(default)]
    pub raw_convert: Option<RawConvert>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConvert {
    #[serde(default)]
    pub google_speech: Option<ConversionStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversionStatus {
    pub status: String,
}

impl ResourceDetails {
    /// Status of the transcript conversion, if one was ever requested.
    pub fn transcription_status(&self) -> Option<&str> {
        self.info
            .as_ref()?
            .raw_convert
            .as_ref()?
            .google_speech
            .as_ref()
            .map(|s| s.status.as_str())
    }
}

/// Public IDs may contain folders; each segment is encoded on its own.
fn resource_path(kind: ResourceKind, public_id: &str) -> String {
    let encoded: Vec<String> = public_id
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("/resources/{}/upload/{}", kind, encoded.join("/"))
}

impl ApiClient {
    /// Metadata for one uploaded resource.
    pub async fn resource(&self, kind: ResourceKind, public_id: &str) -> ApiResult<ResourceDetails> {
        tracing::debug!(%kind, public_id, "Fetching resource details");
        self.get(&resource_path(kind, public_id)).await
    }

    /// Ask the service to generate a transcript for an uploaded video.
    pub async fn request_transcription(&self, public_id: &str) -> ApiResult<ResourceDetails> {
        tracing::info!(public_id, "Requesting video transcription");
        self.post_form(
            &resource_path(ResourceKind::Video, public_id),
            &[("raw_convert", TRANSCRIPTION_ADDON)],
        )
        .await
    }
}
