use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AssetDescriptor, DerivedAssetUrl, ResourceKind};

/// A layer in the editor's stack: one version of the asset being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: Uuid,
    pub name: Option<String>,
    pub url: Option<String>,
    pub format: Option<String>,
    pub width: u32,
    pub height: u32,
    pub public_id: Option<String>,
    pub resource_type: Option<ResourceKind>,
    pub transcription_url: Option<String>,
    pub poster_url: Option<String>,
}

impl Layer {
    /// An empty placeholder layer
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            url: None,
            format: None,
            width: 0,
            height: 0,
            public_id: None,
            resource_type: None,
            transcription_url: None,
            poster_url: None,
        }
    }

    /// First layer for a newly uploaded asset
    pub fn from_asset(asset: &AssetDescriptor) -> Self {
        Self {
            name: Some(
                asset
                    .original_filename
                    .clone()
                    .unwrap_or_else(|| asset.public_id.clone()),
            ),
            url: Some(asset.url.clone()),
            format: Some(asset.format.clone()),
            width: asset.width,
            height: asset.height,
            public_id: Some(asset.public_id.clone()),
            resource_type: Some(asset.resource_type),
            ..Self::empty()
        }
    }

    /// New layer holding the result of an edit applied to `source`.
    ///
    /// `format` overrides the source format when the edit changed it (e.g. "png").
    pub fn derived(
        source: &Layer,
        url: &DerivedAssetUrl,
        name: impl Into<String>,
        format: Option<&str>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            url: Some(url.as_str().to_string()),
            format: format.map(str::to_string).or_else(|| source.format.clone()),
            width: source.width,
            height: source.height,
            public_id: source.public_id.clone(),
            resource_type: source.resource_type,
            ..Self::empty()
        }
    }
}
