use pixelsmith_core::{
    DerivedAssetUrl, EditError, Operation, QualityPreset, ResourceKind, TransformRequest,
};
use serde::{Deserialize, Serialize};

use crate::context::EditorContext;
use crate::orchestrator::run_operation;

/// Download of an asset at one of the quality presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub asset_url: String,
    pub public_id: String,
    /// "original", "large", "medium" or "small"
    pub quality: String,
    pub resource_kind: ResourceKind,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedAsset {
    pub url: DerivedAssetUrl,
    /// `<public_id>.<quality>.<format>`
    pub filename: String,
}

/// Resolve a downloadable URL for `request`, waiting until the service serves it.
pub async fn export_asset(
    ctx: &EditorContext,
    request: &ExportRequest,
) -> Result<ExportedAsset, EditError> {
    let preset: QualityPreset = request.quality.parse()?;

    let transform = TransformRequest::new(
        request.asset_url.clone(),
        Operation::Quality { preset },
        request.format.clone(),
    );
    let url = run_operation(ctx, &transform, request.resource_kind).await?;

    Ok(ExportedAsset {
        url,
        filename: format!("{}.{}.{}", request.public_id, preset, request.format),
    })
}
