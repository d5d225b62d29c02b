//! Editing layers: apply an operation to a layer and get the resulting layer back.

use pixelsmith_core::transform_url::TRANSPARENT_FORMAT;
use pixelsmith_core::{
    DerivedAssetUrl, EditError, Layer, Operation, ResourceKind, TransformRequest,
};

use crate::context::EditorContext;
use crate::orchestrator::run_operation;

/// Apply `operation` to `source` and wrap the derived asset in a new layer.
///
/// The poll cadence follows the layer's resource type, falling back to the kind
/// the operation is normally applied to.
pub async fn apply_to_layer(
    ctx: &EditorContext,
    source: &Layer,
    operation: Operation,
) -> Result<Layer, EditError> {
    if matches!(operation, Operation::Transcription { .. }) {
        return Err(EditError::InvalidParameter {
            name: "operation",
            reason: "transcription is requested through transcribe_video".to_string(),
        });
    }

    let base_url = source
        .url
        .clone()
        .ok_or(EditError::MissingParameter("url"))?;
    let kind = source
        .resource_type
        .or_else(|| operation.default_resource_kind())
        .unwrap_or(ResourceKind::Image);
    let name = layer_name(&operation);
    let format = operation
        .requires_transparency()
        .then_some(TRANSPARENT_FORMAT);

    let request = TransformRequest::new(
        base_url,
        operation,
        source.format.clone().unwrap_or_default(),
    );
    let url = run_operation(ctx, &request, kind).await?;

    Ok(Layer::derived(source, &url, name, format))
}

/// Copy of `source` carrying its subtitled version.
pub fn with_transcription(source: &Layer, url: &DerivedAssetUrl) -> Layer {
    Layer {
        transcription_url: Some(url.as_str().to_string()),
        ..source.clone()
    }
}

fn layer_name(operation: &Operation) -> &'static str {
    match operation {
        Operation::BackgroundRemoval => "Background Removed",
        Operation::BackgroundReplace { .. } => "Background Replaced",
        Operation::GenerativeFill { .. } => "Generative Fill",
        Operation::GenerativeRemove { .. } => "Object Removed",
        Operation::AreaExtract { .. } => "Extracted Area",
        Operation::SmartCrop { .. } => "Smart Crop",
        Operation::Transcription { .. } => "Transcription",
        Operation::Quality { .. } => "Export",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelsmith_core::transform_url::build_transform_url;
    use pixelsmith_core::{PollOutcome, PollPolicy};
    use pixelsmith_processing::test_helpers::ScriptedProber;
    use std::sync::Arc;

    fn source() -> Layer {
        Layer {
            name: Some("photo.jpg".to_string()),
            url: Some("https://cdn.example/acct/image/upload/v1/photo.jpg".to_string()),
            format: Some("jpg".to_string()),
            width: 1200,
            height: 800,
            public_id: Some("photo".to_string()),
            resource_type: Some(ResourceKind::Image),
            ..Layer::empty()
        }
    }

    fn ready_context() -> EditorContext {
        EditorContext::new(
            Arc::new(ScriptedProber::always(PollOutcome::Ready)),
            PollPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_background_removal_layer_is_png() {
        let source = source();
        let layer = apply_to_layer(&ready_context(), &source, Operation::BackgroundRemoval)
            .await
            .unwrap();

        assert_eq!(
            layer.url.as_deref(),
            Some("https://cdn.example/acct/image/upload/e_background_removal/v1/photo.png")
        );
        assert_eq!(layer.format.as_deref(), Some("png"));
        assert_eq!(layer.name.as_deref(), Some("Background Removed"));
        assert_eq!((layer.width, layer.height), (1200, 800));
        assert_ne!(layer.id, source.id);
    }

    #[tokio::test]
    async fn test_generative_fill_keeps_source_format() {
        let operation = Operation::GenerativeFill {
            aspect_ratio: "16:9".to_string(),
            width: 1600,
            height: 900,
        };
        let layer = apply_to_layer(&ready_context(), &source(), operation)
            .await
            .unwrap();

        assert_eq!(
            layer.url.as_deref(),
            Some("https://cdn.example/acct/image/upload/ar_16:9,b_gen_fill,c_pad,w_1600,h_900/v1/photo.jpg")
        );
        assert_eq!(layer.format.as_deref(), Some("jpg"));
    }

    #[tokio::test]
    async fn test_layer_without_url_is_rejected() {
        let empty = Layer::empty();
        let result = apply_to_layer(&ready_context(), &empty, Operation::BackgroundRemoval).await;
        assert_eq!(result, Err(EditError::MissingParameter("url")));
    }

    #[tokio::test]
    async fn test_transcription_is_not_a_layer_edit() {
        let result = apply_to_layer(
            &ready_context(),
            &source(),
            Operation::Transcription {
                public_id: "photo".to_string(),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(EditError::InvalidParameter { name: "operation", .. })
        ));
    }

    #[test]
    fn test_with_transcription_keeps_identity() {
        let source = source();
        let url = build_transform_url(&TransformRequest::new(
            "https://cdn.example/acct/video/upload/v1/clip.mp4",
            Operation::Transcription {
                public_id: "clip".to_string(),
            },
            "mp4",
        ))
        .unwrap();
        let layer = with_transcription(&source, &url);
        assert_eq!(layer.id, source.id);
        assert_eq!(layer.transcription_url.as_deref(), Some(url.as_str()));
    }
}
