//! The generic edit template: validate, build, poll, return.

use pixelsmith_core::transform_url::build_transform_url;
use pixelsmith_core::{
    DerivedAssetUrl, EditError, ErrorMetadata, LogLevel, ResourceKind, TransformRequest,
};
use pixelsmith_processing::poll_resource;

use crate::context::EditorContext;

/// Run one edit operation to completion.
///
/// Invalid parameters fail before anything is built or probed. A malformed base
/// URL fails before any network access. Otherwise the derived URL is polled with
/// the policy for `kind` and returned once the remote service serves it.
#[tracing::instrument(
    skip_all,
    fields(operation = request.operation.name(), kind = %kind)
)]
pub async fn run_operation(
    ctx: &EditorContext,
    request: &TransformRequest,
    kind: ResourceKind,
) -> Result<DerivedAssetUrl, EditError> {
    let result = execute(ctx, request, kind).await;
    if let Err(e) = &result {
        log_failure(e);
    }
    result
}

async fn execute(
    ctx: &EditorContext,
    request: &TransformRequest,
    kind: ResourceKind,
) -> Result<DerivedAssetUrl, EditError> {
    request.operation.validate()?;

    tracing::info!(
        base_url = %request.base_url,
        parameters = ?request.operation.parameters(),
        "Starting edit"
    );

    let url = build_transform_url(request)?;
    tracing::info!(url = %url, "Waiting for derived asset");

    let attempts = poll_resource(
        ctx.prober(),
        url.as_str(),
        kind,
        ctx.poll_policy(),
        ctx.cancellation_token(),
    )
    .await?;

    tracing::info!(url = %url, attempts, "Edit completed");
    Ok(url)
}

pub(crate) fn log_failure(error: &EditError) {
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_code, "Edit failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_code, "Edit failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_code, "Edit failed");
        }
    }
}
