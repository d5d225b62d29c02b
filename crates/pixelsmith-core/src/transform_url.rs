//! Transformation URL builder
//!
//! Derived assets are addressed by splicing a transformation token into the
//! delivery URL of the source asset, right after the `/upload/` marker:
//!
//! ```text
//! https://cdn.example/acct/upload/v1/photo.jpg
//! https://cdn.example/acct/upload/e_background_removal/v1/photo.png
//! ```
//!
//! Building a URL is pure: no clock, no randomness, no I/O. The same request always
//! yields byte-identical output, which is what lets the poller use the URL as its
//! probe target.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::EditError;
use crate::models::{DerivedAssetUrl, ExtractMode, Operation, TransformRequest};

/// Path marker separating the service root from the per-asset path.
pub const UPLOAD_MARKER: &str = "/upload/";

/// Output format for operations that produce transparency.
pub const TRANSPARENT_FORMAT: &str = "png";

/// Characters left untouched by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Public IDs nest folders with ':' inside overlay tokens.
const OVERLAY_PUBLIC_ID: &AsciiSet = &URI_COMPONENT.remove(b':');

/// Build the URL of the asset derived by applying `request.operation` to
/// `request.base_url`.
///
/// Fails with [`EditError::InvalidUrlFormat`] when the base URL has no `/upload/`
/// marker or either side of it is empty.
///
/// # Example
///
/// ```rust
/// use pixelsmith_core::models::{Operation, TransformRequest};
/// use pixelsmith_core::transform_url::build_transform_url;
///
/// let request = TransformRequest::new(
///     "https://cdn.example/acct/upload/v1/photo.jpg",
///     Operation::BackgroundRemoval,
///     "jpg",
/// );
/// let url = build_transform_url(&request).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://cdn.example/acct/upload/e_background_removal/v1/photo.png"
/// );
/// ```
pub fn build_transform_url(request: &TransformRequest) -> Result<DerivedAssetUrl, EditError> {
    let (root, asset_path) = split_upload_url(&request.base_url)?;

    let asset_path = if request.operation.requires_transparency() {
        retarget_format(asset_path, &request.source_format, TRANSPARENT_FORMAT)
    } else {
        asset_path.to_string()
    };

    let url = match transformation_token(&request.operation) {
        Some(token) => format!("{}{}{}/{}", root, UPLOAD_MARKER, token, asset_path),
        None => format!("{}{}{}", root, UPLOAD_MARKER, asset_path),
    };

    tracing::debug!(
        operation = request.operation.name(),
        url = %url,
        "Constructed URL successfully"
    );

    Ok(DerivedAssetUrl::new(url))
}

/// Split a delivery URL at the first `/upload/` marker into (root, asset path).
pub fn split_upload_url(url: &str) -> Result<(&str, &str), EditError> {
    let (root, asset_path) = url.split_once(UPLOAD_MARKER).ok_or_else(|| {
        EditError::InvalidUrlFormat(format!("'{}' has no {} segment", url, UPLOAD_MARKER))
    })?;

    if root.is_empty() || asset_path.is_empty() {
        return Err(EditError::InvalidUrlFormat(format!(
            "'{}' is missing the service root or the asset path",
            url
        )));
    }

    Ok((root, asset_path))
}

/// Transformation token for an operation, `None` when the asset is delivered as is.
pub fn transformation_token(operation: &Operation) -> Option<String> {
    match operation {
        Operation::BackgroundRemoval => Some("e_background_removal".to_string()),
        Operation::BackgroundReplace { prompt } => match prompt {
            Some(p) if !p.trim().is_empty() => Some(format!(
                "e_gen_background_replace:prompt_{}",
                encode_component(p)
            )),
            _ => Some("e_gen_background_replace".to_string()),
        },
        Operation::GenerativeFill {
            aspect_ratio,
            width,
            height,
        } => Some(format!(
            "ar_{},b_gen_fill,c_pad,w_{},h_{}",
            aspect_ratio, width, height
        )),
        Operation::GenerativeRemove { prompt } => {
            Some(format!("e_gen_remove:prompt_{}", encode_component(prompt)))
        }
        Operation::AreaExtract {
            prompts,
            multiple,
            mode,
            invert,
        } => {
            let joined = prompts
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| encode_component(p))
                .collect::<Vec<_>>()
                .join(";");

            let mut token = format!("e_extract:prompt_({})", joined);
            if *multiple {
                token.push_str(";multiple_true");
            }
            if *mode == ExtractMode::Mask {
                token.push_str(";mode_mask");
            }
            if *invert {
                token.push_str(";invert_true");
            }
            Some(token)
        }
        Operation::SmartCrop {
            aspect_ratio,
            height,
        } => Some(format!("ar_{},c_fill,g_auto,h_{}", aspect_ratio, height)),
        Operation::Transcription { public_id } => {
            let overlay_id = public_id.replace('/', ":");
            Some(format!(
                "l_subtitles:{}.transcript/fl_layer_apply",
                utf8_percent_encode(&overlay_id, OVERLAY_PUBLIC_ID)
            ))
        }
        Operation::Quality { preset } => preset.token().map(str::to_string),
    }
}

/// Percent-encode free text the way browsers' `encodeURIComponent` does.
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Swap the extension of an asset path for `target`.
///
/// The declared `source_format` is stripped when the path ends with it (any case);
/// otherwise the last extension of the final segment is replaced, or `target` is
/// appended when there is none.
fn retarget_format(asset_path: &str, source_format: &str, target: &str) -> String {
    if !source_format.is_empty() {
        let suffix = format!(".{}", source_format);
        let split_at = asset_path.len().saturating_sub(suffix.len());
        if asset_path.len() > suffix.len() {
            if let Some(tail) = asset_path.get(split_at..) {
                if tail.eq_ignore_ascii_case(&suffix) {
                    return format!("{}.{}", &asset_path[..split_at], target);
                }
            }
        }
    }

    let segment_start = asset_path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match asset_path[segment_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            format!("{}.{}", &asset_path[..segment_start + dot], target)
        }
        _ => format!("{}.{}", asset_path, target),
    }
}
