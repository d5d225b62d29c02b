use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::EditError;
use crate::models::ResourceKind;

/// An edit the remote media service performs for us, together with its parameters.
///
/// Serialized with an `operation` tag so a flat JSON mapping of parameter names to
/// values deserializes straight into the right variant:
///
/// ```rust
/// use pixelsmith_core::models::Operation;
///
/// let op: Operation = serde_json::from_str(
///     r#"{"operation":"smart_crop","aspect_ratio":"9:16","height":1080}"#,
/// ).unwrap();
/// assert_eq!(op.name(), "smart_crop");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    BackgroundRemoval,
    BackgroundReplace {
        #[serde(default)]
        prompt: Option<String>,
    },
    GenerativeFill {
        aspect_ratio: String,
        width: u32,
        height: u32,
    },
    GenerativeRemove {
        prompt: String,
    },
    AreaExtract {
        prompts: Vec<String>,
        #[serde(default)]
        multiple: bool,
        #[serde(default)]
        mode: ExtractMode,
        #[serde(default)]
        invert: bool,
    },
    SmartCrop {
        aspect_ratio: String,
        height: u32,
    },
    Transcription {
        public_id: String,
    },
    Quality {
        preset: QualityPreset,
    },
}

/// Output of an area extraction: the extracted pixels, or a mask of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    #[default]
    Content,
    Mask,
}

/// Download quality presets offered when exporting an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Original,
    Large,
    Medium,
    Small,
}

/// A single parameter value, as seen when an operation is flattened for logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Number(u32),
    Flag(bool),
    List(Vec<String>),
}

impl Operation {
    /// Stable snake_case name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::BackgroundRemoval => "background_removal",
            Operation::BackgroundReplace { .. } => "background_replace",
            Operation::GenerativeFill { .. } => "generative_fill",
            Operation::GenerativeRemove { .. } => "generative_remove",
            Operation::AreaExtract { .. } => "area_extract",
            Operation::SmartCrop { .. } => "smart_crop",
            Operation::Transcription { .. } => "transcription",
            Operation::Quality { .. } => "quality",
        }
    }

    /// Operations whose output needs an alpha channel and is re-targeted to PNG.
    pub fn requires_transparency(&self) -> bool {
        matches!(
            self,
            Operation::BackgroundRemoval | Operation::AreaExtract { .. }
        )
    }

    /// Resource kind an operation is normally applied to. Quality exports follow the
    /// asset and report `None`.
    pub fn default_resource_kind(&self) -> Option<ResourceKind> {
        match self {
            Operation::SmartCrop { .. } | Operation::Transcription { .. } => {
                Some(ResourceKind::Video)
            }
            Operation::Quality { .. } => None,
            _ => Some(ResourceKind::Image),
        }
    }

    /// Ordered name/value view of the parameters.
    pub fn parameters(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            Operation::BackgroundRemoval => Vec::new(),
            Operation::BackgroundReplace { prompt } => prompt
                .iter()
                .map(|p| ("prompt", ParamValue::Text(p.clone())))
                .collect(),
            Operation::GenerativeFill {
                aspect_ratio,
                width,
                height,
            } => vec![
                ("aspect_ratio", ParamValue::Text(aspect_ratio.clone())),
                ("width", ParamValue::Number(*width)),
                ("height", ParamValue::Number(*height)),
            ],
            Operation::GenerativeRemove { prompt } => {
                vec![("prompt", ParamValue::Text(prompt.clone()))]
            }
            Operation::AreaExtract {
                prompts,
                multiple,
                mode,
                invert,
            } => vec![
                ("prompts", ParamValue::List(prompts.clone())),
                ("multiple", ParamValue::Flag(*multiple)),
                ("mode", ParamValue::Text(mode.to_string())),
                ("invert", ParamValue::Flag(*invert)),
            ],
            Operation::SmartCrop {
                aspect_ratio,
                height,
            } => vec![
                ("aspect_ratio", ParamValue::Text(aspect_ratio.clone())),
                ("height", ParamValue::Number(*height)),
            ],
            Operation::Transcription { public_id } => {
                vec![("public_id", ParamValue::Text(public_id.clone()))]
            }
            Operation::Quality { preset } => {
                vec![("preset", ParamValue::Text(preset.to_string()))]
            }
        }
    }

    /// Check required inputs. Runs before any URL is built or any request is sent.
    pub fn validate(&self) -> Result<(), EditError> {
        match self {
            Operation::BackgroundRemoval
            | Operation::BackgroundReplace { .. }
            | Operation::Quality { .. } => Ok(()),
            Operation::GenerativeFill {
                aspect_ratio,
                width,
                height,
            } => {
                validate_aspect_ratio(aspect_ratio)?;
                validate_dimension("width", *width)?;
                validate_dimension("height", *height)
            }
            Operation::GenerativeRemove { prompt } => {
                if prompt.trim().is_empty() {
                    return Err(EditError::MissingParameter("prompt"));
                }
                Ok(())
            }
            Operation::AreaExtract { prompts, .. } => {
                if prompts.iter().all(|p| p.trim().is_empty()) {
                    return Err(EditError::MissingParameter("prompts"));
                }
                Ok(())
            }
            Operation::SmartCrop {
                aspect_ratio,
                height,
            } => {
                validate_aspect_ratio(aspect_ratio)?;
                validate_dimension("height", *height)
            }
            Operation::Transcription { public_id } => {
                if public_id.trim().is_empty() {
                    return Err(EditError::MissingParameter("public_id"));
                }
                Ok(())
            }
        }
    }
}

fn validate_aspect_ratio(aspect_ratio: &str) -> Result<(), EditError> {
    if aspect_ratio.trim().is_empty() {
        return Err(EditError::MissingParameter("aspect_ratio"));
    }
    // Ratios are embedded raw in a path segment.
    if aspect_ratio
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == ':' || c == '.'))
    {
        return Err(EditError::InvalidParameter {
            name: "aspect_ratio",
            reason: format!("unsupported characters in '{}'", aspect_ratio),
        });
    }
    Ok(())
}

fn validate_dimension(name: &'static str, value: u32) -> Result<(), EditError> {
    if value == 0 {
        return Err(EditError::InvalidParameter {
            name,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

impl QualityPreset {
    /// Quality transformation token, `None` for the untouched original.
    pub fn token(&self) -> Option<&'static str> {
        match self {
            QualityPreset::Original => None,
            QualityPreset::Large => Some("q_80"),
            QualityPreset::Medium => Some("q_50"),
            QualityPreset::Small => Some("q_30"),
        }
    }
}

impl FromStr for QualityPreset {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" => Ok(QualityPreset::Original),
            "large" => Ok(QualityPreset::Large),
            "medium" => Ok(QualityPreset::Medium),
            "small" => Ok(QualityPreset::Small),
            _ => Err(EditError::InvalidParameter {
                name: "quality",
                reason: format!("unknown quality preset '{}'", s),
            }),
        }
    }
}

impl Display for QualityPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            QualityPreset::Original => write!(f, "original"),
            QualityPreset::Large => write!(f, "large"),
            QualityPreset::Medium => write!(f, "medium"),
            QualityPreset::Small => write!(f, "small"),
        }
    }
}

impl FromStr for ExtractMode {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "content" => Ok(ExtractMode::Content),
            "mask" => Ok(ExtractMode::Mask),
            _ => Err(EditError::InvalidParameter {
                name: "mode",
                reason: format!("expected 'content' or 'mask', got '{}'", s),
            }),
        }
    }
}

impl Display for ExtractMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ExtractMode::Content => write!(f, "content"),
            ExtractMode::Mask => write!(f, "mask"),
        }
    }
}
