use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::EditError;

/// Kind of remote resource being polled. Selects the polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Video,
}

impl FromStr for ResourceKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(ResourceKind::Image),
            "video" => Ok(ResourceKind::Video),
            _ => Err(EditError::InvalidParameter {
                name: "resource_type",
                reason: format!("expected 'image' or 'video', got '{}'", s),
            }),
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ResourceKind::Image => write!(f, "image"),
            ResourceKind::Video => write!(f, "video"),
        }
    }
}

/// A freshly uploaded asset, as reported by the media service's upload response.
///
/// Only the fields the editor consumes are kept; everything else in the upload
/// response is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// HTTPS delivery URL (`secure_url` in the upload response)
    #[serde(rename = "secure_url")]
    pub url: String,
    pub public_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub format: String,
    pub resource_type: ResourceKind,
    #[serde(default)]
    pub original_filename: Option<String>,
}
