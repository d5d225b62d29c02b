use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::models::Operation;

/// A request to derive a new asset from an uploaded one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformRequest {
    /// Delivery URL of the source asset; must contain `/upload/`
    pub base_url: String,
    #[serde(flatten)]
    pub operation: Operation,
    /// Declared format (extension) of the source asset, e.g. "jpg"
    #[serde(default)]
    pub source_format: String,
}

impl TransformRequest {
    pub fn new(
        base_url: impl Into<String>,
        operation: Operation,
        source_format: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            operation,
            source_format: source_format.into(),
        }
    }
}

/// URL of a derived asset. Identical requests always produce identical URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivedAssetUrl(String);

impl DerivedAssetUrl {
    pub(crate) fn new(url: String) -> Self {
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<DerivedAssetUrl> for String {
    fn from(url: DerivedAssetUrl) -> Self {
        url.0
    }
}

impl AsRef<str> for DerivedAssetUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for DerivedAssetUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
