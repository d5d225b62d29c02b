//! Pixelsmith Core Library
//!
//! This crate provides the edit data model, error taxonomy, configuration and the
//! transformation URL builder shared by every pixelsmith component. Nothing in here
//! touches the network.

pub mod config;
pub mod error;
pub mod models;
pub mod transform_url;

// Re-export commonly used types
pub use config::{AdminCredentials, EditorConfig, TelemetryConfig};
pub use error::{EditError, ErrorMetadata, LogLevel};
pub use models::{
    ActionResult, AssetDescriptor, DerivedAssetUrl, ExtractMode, Layer, Operation, ParamValue,
    PollConfig, PollOutcome, PollPolicy, QualityPreset, ResourceKind, TransformRequest,
};
pub use transform_url::{build_transform_url, UPLOAD_MARKER};
