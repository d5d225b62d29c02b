//! Domain models

pub mod action_result;
pub mod layer;
pub mod operation;
pub mod poll;
pub mod request;
pub mod resource;

pub use action_result::ActionResult;
pub use layer::Layer;
pub use operation::{ExtractMode, Operation, ParamValue, QualityPreset};
pub use poll::{PollConfig, PollOutcome, PollPolicy};
pub use request::{DerivedAssetUrl, TransformRequest};
pub use resource::{AssetDescriptor, ResourceKind};
