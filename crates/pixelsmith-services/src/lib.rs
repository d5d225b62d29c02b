//! Pixelsmith Services Layer
//!
//! Orchestrates edits: validate the request, build the derived asset URL, poll
//! until the remote service has produced it, hand back the result. Every edit
//! operation goes through the single [`run_operation`] template; transcription
//! and export are thin variations on it.

pub mod context;
pub mod export;
pub mod layers;
pub mod orchestrator;
pub mod transcription;

pub use context::EditorContext;
pub use export::{export_asset, ExportRequest, ExportedAsset};
pub use layers::{apply_to_layer, with_transcription};
pub use orchestrator::run_operation;
pub use transcription::{transcribe_video, TranscriptionRequest};

pub use pixelsmith_api_client::ApiClient;
pub use pixelsmith_processing::{CancellationToken, HttpProber, Prober};
