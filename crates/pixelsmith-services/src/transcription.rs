//! Video transcription: request a transcript through the admin API, wait for the
//! conversion to finish, then return a URL with the transcript overlaid as subtitles.

use pixelsmith_api_client::ApiClient;
use pixelsmith_core::transform_url::build_transform_url;
use pixelsmith_core::{DerivedAssetUrl, EditError, Operation, TransformRequest};
use pixelsmith_processing::{poll_until_ready, PollError, TranscriptionStatusProber};
use serde::{Deserialize, Serialize};

use crate::context::EditorContext;
use crate::orchestrator::log_failure;

const TRANSCRIPTION_FAILED_MESSAGE: &str = "Video transcription failed. Please try again later.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionRequest {
    /// Delivery URL of the video
    pub asset_url: String,
    pub public_id: String,
}

/// Transcribe a video and return its subtitled delivery URL.
///
/// The conversion is polled with the transcription policy through `admin`, not
/// by probing a URL. A failed conversion ends the poll immediately.
#[tracing::instrument(skip_all, fields(public_id = %request.public_id))]
pub async fn transcribe_video(
    ctx: &EditorContext,
    admin: &ApiClient,
    request: &TranscriptionRequest,
) -> Result<DerivedAssetUrl, EditError> {
    let result = execute(ctx, admin, request).await;
    if let Err(e) = &result {
        log_failure(e);
    }
    result
}

async fn execute(
    ctx: &EditorContext,
    admin: &ApiClient,
    request: &TranscriptionRequest,
) -> Result<DerivedAssetUrl, EditError> {
    let transform = TransformRequest::new(
        request.asset_url.clone(),
        Operation::Transcription {
            public_id: request.public_id.clone(),
        },
        "",
    );
    transform.operation.validate()?;
    // Reject a bad delivery URL before asking for a paid conversion.
    let url = build_transform_url(&transform)?;

    admin
        .request_transcription(&request.public_id)
        .await
        .map_err(|e| EditError::RemoteRequest(e.to_string()))?;
    tracing::info!("Transcription requested, waiting for conversion");

    let prober = TranscriptionStatusProber::new(admin.clone());
    let attempts = poll_until_ready(
        &prober,
        &request.public_id,
        &ctx.poll_policy().transcription,
        ctx.cancellation_token(),
    )
    .await
    .map_err(|e| match e {
        PollError::Failed { .. } => {
            EditError::ProcessingFailed(TRANSCRIPTION_FAILED_MESSAGE.to_string())
        }
        other => other.into(),
    })?;

    tracing::info!(url = %url, attempts, "Transcription ready");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelsmith_core::{AdminCredentials, PollConfig, PollOutcome, PollPolicy};
    use pixelsmith_processing::test_helpers::ScriptedProber;
    use std::sync::Arc;

    fn admin_for(server: &mockito::ServerGuard) -> ApiClient {
        let credentials = AdminCredentials {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        };
        ApiClient::from_credentials(&server.url(), &credentials).unwrap()
    }

    fn context() -> EditorContext {
        let policy = PollPolicy {
            transcription: PollConfig::new(3, 10, 20, 2.0).unwrap(),
            ..PollPolicy::default()
        };
        EditorContext::new(Arc::new(ScriptedProber::always(PollOutcome::Ready)), policy)
    }

    fn request() -> TranscriptionRequest {
        TranscriptionRequest {
            asset_url: "https://cdn.example/demo/video/upload/v1/clips/intro.mp4".to_string(),
            public_id: "clips/intro".to_string(),
        }
    }

    fn status_json(status: &str) -> String {
        format!(
            r#"{{"public_id":"clips/intro","info":{{"raw_convert":{{"google_speech":{{"status":"{}"}}}}}}}}"#,
            status
        )
    }

    #[tokio::test]
    async fn test_transcription_completes() {
        let mut server = mockito::Server::new_async().await;
        let mutation = server
            .mock("POST", "/demo/resources/video/upload/clips/intro")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(status_json("pending"))
            .create_async()
            .await;
        let status = server
            .mock("GET", "/demo/resources/video/upload/clips/intro")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(status_json("complete"))
            .create_async()
            .await;

        let url = transcribe_video(&context(), &admin_for(&server), &request())
            .await
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://cdn.example/demo/video/upload/l_subtitles:clips:intro.transcript/fl_layer_apply/v1/clips/intro.mp4"
        );
        mutation.assert_async().await;
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_conversion_is_processing_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/demo/resources/video/upload/clips/intro")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(status_json("pending"))
            .create_async()
            .await;
        let status = server
            .mock("GET", "/demo/resources/video/upload/clips/intro")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(status_json("failed"))
            .expect(1)
            .create_async()
            .await;

        let result = transcribe_video(&context(), &admin_for(&server), &request()).await;

        assert_eq!(
            result,
            Err(EditError::ProcessingFailed(
                TRANSCRIPTION_FAILED_MESSAGE.to_string()
            ))
        );
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_pending_conversion_times_out() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/demo/resources/video/upload/clips/intro")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(status_json("pending"))
            .create_async()
            .await;
        let status = server
            .mock("GET", "/demo/resources/video/upload/clips/intro")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(status_json("pending"))
            .expect(3)
            .create_async()
            .await;

        let result = transcribe_video(&context(), &admin_for(&server), &request()).await;

        assert_eq!(result, Err(EditError::ProcessingTimeout { attempts: 3 }));
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_mutation_is_remote_request_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/demo/resources/video/upload/clips/intro")
            .with_status(401)
            .with_body("invalid credentials")
            .create_async()
            .await;
        let status = server
            .mock("GET", "/demo/resources/video/upload/clips/intro")
            .expect(0)
            .create_async()
            .await;

        let result = transcribe_video(&context(), &admin_for(&server), &request()).await;

        assert!(matches!(result, Err(EditError::RemoteRequest(_))));
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_public_id_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mutation = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let request = TranscriptionRequest {
            public_id: " ".to_string(),
            ..request()
        };
        let result = transcribe_video(&context(), &admin_for(&server), &request).await;

        assert_eq!(result, Err(EditError::MissingParameter("public_id")));
        mutation.assert_async().await;
    }
}
