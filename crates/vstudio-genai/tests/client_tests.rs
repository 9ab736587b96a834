//! HTTP-level tests for the generative service client.

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vstudio_genai::{
    ContentPart, ContentRequest, FrameInput, GenAiClient, GenAiConfig, GenAiError,
    ReasoningService, VideoJobConfig, VideoJobRequest, VideoJobService,
};
use vstudio_models::{AspectRatio, JobHandle, UploadedImage};

// =============================================================================
// Test Helpers
// =============================================================================

fn client_for(server: &MockServer) -> GenAiClient {
    GenAiClient::new(GenAiConfig::new("test-key").with_base_url(server.uri())).unwrap()
}

fn frame(bytes: &[u8], mime: &str) -> FrameInput {
    FrameInput::from_image(&UploadedImage::new(bytes.to_vec(), mime, "frame").unwrap())
}

fn video_request() -> VideoJobRequest {
    VideoJobRequest {
        model: "veo-3.1-fast-generate-preview".into(),
        prompt: "A sweeping pan".into(),
        start_frame: frame(b"first", "image/png"),
        end_frame: frame(b"last", "image/jpeg"),
        config: VideoJobConfig {
            aspect_ratio: AspectRatio::Portrait,
            ..Default::default()
        },
    }
}

// =============================================================================
// generateContent
// =============================================================================

#[tokio::test]
async fn test_generate_content_sends_parts_and_system_instruction() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-3-flash-preview:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Dolly in slowly."}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ContentRequest::new("gemini-3-flash-preview")
        .with_part(ContentPart::bytes("image/png", b"img"))
        .with_part(ContentPart::text("Make a prompt"))
        .with_system_instruction("You are a director");

    let response = client_for(&server).generate_content(&request).await.unwrap();
    assert_eq!(response.text().as_deref(), Some("Dolly in slowly."));

    let received = server.received_requests().await.unwrap();
    let body: Value = received[0].body_json().unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["data"], "aW1n");
    assert_eq!(body["contents"][0]["parts"][1]["text"], "Make a prompt");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are a director");
}

#[tokio::test]
async fn test_generate_content_returns_inline_images() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash-image:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [
                {"text": "Edited."},
                {"inlineData": {"mimeType": "image/png", "data": "ZWRpdGVk"}}
            ]}}]
        })))
        .mount(&server)
        .await;

    let request = ContentRequest::new("gemini-2.5-flash-image").with_part(ContentPart::text("edit"));
    let response = client_for(&server).generate_content(&request).await.unwrap();

    let image = response.inline_images().next().unwrap();
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.decode().unwrap(), b"edited");
}

#[tokio::test]
async fn test_generate_content_maps_not_found_to_credential_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let request = ContentRequest::new("gemini-3-flash-preview").with_part(ContentPart::text("x"));
    let err = client_for(&server).generate_content(&request).await.unwrap_err();

    assert!(matches!(err, GenAiError::Api { status: 404, .. }));
    assert!(err.is_credential_error());
}

#[tokio::test]
async fn test_generate_content_server_error_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let request = ContentRequest::new("gemini-3-flash-preview").with_part(ContentPart::text("x"));
    let err = client_for(&server).generate_content(&request).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(!err.is_credential_error());
}

// =============================================================================
// Video jobs
// =============================================================================

#[tokio::test]
async fn test_submit_video_job() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/veo-3.1-fast-generate-preview:predictLongRunning"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "models/veo-3.1-fast-generate-preview/operations/op-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handle = client_for(&server).submit(&video_request()).await.unwrap();
    assert_eq!(handle.name, "models/veo-3.1-fast-generate-preview/operations/op-1");
    assert!(!handle.done);

    let received = server.received_requests().await.unwrap();
    let body: Value = received[0].body_json().unwrap();
    assert_eq!(body["instances"][0]["prompt"], "A sweeping pan");
    assert_eq!(body["instances"][0]["image"]["mimeType"], "image/png");
    assert_eq!(body["instances"][0]["lastFrame"]["mimeType"], "image/jpeg");
    assert_eq!(body["parameters"]["sampleCount"], 1);
    assert_eq!(body["parameters"]["resolution"], "1080p");
    assert_eq!(body["parameters"]["aspectRatio"], "9:16");
}

#[tokio::test]
async fn test_poll_until_done() {
    let server = MockServer::start().await;
    let op = "models/veo/operations/op-2";

    Mock::given(method("GET"))
        .and(path(format!("/{}", op)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": op, "done": false})))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", op)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": op,
            "done": true,
            "response": {"generateVideoResponse": {"generatedSamples": [
                {"video": {"uri": format!("{}/files/video-1:download?alt=media", server.uri())}}
            ]}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let handle = JobHandle::pending(op);

    let first = client.poll(&handle).await.unwrap();
    assert!(!first.done);

    let second = client.poll(&first).await.unwrap();
    assert!(second.done);
    assert!(second.first_result().unwrap().contains("/files/video-1:download"));
}

#[tokio::test]
async fn test_poll_reports_operation_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operations/bad",
            "done": true,
            "error": {"code": 3, "message": "Frame rejected"}
        })))
        .mount(&server)
        .await;

    let handle = client_for(&server)
        .poll(&JobHandle::pending("operations/bad"))
        .await
        .unwrap();
    assert!(handle.done);
    assert_eq!(handle.failure.unwrap().message, "Frame rejected");
}

#[tokio::test]
async fn test_fetch_result_is_authenticated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/video-1:download"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let uri = format!("{}/files/video-1:download?alt=media", server.uri());
    let bytes = client_for(&server).fetch_result(&uri).await.unwrap();
    assert_eq!(bytes, b"mp4-bytes");
}

#[tokio::test]
async fn test_fetch_result_rejects_invalid_uri() {
    let server = MockServer::start().await;
    let err = client_for(&server).fetch_result("not a uri").await.unwrap_err();
    assert!(matches!(err, GenAiError::InvalidResponse(_)));
}
