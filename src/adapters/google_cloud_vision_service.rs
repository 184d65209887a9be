use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::core::interfaces::adapters::VisionAnnotationService;
use crate::core::models::{AnnotationRequest, AnnotationResult, AnnotatorSettings};

pub struct GoogleCloudVisionService {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_results: u32,
}

impl GoogleCloudVisionService {
    pub fn build(endpoint: String, api_key: String, max_results: u32, timeout: Duration) -> Result<Self> {
        log::info!(
            "[VISION_API] Initializing client for {} (timeout {:?})",
            endpoint,
            timeout
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            max_results,
        })
    }

    pub fn from_settings(settings: &AnnotatorSettings, api_key: String) -> Result<Self> {
        Self::build(
            settings.vision_api_url.clone(),
            api_key,
            settings.max_results,
            settings.request_timeout(),
        )
    }

    fn request_url(&self) -> String {
        format!("{}?key={}", self.endpoint, self.api_key)
    }

    async fn post_annotation_request(&self, request: &AnnotationRequest) -> Result<Value> {
        let response = self
            .client
            .post(self.request_url())
            .json(request)
            .send()
            .await
            .map_err(without_url)?;

        log::debug!("[VISION_API] Response status: {}", response.status());

        let response = response.error_for_status().map_err(without_url)?;
        let response_text = response.text().await.map_err(without_url)?;

        let json: Value = serde_json::from_str(&response_text)
            .context("Malformed vision response: body is not valid JSON")?;

        Ok(json)
    }
}

// The request URL carries the API key, so it must never reach an error message.
fn without_url(error: reqwest::Error) -> anyhow::Error {
    anyhow::Error::new(error.without_url())
}

#[async_trait]
impl VisionAnnotationService for GoogleCloudVisionService {
    async fn annotate(&self, image_bytes: &[u8]) -> AnnotationResult {
        log::info!(
            "[VISION_API] Requesting annotations for {} bytes",
            image_bytes.len()
        );

        let request = AnnotationRequest::for_image(image_bytes, self.max_results);

        let result = match self.post_annotation_request(&request).await {
            Ok(raw_response) => AnnotationResult::from_response_body(raw_response),
            Err(error) => AnnotationResult::failure(format!("{:#}", error)),
        };

        match &result {
            AnnotationResult::Success(annotations) => log::info!(
                "[VISION_API] Received {} labels, {} text blocks, {} objects",
                annotations.labels.len(),
                annotations.text_blocks.len(),
                annotations.objects.len()
            ),
            AnnotationResult::Failure { message } => {
                log::warn!("[VISION_API] Annotation failed: {}", message)
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const TEST_KEY: &str = "secret-test-key";

    fn find_header_end(buffer: &[u8]) -> Option<usize> {
        buffer.windows(4).position(|window| window == b"\r\n\r\n")
    }

    async fn read_http_request(socket: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let read = socket.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);

            if let Some(header_end) = find_header_end(&buffer) {
                let headers = String::from_utf8_lossy(&buffer[..header_end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);

                if buffer.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buffer).into_owned()
    }

    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_http_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{}/v1/images:annotate", address), handle)
    }

    fn build_service(endpoint: String, timeout: Duration) -> GoogleCloudVisionService {
        GoogleCloudVisionService::build(endpoint, TEST_KEY.to_string(), 10, timeout).unwrap()
    }

    #[tokio::test]
    async fn test_annotate_posts_payload_with_key_in_query() {
        let (endpoint, server) = serve_once("200 OK", r#"{"responses":[{}]}"#).await;
        let service = build_service(endpoint, Duration::from_secs(5));

        let result = service.annotate(b"hello").await;
        let request = server.await.unwrap();

        assert!(result.is_success());
        assert!(request.starts_with("POST /v1/images:annotate?key=secret-test-key HTTP/1.1"));
        assert!(request.contains(r#""content":"aGVsbG8=""#));
        assert!(request.contains(r#""type":"LABEL_DETECTION""#));
        assert!(request.contains(r#""type":"TEXT_DETECTION""#));
        assert!(request.contains(r#""type":"OBJECT_LOCALIZATION""#));
        assert!(request.contains(r#""maxResults":10"#));
    }

    #[tokio::test]
    async fn test_annotate_maps_empty_response_entry_to_empty_success() {
        let (endpoint, _server) = serve_once("200 OK", r#"{"responses":[{}]}"#).await;
        let service = build_service(endpoint, Duration::from_secs(5));

        match service.annotate(b"img").await {
            AnnotationResult::Success(annotations) => {
                assert!(annotations.labels.is_empty());
                assert!(annotations.text_blocks.is_empty());
                assert!(annotations.objects.is_empty());
            }
            AnnotationResult::Failure { message } => panic!("unexpected failure: {}", message),
        }
    }

    #[tokio::test]
    async fn test_annotate_maps_server_error_status_to_failure() {
        let (endpoint, _server) =
            serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let service = build_service(endpoint, Duration::from_secs(5));

        match service.annotate(b"img").await {
            AnnotationResult::Failure { message } => {
                assert!(message.contains("500"));
                assert!(!message.contains(TEST_KEY));
            }
            AnnotationResult::Success(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_annotate_maps_non_json_body_to_failure() {
        let (endpoint, _server) = serve_once("200 OK", "<html>not json</html>").await;
        let service = build_service(endpoint, Duration::from_secs(5));

        match service.annotate(b"img").await {
            AnnotationResult::Failure { message } => assert!(message.contains("not valid JSON")),
            AnnotationResult::Success(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_annotate_maps_connection_refused_to_failure_without_key() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        let service = build_service(
            format!("http://{}/v1/images:annotate", address),
            Duration::from_secs(5),
        );

        match service.annotate(b"img").await {
            AnnotationResult::Failure { message } => {
                assert!(!message.is_empty());
                assert!(!message.contains(TEST_KEY));
            }
            AnnotationResult::Success(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_annotate_times_out_on_silent_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });
        let service = build_service(
            format!("http://{}/v1/images:annotate", address),
            Duration::from_millis(200),
        );

        let result = service.annotate(b"img").await;

        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_annotate_twice_yields_same_shape() {
        let body = r#"{"responses":[{"labelAnnotations":[{"description":"Cat","score":0.9}]}]}"#;
        let (first_endpoint, _first) = serve_once("200 OK", body).await;
        let (second_endpoint, _second) = serve_once("200 OK", body).await;

        let first = build_service(first_endpoint, Duration::from_secs(5))
            .annotate(b"same")
            .await;
        let second = build_service(second_endpoint, Duration::from_secs(5))
            .annotate(b"same")
            .await;

        match (first, second) {
            (AnnotationResult::Success(a), AnnotationResult::Success(b)) => {
                assert_eq!(a.labels.len(), b.labels.len());
                assert_eq!(a.text_blocks.len(), b.text_blocks.len());
                assert_eq!(a.objects.len(), b.objects.len());
            }
            _ => panic!("expected two successes"),
        }
    }
}
