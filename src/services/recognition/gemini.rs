use super::schema::{build_request, parse_reply, reply_text, GenerateContentResponse};
use super::PlateRecognizer;
use crate::error::RecognitionError;
use crate::models::config::RecognitionConfig;
use crate::models::image::SelectedImage;
use crate::models::scan_record::RecognitionResult;
use async_trait::async_trait;
use std::time::Duration;

/// HTTP client for the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &RecognitionConfig, api_key: Option<String>) -> Result<Self, RecognitionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RecognitionError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl PlateRecognizer for GeminiClient {
    async fn recognize(&self, image: &SelectedImage) -> Result<RecognitionResult, RecognitionError> {
        let api_key = self.api_key.as_ref().ok_or(RecognitionError::MissingApiKey)?;
        let url = self.endpoint_url();

        tracing::debug!(
            model = %self.model,
            mime_type = %image.mime_type,
            payload_bytes = image.data.len(),
            "sending recognition request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&build_request(image))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecognitionError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::Malformed(format!("Failed to parse response: {}", e)))?;

        let text = reply_text(&data).ok_or(RecognitionError::EmptyResponse)?;
        parse_reply(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> GeminiClient {
        let config = RecognitionConfig {
            endpoint: format!("{}/", server.uri()),
            model: "gemini-test".to_string(),
            api_key: None,
            timeout_secs: 5,
        };
        GeminiClient::new(&config, api_key.map(str::to_string)).unwrap()
    }

    fn image() -> SelectedImage {
        SelectedImage {
            mime_type: "image/png".to_string(),
            data: "iVBORw0KGgo=".to_string(),
        }
    }

    fn reply_with(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn test_recognize_success() {
        let server = MockServer::start().await;
        let payload = r#"{"plate_number":"ABC123","region":"CA","vehicle_make":"Toyota","vehicle_model":"Camry","vehicle_color":"Blue","vehicle_type":"Sedan","confidence_score":"High"}"#;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_with(payload)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("test-key"));
        let result = client.recognize(&image()).await.unwrap();

        assert_eq!(result.plate_number, "ABC123");
        assert_eq!(result.vehicle_type, "Sedan");
    }

    #[tokio::test]
    async fn test_recognize_without_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(!client.is_configured());
        assert!(matches!(
            client.recognize(&image()).await,
            Err(RecognitionError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_provider_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("bad"))
            .recognize(&image())
            .await
            .unwrap_err();
        match err {
            RecognitionError::Provider { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("API key not valid"));
            }
            other => panic!("Expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        assert!(matches!(
            client_for(&server, Some("k")).recognize(&image()).await,
            Err(RecognitionError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_unparsable_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(reply_with("no plate visible, sorry")),
            )
            .mount(&server)
            .await;

        assert!(matches!(
            client_for(&server, Some("k")).recognize(&image()).await,
            Err(RecognitionError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        assert!(matches!(
            client_for(&server, Some("k")).recognize(&image()).await,
            Err(RecognitionError::Malformed(_))
        ));
    }

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        let config = RecognitionConfig {
            endpoint: "https://example.test///".to_string(),
            ..RecognitionConfig::default()
        };
        let client = GeminiClient::new(&config, None).unwrap();
        assert_eq!(
            client.endpoint_url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(client.model(), "gemini-2.5-flash");
    }
}
