//! Production [`TextGenerator`] backed by the hosted Hugging Face
//! inference API.
//!
//! Wire contract: `POST {base}/models/{model}` with a bearer token and a
//! JSON body of `{ "inputs": ..., "parameters": ... }`. A successful body
//! is either a list whose first element carries `generated_text`, or an
//! object carrying it directly. Anything else on a 200 is a malformed
//! response — the contract itself is wrong, so the caller must not retry.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::analysis::{GenerateError, GenerationParams, TextGenerator};

const MAX_BODY_EXCERPT: usize = 200;

#[derive(Debug, Serialize)]
struct HfRequest<'a> {
    inputs: &'a str,
    parameters: HfParameters,
}

#[derive(Debug, Serialize)]
struct HfParameters {
    max_length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct HfGeneration {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HfResponseBody {
    Many(Vec<HfGeneration>),
    One(HfGeneration),
}

pub struct HfTextGenerator {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl HfTextGenerator {
    /// `timeout` bounds each individual attempt; retries are the
    /// [`AnalysisClient`](crate::analysis::AnalysisClient)'s concern.
    pub fn new(api_base: &str, model: &str, api_token: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: format!("{}/models/{}", api_base.trim_end_matches('/'), model),
            api_token,
        }
    }
}

#[async_trait]
impl TextGenerator for HfTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerateError> {
        let request_body = HfRequest {
            inputs: prompt,
            parameters: HfParameters {
                max_length: params.max_length,
                temperature: params.temperature,
                do_sample: params.do_sample,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();

        // 503 means the model is still being loaded, not that the request
        // was bad. The retry layer treats it as its own class.
        if status.as_u16() == 503 {
            return Err(GenerateError::Warming);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerateError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        debug!(body_len = body.len(), "inference API returned 200");
        parse_generation_body(&body)
    }
}

fn classify_send_error(err: reqwest::Error) -> GenerateError {
    if err.is_timeout() {
        GenerateError::Timeout
    } else {
        GenerateError::Transport(err.to_string())
    }
}

/// Extracts `generated_text` from the two accepted body shapes.
fn parse_generation_body(body: &str) -> Result<String, GenerateError> {
    match serde_json::from_str::<HfResponseBody>(body) {
        Ok(HfResponseBody::Many(items)) => items
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| GenerateError::Malformed("empty generation list".to_string())),
        Ok(HfResponseBody::One(generation)) => Ok(generation.generated_text),
        Err(_) => Err(GenerateError::Malformed(truncate_for_message(body))),
    }
}

fn truncate_for_message(body: &str) -> String {
    if body.len() <= MAX_BODY_EXCERPT {
        return body.to_string();
    }
    let cut = body
        .char_indices()
        .take_while(|(i, _)| *i <= MAX_BODY_EXCERPT)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0);
    format!("{}...", &body[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_list_shaped_body() {
        let body = r#"[{"generated_text": "ATS Compliance Score: 80"}]"#;
        assert_eq!(
            parse_generation_body(body).unwrap(),
            "ATS Compliance Score: 80"
        );
    }

    #[test]
    fn test_accepts_dict_shaped_body() {
        let body = r#"{"generated_text": "hello"}"#;
        assert_eq!(parse_generation_body(body).unwrap(), "hello");
    }

    #[test]
    fn test_first_list_element_wins() {
        let body = r#"[{"generated_text": "first"}, {"generated_text": "second"}]"#;
        assert_eq!(parse_generation_body(body).unwrap(), "first");
    }

    #[test]
    fn test_empty_list_is_malformed() {
        assert!(matches!(
            parse_generation_body("[]"),
            Err(GenerateError::Malformed(_))
        ));
    }

    #[test]
    fn test_unrelated_json_is_malformed() {
        assert!(matches!(
            parse_generation_body(r#"{"error": "model overloaded"}"#),
            Err(GenerateError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_json_body_is_malformed() {
        assert!(matches!(
            parse_generation_body("<html>gateway error</html>"),
            Err(GenerateError::Malformed(_))
        ));
    }

    #[test]
    fn test_endpoint_join_handles_trailing_slash() {
        let g = HfTextGenerator::new(
            "https://api-inference.huggingface.co/",
            "google/flan-t5-xxl",
            "token".to_string(),
            Duration::from_secs(30),
        );
        assert_eq!(
            g.endpoint,
            "https://api-inference.huggingface.co/models/google/flan-t5-xxl"
        );
    }
}
