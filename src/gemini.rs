use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::error::HumanizeError;
use crate::ingest::FileRecord;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

const SYSTEM_INSTRUCTION: &str =
    "You are an expert editor and ghostwriter specializing in humanizing texts.";

// Above the deterministic baseline so the rewrite admits stylistic variance.
const TEMPERATURE: f32 = 0.7;

/// Gemini request types
#[derive(Serialize)]
struct GeminiRequest {
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Gemini streaming response types
#[derive(Deserialize)]
struct StreamChunk {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl StreamChunk {
    fn text(&self) -> Option<String> {
        let content = self.candidates.as_ref()?.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Client for the Gemini generation service. Constructed explicitly with
/// its credential and passed where it is needed; there is no process-wide
/// instance.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Rewrite the attached document per `instruction`, streaming the
    /// result. `on_chunk` receives the full cumulative text after every
    /// increment, not the delta: each invocation is a wholesale
    /// replacement of the displayed result. Resolves with the final
    /// cumulative text when the stream ends.
    ///
    /// Fails with [`HumanizeError::MissingApiKey`] before any network
    /// call when no key is configured. On a mid-stream failure the text
    /// already delivered through `on_chunk` is not retracted, but the
    /// operation as a whole reports the error.
    pub async fn humanize<F>(
        &self,
        file: &FileRecord,
        instruction: &str,
        mut on_chunk: F,
    ) -> Result<String, HumanizeError>
    where
        F: FnMut(&str),
    {
        if self.api_key.is_empty() {
            return Err(HumanizeError::MissingApiKey);
        }

        let url = format!(
            "{GEMINI_BASE_URL}/{GEMINI_MODEL}:streamGenerateContent?alt=sse&key={}",
            self.api_key
        );

        let body = GeminiRequest {
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: file.mime_type.clone(),
                            data: file.data.clone(),
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(instruction.to_string()),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let resp = self.http.post(&url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            log::error!("Gemini API error {status}: {body}");
            return Err(HumanizeError::Api {
                status,
                message: api_error_message(&body),
            });
        }

        let deltas = resp
            .bytes_stream()
            .eventsource()
            .filter_map(|event| async move {
                match event {
                    Ok(event) if event.data.is_empty() => None,
                    Ok(event) => delta_from_event(&event.data),
                    Err(e) => Some(Err(HumanizeError::Stream(e.to_string()))),
                }
            });

        accumulate(deltas, &mut on_chunk).await
    }
}

/// Extract the text delta carried by one SSE event. Service-reported
/// errors become stream failures; payloads that parse to neither are
/// logged and skipped.
fn delta_from_event(data: &str) -> Option<Result<String, HumanizeError>> {
    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => {
            if let Some(err) = chunk.error {
                return Some(Err(HumanizeError::Service(err.message)));
            }
            chunk.text().map(Ok)
        }
        Err(e) => {
            log::warn!("Skipping malformed stream event: {e}");
            None
        }
    }
}

/// Pull the human-readable message out of a JSON error body, falling
/// back to a truncated copy of the raw response.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

/// Fold a stream of text deltas into the cumulative result, republishing
/// the full text after each one. Increments are concatenated in arrival
/// order; empty deltas are dropped without a callback.
async fn accumulate<S, F>(deltas: S, on_chunk: &mut F) -> Result<String, HumanizeError>
where
    S: Stream<Item = Result<String, HumanizeError>>,
    F: FnMut(&str),
{
    let mut deltas = std::pin::pin!(deltas);
    let mut full_text = String::new();
    while let Some(delta) = deltas.next().await {
        let delta = delta?;
        if delta.is_empty() {
            continue;
        }
        full_text.push_str(&delta);
        on_chunk(&full_text);
    }
    Ok(full_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn accumulate_republishes_the_full_text_after_every_delta() {
        let deltas = stream::iter(vec![
            Ok("Hello".to_string()),
            Ok(", world".to_string()),
            Ok("!".to_string()),
        ]);
        let mut seen = Vec::new();
        let final_text = accumulate(deltas, &mut |text: &str| seen.push(text.to_string()))
            .await
            .unwrap();
        assert_eq!(seen, ["Hello", "Hello, world", "Hello, world!"]);
        assert_eq!(final_text, "Hello, world!");
    }

    #[tokio::test]
    async fn accumulate_drops_empty_deltas_without_a_callback() {
        let deltas = stream::iter(vec![
            Ok("Hi".to_string()),
            Ok(String::new()),
            Ok(" there".to_string()),
        ]);
        let mut calls = 0usize;
        let final_text = accumulate(deltas, &mut |_: &str| calls += 1).await.unwrap();
        assert_eq!(calls, 2);
        assert_eq!(final_text, "Hi there");
    }

    #[tokio::test]
    async fn mid_stream_failure_keeps_already_delivered_text_visible() {
        let deltas = stream::iter(vec![
            Ok("partial".to_string()),
            Err(HumanizeError::Stream("connection reset".into())),
        ]);
        let mut seen = Vec::new();
        let result = accumulate(deltas, &mut |text: &str| seen.push(text.to_string())).await;
        assert!(matches!(result, Err(HumanizeError::Stream(_))));
        assert_eq!(seen, ["partial"]);
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_network_call() {
        let client = GeminiClient::new("");
        let file = FileRecord::from_bytes("a.txt", "text/plain", b"hi".to_vec()).unwrap();
        let mut calls = 0usize;
        let err = client
            .humanize(&file, "rewrite this", |_| calls += 1)
            .await
            .unwrap_err();
        assert!(matches!(err, HumanizeError::MissingApiKey));
        assert_eq!(calls, 0);
    }

    #[test]
    fn delta_is_extracted_from_a_candidate_payload() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#;
        let delta = delta_from_event(data).unwrap().unwrap();
        assert_eq!(delta, "Hello");
    }

    #[test]
    fn service_error_payload_fails_the_stream() {
        let data = r#"{"error":{"message":"quota exhausted"}}"#;
        let result = delta_from_event(data).unwrap();
        assert!(matches!(result, Err(HumanizeError::Service(m)) if m == "quota exhausted"));
    }

    #[test]
    fn textless_and_malformed_payloads_are_skipped() {
        assert!(delta_from_event(r#"{"candidates":[{"content":{"parts":[]}}]}"#).is_none());
        assert!(delta_from_event("not json").is_none());
    }

    #[test]
    fn api_error_message_prefers_the_structured_field() {
        let body = r#"{"error":{"code":400,"message":"API key not valid"}}"#;
        assert_eq!(api_error_message(body), "API key not valid");
        assert_eq!(api_error_message("plain failure"), "plain failure");
    }
}
