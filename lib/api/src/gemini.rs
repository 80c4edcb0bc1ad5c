//! Gemini-backed query providers
//!
//! One client serves both provider traits: `embedContent` for query
//! vectors and `generateContent` with a vision model for garment
//! descriptions.

use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stylx_core::{Error, Result, Vector};
use stylx_similarity::{ImageDescriber, ImageInput, TextEmbedder};
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Garment attributes requested from the vision model
const ATTRIBUTE_PROMPT: &str = "You are a fashion expert describing a single garment for a product search engine. \
Look at the image and list only the attributes that apply to this garment, chosen from:
Gender: men, women, unisex, boys, girls.
Product Type: dress, shirt, tshirt, pants, skirt, jacket, kurta, top and so on.
Color: hue, saturation and brightness of the fabric.
Pattern: stripes, polka dots, floral, checks, geometric or solid.
Detailing: lace, embroidery, sequins, ruffles, prints.
Neckline: shape of the opening around the neck.
Sleeve Length: long, short, three-quarter or sleeveless.
Fit: loose, tight, relaxed, slim or tailored.
Style: casual, formal, vintage, bohemian, sporty.
Length: cropped, knee-length, ankle-length and similar.
Functionality: pockets, zippers, buttons, adjustable straps.
Occasion: work, party, casual outing, formal event.
Seasonality: summer, winter or all-season fabric.
Answer in one line of comma-separated `Attribute: value` pairs, for example:
Color: Light blue, Pattern: Subtle stripes, Sleeve Length: Long sleeves, Fit: Tailored, Style: Versatile";

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
    pub vision_model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_API_BASE.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Generative Language API
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    embedding_model: String,
    embed_endpoint: String,
    generate_endpoint: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(Error::InvalidConfig("missing Gemini API key".to_string()));
        }
        if config.embedding_model.trim().is_empty() || config.vision_model.trim().is_empty() {
            return Err(Error::InvalidConfig("missing Gemini model name".to_string()));
        }

        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| Error::InvalidConfig("invalid Gemini API key".to_string()))?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        let base = config.base_url.trim_end_matches('/');
        Ok(Self {
            client,
            embed_endpoint: format!(
                "{base}/v1beta/models/{}:embedContent",
                config.embedding_model
            ),
            generate_endpoint: format!(
                "{base}/v1beta/models/{}:generateContent",
                config.vision_model
            ),
            embedding_model: config.embedding_model,
        })
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let message = format!("Gemini request failed: {e}");
                if e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() {
                    Error::ProviderUnreachable(message)
                } else {
                    Error::Provider(message)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(Error::ProviderStatus {
                status: status.as_u16(),
                message: format!("Gemini returned {status}: {body}"),
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("failed to parse Gemini response: {e}")))
    }
}

#[async_trait]
impl TextEmbedder for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vector> {
        let request = EmbedContentRequest {
            model: format!("models/{}", self.embedding_model),
            content: Content {
                parts: vec![Part::Text { text }],
            },
        };
        let response: EmbedContentResponse = self.post(&self.embed_endpoint, &request).await?;
        debug!(dimension = response.embedding.values.len(), "query embedded");
        Ok(Vector::new(response.embedding.values))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[async_trait]
impl ImageDescriber for GeminiClient {
    async fn describe(&self, image: &ImageInput) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: ATTRIBUTE_PROMPT,
                    },
                    Part::Image {
                        inline_data: InlineData {
                            mime_type: &image.mime_type,
                            data: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };
        let response: GenerateContentResponse =
            self.post(&self.generate_endpoint, &request).await?;
        Ok(description_from_response(&response))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Join the first candidate's text parts into one comma-separated line
fn description_from_response(response: &GenerateContentResponse) -> String {
    let text: String = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    text.trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Serialize)]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Image { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requires_api_key() {
        let result = GeminiClient::new(GeminiConfig::default());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_endpoints() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: "test-key".to_string(),
            base_url: "http://localhost:9000/".to_string(),
            ..GeminiConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.embed_endpoint,
            "http://localhost:9000/v1beta/models/text-embedding-004:embedContent"
        );
        assert_eq!(
            client.generate_endpoint,
            "http://localhost:9000/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_embed_request_shape() {
        let request = EmbedContentRequest {
            model: "models/text-embedding-004".to_string(),
            content: Content {
                parts: vec![Part::Text { text: "red kurta" }],
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "models/text-embedding-004",
                "content": {"parts": [{"text": "red kurta"}]}
            })
        );
    }

    #[test]
    fn test_generate_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::Image {
                    inline_data: InlineData {
                        mime_type: "image/png",
                        data: "aGk=".to_string(),
                    },
                }],
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{"parts": [{"inline_data": {"mime_type": "image/png", "data": "aGk="}}]}],
                "generationConfig": {"temperature": 0.0}
            })
        );
    }

    #[test]
    fn test_parse_embedding_response() {
        let response: EmbedContentResponse =
            serde_json::from_value(json!({"embedding": {"values": [0.25, -0.5]}})).unwrap();
        assert_eq!(response.embedding.values, vec![0.25, -0.5]);
    }

    #[test]
    fn test_description_joins_lines() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Gender: Women\nColor: Blue\n"},
                    {"text": "\nPattern: Floral"}
                ]}
            }]
        }))
        .unwrap();
        assert_eq!(
            description_from_response(&response),
            "Gender: Women, Color: Blue, Pattern: Floral"
        );
    }

    #[test]
    fn test_description_empty_without_candidates() {
        let blocked: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert_eq!(description_from_response(&blocked), "");
    }
}
