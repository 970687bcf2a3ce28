//! OpenAiDimensionEstimator - furniture footprint estimates from the OpenAI
//! Chat Completions API.
//!
//! Configuration comes from the environment (`OPENAI_API_KEY`,
//! `OPENAI_MODEL_NAME`) with the model falling back to [`EstimatorConfig`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use roomcraft_core::collaborator::DimensionEstimator;
use roomcraft_core::config::EstimatorConfig;
use roomcraft_core::error::{Result, RoomcraftError};
use roomcraft_core::session::FurnitureDimensions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::time::Duration;

const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 200;

const SYSTEM_PROMPT: &str = "You are a furniture dimension expert. Provide dimensions in FEET. \
Respond only with valid JSON.";

/// Estimator backed by a chat-completion model.
#[derive(Clone)]
pub struct OpenAiDimensionEstimator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiDimensionEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiDimensionEstimator")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiDimensionEstimator {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RoomcraftError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Builds an estimator from `OPENAI_API_KEY` and, when set,
    /// `OPENAI_MODEL_NAME`.
    pub fn try_from_env(config: &EstimatorConfig) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| RoomcraftError::config("OPENAI_API_KEY not found in environment"))?;
        let model = env::var("OPENAI_MODEL_NAME").unwrap_or_else(|_| config.model.clone());

        Self::new(
            api_key,
            model,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Points the estimator at a compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| RoomcraftError::estimation(format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            RoomcraftError::estimation(format!("Failed to parse OpenAI response: {err}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RoomcraftError::estimation("OpenAI API returned no content"))
    }
}

#[async_trait]
impl DimensionEstimator for OpenAiDimensionEstimator {
    async fn estimate(
        &self,
        product_type: &str,
        subtype: &str,
        room_area: f64,
    ) -> Result<FurnitureDimensions> {
        tracing::info!("Estimating dimensions for {} ({})", subtype, product_type);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(product_type, subtype, room_area),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let text = self.send_request(&request).await?;
        let dimensions = parse_estimate(&text)?;
        tracing::debug!(
            "Estimated {}: {:.1}ft x {:.1}ft = {:.1} sqft",
            subtype,
            dimensions.width,
            dimensions.depth,
            dimensions.area
        );
        Ok(dimensions)
    }
}

fn build_prompt(product_type: &str, subtype: &str, room_area: f64) -> String {
    format!(
        r#"You are an interior design expert. Estimate realistic dimensions for this furniture.

Furniture Type: {product_type}
Furniture Subtype: {subtype}
Room Size: {room_area:.1} square feet

Provide typical dimensions in FEET as JSON (no markdown, just JSON):
{{"width_ft": <width in feet>, "depth_ft": <depth in feet>, "height_ft": <height in feet>, "notes": "<brief explanation>"}}

Reference sizes in FEET:
- Queen Bed: {{"width_ft": 5.0, "depth_ft": 6.7, "height_ft": 4.0}}
- 3-Seater Sofa: {{"width_ft": 7.0, "depth_ft": 3.2, "height_ft": 3.0}}
- Dining Table (6-seater): {{"width_ft": 6.0, "depth_ft": 3.0, "height_ft": 2.5}}
- Coffee Table: {{"width_ft": 4.0, "depth_ft": 2.0, "height_ft": 1.5}}
- Nightstand: {{"width_ft": 2.0, "depth_ft": 1.5, "height_ft": 2.0}}
- Bookshelf: {{"width_ft": 3.0, "depth_ft": 1.0, "height_ft": 6.0}}
- Office Desk: {{"width_ft": 4.0, "depth_ft": 2.0, "height_ft": 2.5}}

Dimensions must be in feet, proportional to the room, and match typical
furniture store measurements. The floor footprint (width x depth) matters most.

Respond ONLY with valid JSON, no other text."#
    )
}

/// Parses a model reply into dimensions, tolerating markdown code fences.
///
/// Numeric fields may arrive as numbers or numeric strings. Floor area is
/// `width * depth`; bounds are checked by the caller.
pub fn parse_estimate(text: &str) -> Result<FurnitureDimensions> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let value: Value = serde_json::from_str(cleaned.trim()).map_err(|e| {
        RoomcraftError::estimation(format!("Estimator reply is not valid JSON: {e}"))
    })?;

    let width = read_feet(&value, "width_ft")?;
    let depth = read_feet(&value, "depth_ft")?;
    let height = read_feet(&value, "height_ft")?;

    Ok(FurnitureDimensions {
        width,
        depth,
        height,
        area: width * depth,
    })
}

fn read_feet(value: &Value, key: &str) -> Result<f64> {
    let field = value
        .get(key)
        .ok_or_else(|| RoomcraftError::estimation(format!("Estimator reply is missing '{key}'")))?;

    let feet = match field {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    feet.ok_or_else(|| RoomcraftError::estimation(format!("'{key}' is not a number: {field}")))
}

fn map_http_error(status: StatusCode, body: &str) -> RoomcraftError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());
    RoomcraftError::estimation(format!("OpenAI API returned {status}: {message}"))
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
