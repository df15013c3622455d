//! Invoice Extraction Client
//!
//! Client for the generative-model API used to extract inventory items from
//! uploaded invoice images or PDFs.

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ExtractionConfig;
use crate::error::{AppError, AppResult};
use shared::models::ExtractedItem;

/// Client for the invoice extraction model API
#[derive(Clone)]
pub struct InvoiceExtractionClient {
    api_endpoint: String,
    api_key: String,
    model: String,
    http_client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl InvoiceExtractionClient {
    /// Create a new invoice extraction client
    pub fn new(config: &ExtractionConfig) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            http_client,
        }
    }

    /// Extract inventory items from an invoice document. Returns a single
    /// fallback item rather than failing when the model output cannot be
    /// parsed.
    pub async fn extract_items(
        &self,
        file_bytes: &[u8],
        mime_type: &str,
        known_categories: &[String],
    ) -> AppResult<Vec<ExtractedItem>> {
        if self.api_key.is_empty() {
            return Err(AppError::ExtractionError(
                "Extraction API key is not configured".to_string(),
            ));
        }

        let encoded = base64::engine::general_purpose::STANDARD.encode(file_bytes);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: build_prompt(known_categories),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: encoded,
                        },
                    },
                ],
            }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_endpoint, self.model, self.api_key
        );

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExtractionError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExtractionError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExtractionError(format!("Failed to parse response: {}", e)))?;

        let text = result
            .candidates
            .and_then(|mut c| c.drain(..).next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|mut p| p.drain(..).next())
            .and_then(|p| p.text)
            .unwrap_or_default();

        Ok(parse_extraction_text(&text))
    }
}

/// Prompt asking the model for a JSON array of items in our field names
fn build_prompt(known_categories: &[String]) -> String {
    let categories = if known_categories.is_empty() {
        "General".to_string()
    } else {
        known_categories.join(", ")
    };

    format!(
        "Extract every line item from this invoice. Respond with ONLY a JSON array, \
         no prose and no markdown. Each element must use these snake_case keys: \
         name (string), category (string, choose the closest of: {categories}), \
         quantity (integer), min_stock (integer), price (number, unit price), \
         supplier (string), model (string), serial_number (string, comma-separated \
         when multiple), warranty (string, e.g. \"2 Years\"), location (string), \
         description (string). Omit keys you cannot determine."
    )
}

/// Parse the model's text output into extracted items. Tolerates markdown
/// code fences and a single object instead of an array. Unparseable output
/// yields one fallback item so the operator can correct it by hand.
pub fn parse_extraction_text(text: &str) -> Vec<ExtractedItem> {
    let cleaned = strip_code_fences(text);

    if let Ok(items) = serde_json::from_str::<Vec<ExtractedItem>>(cleaned) {
        if !items.is_empty() {
            return items;
        }
    }
    if let Ok(item) = serde_json::from_str::<ExtractedItem>(cleaned) {
        return vec![item];
    }

    tracing::warn!("Could not parse extraction output, returning fallback item");
    vec![ExtractedItem::fallback()]
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_array() {
        let text = "```json\n[{\"name\": \"Laptop\", \"quantity\": 3, \"category\": \"IT\"}]\n```";
        let items = parse_extraction_text(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Laptop");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].category, "IT");
    }

    #[test]
    fn test_parse_bare_object() {
        let text = "{\"name\": \"Monitor\", \"minStock\": 2}";
        let items = parse_extraction_text(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Monitor");
        assert_eq!(items[0].min_stock, 2);
    }

    #[test]
    fn test_parse_defaults_for_missing_fields() {
        let items = parse_extraction_text("[{\"name\": \"Cable\"}]");
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].min_stock, 5);
        assert_eq!(items[0].category, "General");
    }

    #[test]
    fn test_parse_garbage_yields_fallback() {
        let items = parse_extraction_text("I could not read this invoice, sorry!");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].location, "Warehouse - General");
        assert_eq!(items[0].description, "Failed to extract data from invoice");
    }

    #[test]
    fn test_parse_empty_array_yields_fallback() {
        let items = parse_extraction_text("[]");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].location, "Warehouse - General");
    }

    #[test]
    fn test_prompt_lists_known_categories() {
        let prompt = build_prompt(&["IT".to_string(), "Furniture".to_string()]);
        assert!(prompt.contains("IT, Furniture"));
    }
}
