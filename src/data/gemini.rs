//! Gemini generative-AI client
//!
//! Asks the `generateContent` endpoint for JSON matching a response schema
//! and decodes the first candidate into our data types.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use thiserror::Error;

use super::{DailyReadings, Prayer, SaintOfDay};

/// Base URL for the Gemini REST API
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Errors that can occur when fetching content from Gemini
#[derive(Debug, Error)]
pub enum GeminiError {
    /// No API key was supplied
    #[error("Gemini API key is not configured. Set GEMINI_API_KEY or pass --api-key.")]
    MissingApiKey,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Gemini API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response had no candidate text
    #[error("Gemini returned an empty response")]
    EmptyResponse,

    /// Failed to parse JSON response
    #[error("Failed to parse Gemini response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Top-level `generateContent` response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Answer to an explanation prompt
#[derive(Debug, Deserialize)]
struct Explanation {
    explanation: String,
}

/// Error body returned on failure
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Create a new GeminiClient with default settings
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new GeminiClient whose requests give up after `timeout`
    pub fn with_timeout(api_key: Option<String>, timeout: Duration) -> Result<Self, GeminiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_key))
    }

    /// Create a new GeminiClient with a custom HTTP client
    pub fn with_client(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: GEMINI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            // An empty key is as good as none
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at another server (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch a list of common Catholic prayers
    pub async fn fetch_prayers(&self) -> Result<Vec<Prayer>, GeminiError> {
        let prompt = "Generate a comprehensive list of 50 popular and essential Catholic prayers. \
                      Include basic prayers like the Our Father, prayers to Mary like the \
                      Hail Mary, and prayers to various saints. \
                      Structure the output as a JSON array.";
        let schema = json!({ "type": "ARRAY", "items": prayer_schema() });
        self.generate(prompt, schema).await
    }

    /// Fetch the Mass readings for `date`
    pub async fn fetch_daily_readings(
        &self,
        date: NaiveDate,
    ) -> Result<DailyReadings, GeminiError> {
        let prompt = format!(
            "Provide the Catholic Mass readings for {}. Include the first reading, \
             responsorial psalm, second reading (if applicable for a Sunday or Solemnity), \
             and the Gospel. If there is no second reading, the value for it should be null.",
            long_date(date)
        );
        self.generate(&prompt, daily_readings_schema()).await
    }

    /// Fetch a traditional prayer suited to `date`
    pub async fn fetch_prayer_of_day(&self, date: NaiveDate) -> Result<Prayer, GeminiError> {
        let prompt = format!(
            "Provide a traditional Catholic prayer for {}, suited to the liturgical day. \
             Give its title, its category and its full text.",
            long_date(date)
        );
        self.generate(&prompt, prayer_schema()).await
    }

    /// Fetch the saint the Church commemorates on `date`
    pub async fn fetch_saint_of_day(&self, date: NaiveDate) -> Result<SaintOfDay, GeminiError> {
        let prompt = format!(
            "Who is the Catholic saint for {}? Give the saint's name and a brief description.",
            long_date(date)
        );
        self.generate(&prompt, saint_schema()).await
    }

    /// Fetch a short Catholic reading of the passage at `citation`
    pub async fn fetch_reading_explanation(&self, citation: &str) -> Result<String, GeminiError> {
        let prompt = format!(
            "Briefly explain the Catholic meaning of {} (2-3 sentences).",
            citation
        );
        let answer: Explanation = self.generate(&prompt, explanation_schema()).await?;
        Ok(answer.explanation)
    }

    /// Sends one prompt and decodes the JSON answer
    async fn generate<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
    ) -> Result<T, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        });

        tracing::debug!(model = %self.model, "sending generateContent request");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(
            status = status.as_u16(),
            bytes = text.len(),
            "generateContent response"
        );

        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        parse_generate_response(&text)
    }
}

/// Date as written in prompts, e.g. "October 18, 2026"
fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Extracts the candidate text and decodes it as `T`
fn parse_generate_response<T: DeserializeOwned>(body: &str) -> Result<T, GeminiError> {
    let response: GenerateResponse = serde_json::from_str(body)?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GeminiError::EmptyResponse);
    }

    Ok(serde_json::from_str(text.trim())?)
}

/// Pulls the human-readable message out of an error body, if there is one
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// A `STRING` property with a description
fn string_property(description: impl Into<String>) -> Value {
    json!({ "type": "STRING", "description": description.into() })
}

fn reading_schema(description: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "citation": string_property(format!("The citation for the {}.", description)),
            "text": string_property(format!("The full text of the {}.", description)),
        },
        "required": ["citation", "text"],
    })
}

fn prayer_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": string_property("The title of the prayer."),
            "category": string_property(
                "The category of the prayer \
                 (e.g., Basic Prayers, Marian Prayers, Prayers to Saints)."
            ),
            "text": string_property("The full text of the prayer."),
        },
        "required": ["title", "category", "text"],
    })
}

fn saint_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": string_property("The name of the saint or feast."),
            "description": string_property("A brief description of the saint's life."),
        },
        "required": ["name", "description"],
    })
}

fn explanation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "explanation": string_property("Two or three sentences on the passage."),
        },
        "required": ["explanation"],
    })
}

fn daily_readings_schema() -> Value {
    let mut second_reading = reading_schema("second reading");
    second_reading["nullable"] = json!(true);
    second_reading["required"] = json!([]);

    json!({
        "type": "OBJECT",
        "properties": {
            "date": string_property("The date of the readings in 'Month Day, Year' format."),
            "feast": string_property("The feast or liturgical day."),
            "firstReading": reading_schema("first reading"),
            "responsorialPsalm": reading_schema("responsorial psalm"),
            "secondReading": second_reading,
            "gospel": reading_schema("gospel reading"),
        },
        "required": ["date", "feast", "firstReading", "responsorialPsalm", "gospel"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn wrap_candidate(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[test]
    fn test_parse_generate_response_decodes_candidate_text() {
        let body = wrap_candidate(
            r#"[{"title":"Glory Be","category":"Basic Prayers","text":"Glory be..."}]"#,
        );

        let prayers: Vec<Prayer> = parse_generate_response(&body).unwrap();

        assert_eq!(prayers.len(), 1);
        assert_eq!(prayers[0].title, "Glory Be");
    }

    #[test]
    fn test_parse_generate_response_joins_split_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [
                { "text": "[{\"title\":\"A\"," },
                { "text": "\"category\":\"B\",\"text\":\"C\"}]" }
            ] } }]
        })
        .to_string();

        let prayers: Vec<Prayer> = parse_generate_response(&body).unwrap();

        assert_eq!(prayers[0].category, "B");
    }

    #[test]
    fn test_parse_generate_response_without_candidates_is_empty() {
        let result: Result<Vec<Prayer>, _> = parse_generate_response(r#"{"candidates": []}"#);
        assert!(matches!(result, Err(GeminiError::EmptyResponse)));

        let result: Result<Vec<Prayer>, _> = parse_generate_response(r#"{}"#);
        assert!(matches!(result, Err(GeminiError::EmptyResponse)));
    }

    #[test]
    fn test_parse_generate_response_rejects_non_json_text() {
        let body = wrap_candidate("Here are some prayers: Our Father...");

        let result: Result<Vec<Prayer>, _> = parse_generate_response(&body);

        assert!(matches!(result, Err(GeminiError::ParseError(_))));
    }

    #[test]
    fn test_api_error_message_prefers_error_field() {
        let body = r#"{"error": {
            "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"
        }}"#;
        assert_eq!(api_error_message(body), "Resource has been exhausted");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(api_error_message("  "), "no response body");
    }

    #[test]
    fn test_daily_readings_schema_marks_second_reading_nullable() {
        let schema = daily_readings_schema();
        assert_eq!(schema["properties"]["secondReading"]["nullable"], json!(true));
        assert!(!schema["required"]
            .as_array()
            .unwrap()
            .contains(&json!("secondReading")));
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        assert!(!GeminiClient::new(Some("  ".to_string())).has_api_key());
        assert!(GeminiClient::new(Some("key".to_string())).has_api_key());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let client = GeminiClient::new(None).with_base_url("http://127.0.0.1:9");

        let result = client.fetch_prayers().await;

        let err = result.unwrap_err();
        assert!(matches!(err, GeminiError::MissingApiKey));
        assert!(err.to_string().contains("API key is not configured"));
    }

    #[tokio::test]
    async fn test_fetch_prayers_from_mock_server() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .with_status(200)
            .with_body(wrap_candidate(
                r#"[{"title":"Hail Mary","category":"Marian Prayers","text":"Hail Mary"}]"#,
            ))
            .create_async()
            .await;

        let client = GeminiClient::new(Some("test-key".to_string())).with_base_url(server.url());
        let prayers = client.fetch_prayers().await.unwrap();

        mock.assert_async().await;
        assert_eq!(prayers[0].title, "Hail Mary");
    }

    #[tokio::test]
    async fn test_fetch_daily_readings_mentions_date_in_prompt() {
        let mut server = Server::new_async().await;
        let readings = json!({
            "date": "October 18, 2026",
            "feast": "Twenty-ninth Sunday in Ordinary Time",
            "firstReading": { "citation": "Isaiah 53:10-11", "text": "..." },
            "responsorialPsalm": { "citation": "Psalm 33", "text": "..." },
            "secondReading": null,
            "gospel": { "citation": "Mark 10:35-45", "text": "..." }
        });
        let mock = server
            .mock("POST", "/models/test-model:generateContent")
            .match_body(Matcher::Regex("October 18, 2026".to_string()))
            .with_status(200)
            .with_body(wrap_candidate(&readings.to_string()))
            .create_async()
            .await;

        let client = GeminiClient::new(Some("k".to_string()))
            .with_model("test-model")
            .with_base_url(server.url());
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let result = client.fetch_daily_readings(date).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.gospel.citation, "Mark 10:35-45");
        assert!(result.second_reading.is_none());
    }

    #[test]
    fn test_prayer_schema_is_one_object_and_list_wraps_it() {
        let schema = prayer_schema();
        assert_eq!(schema["type"], json!("OBJECT"));
        assert!(schema["required"].as_array().unwrap().contains(&json!("text")));
    }

    #[tokio::test]
    async fn test_fetch_saint_of_day_mentions_date() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_body(Matcher::Regex("saint for October 18, 2026".to_string()))
            .with_status(200)
            .with_body(wrap_candidate(
                r#"{"name": "St. Luke", "description": "Evangelist and physician."}"#,
            ))
            .create_async()
            .await;

        let client = GeminiClient::new(Some("k".to_string())).with_base_url(server.url());
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let saint = client.fetch_saint_of_day(date).await.unwrap();

        mock.assert_async().await;
        assert_eq!(saint.name, "St. Luke");
    }

    #[tokio::test]
    async fn test_fetch_prayer_of_day_decodes_single_prayer() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(wrap_candidate(
                r#"{"title": "Prayer to St. Luke", "category": "Saints", "text": "Amen."}"#,
            ))
            .create_async()
            .await;

        let client = GeminiClient::new(Some("k".to_string())).with_base_url(server.url());
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let prayer = client.fetch_prayer_of_day(date).await.unwrap();

        assert_eq!(prayer.title, "Prayer to St. Luke");
        assert_eq!(prayer.category, "Saints");
    }

    #[tokio::test]
    async fn test_fetch_reading_explanation_returns_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .match_body(Matcher::Regex("Catholic meaning of Mark 10:35-45".to_string()))
            .with_status(200)
            .with_body(wrap_candidate(
                r#"{"explanation": "Jesus teaches that greatness lies in service."}"#,
            ))
            .create_async()
            .await;

        let client = GeminiClient::new(Some("k".to_string())).with_base_url(server.url());
        let text = client.fetch_reading_explanation("Mark 10:35-45").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Jesus teaches that greatness lies in service.");
    }

    #[tokio::test]
    async fn test_http_error_status_becomes_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(429)
            .with_body(
                r#"{"error": {"code": 429, "message": "Quota exceeded"}}"#,
            )
            .create_async()
            .await;

        let client = GeminiClient::new(Some("k".to_string())).with_base_url(server.url());
        let err = client.fetch_prayers().await.unwrap_err();

        match &err {
            GeminiError::Api { status, message } => {
                assert_eq!(*status, 429);
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
        assert!(err.to_string().contains("HTTP 429"));
    }
}
