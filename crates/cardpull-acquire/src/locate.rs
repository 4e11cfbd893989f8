use crate::http::{fetch, HttpClient, HttpResponse};
use cardpull_model::ExtractError;
use scraper::{Html, Selector};
use serde_json::Value;

const EMBEDDED_DATA_SELECTOR: &str = r#"script#__NEXT_DATA__[type="application/json"]"#;

/// Fetch `url` and return its JSON payload, whatever shape the server used.
pub async fn locate(client: &dyn HttpClient, url: &str) -> Result<Value, ExtractError> {
    tracing::info!(url = %url, "Fetching card payload");
    let response = fetch(client, url).await?;
    tracing::info!(
        bytes = response.body.len(),
        content_type = response.content_type.as_deref().unwrap_or("unknown"),
        "Received payload"
    );
    extract_payload(&response)
}

/// Find the JSON document in a response body.
///
/// Tries, in order:
/// 1. a JSON object, when the response declares a JSON content type
/// 2. the body text as strict JSON (an object, or a string holding one)
/// 3. the `__NEXT_DATA__` script block of an HTML page
pub fn extract_payload(response: &HttpResponse) -> Result<Value, ExtractError> {
    if response.is_json() {
        if let Ok(doc @ Value::Object(_)) = serde_json::from_slice::<Value>(&response.body) {
            tracing::debug!("Payload is a JSON response");
            return Ok(doc);
        }
    }

    let text = String::from_utf8_lossy(&response.body);
    if let Some(doc) = parse_json_text(&text) {
        tracing::debug!("Payload is JSON text");
        return Ok(doc);
    }

    tracing::debug!("Looking for embedded data block");
    parse_embedded(&text)
}

fn parse_json_text(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text.trim()).ok()? {
        doc @ Value::Object(_) => Some(doc),
        // Double-encoded payload
        Value::String(inner) => match serde_json::from_str::<Value>(inner.trim()).ok()? {
            doc @ Value::Object(_) => Some(doc),
            _ => None,
        },
        _ => None,
    }
}

fn parse_embedded(html: &str) -> Result<Value, ExtractError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(EMBEDDED_DATA_SELECTOR).expect("valid selector");

    let script = document
        .select(&selector)
        .next()
        .ok_or_else(|| ExtractError::Parse("no embedded data block".into()))?;

    let data: String = script.text().collect();
    serde_json::from_str(data.trim())
        .map_err(|e| ExtractError::Parse(format!("embedded data block is not valid JSON: {e}")))
}
