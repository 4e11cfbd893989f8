use crate::card::Card;
use crate::error::ExtractError;
use serde_json::Value;

/// The shapes a card payload arrives in, most specific first.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Server-rendered page data: `props.pageProps.card`.
    EmbeddedPage(Value),
    /// API response wrapping the card: `card`.
    WrappedApi(Value),
    /// The document is the card itself (has `cardId` or `title`).
    RawCard(Value),
}

impl Envelope {
    /// Pick the first envelope shape whose required fields are present.
    pub fn detect(doc: Value) -> Result<Self, ExtractError> {
        if let Some(card) = present(doc.pointer("/props/pageProps/card")) {
            return Ok(Self::EmbeddedPage(card.clone()));
        }
        if let Some(card) = present(doc.get("card")) {
            return Ok(Self::WrappedApi(card.clone()));
        }
        if present(doc.get("cardId")).is_some() || present(doc.get("title")).is_some() {
            return Ok(Self::RawCard(doc));
        }
        Err(ExtractError::Schema(describe(&doc)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmbeddedPage(_) => "embedded-page",
            Self::WrappedApi(_) => "wrapped-api",
            Self::RawCard(_) => "raw-card",
        }
    }

    pub fn into_card(self) -> Result<Card, ExtractError> {
        let kind = self.kind();
        let value = match self {
            Self::EmbeddedPage(v) | Self::WrappedApi(v) | Self::RawCard(v) => v,
        };
        serde_json::from_value(value)
            .map_err(|e| ExtractError::Schema(format!("{kind} card is malformed: {e}")))
    }
}

/// Locate the card inside a JSON document and deserialize it.
pub fn normalize(doc: Value) -> Result<Card, ExtractError> {
    Envelope::detect(doc)?.into_card()
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn describe(doc: &Value) -> String {
    match doc {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).take(10).collect();
            format!("top-level keys: [{}]", keys.join(", "))
        }
        Value::Array(_) => "document is an array".into(),
        other => format!("document is a scalar: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card_body() -> Value {
        json!({
            "cardId": "x1",
            "title": "Songs",
            "content": { "chapters": [ { "tracks": [ { "title": "A" } ] } ] }
        })
    }

    #[test]
    fn test_three_shapes_yield_same_card() {
        let embedded = normalize(json!({ "props": { "pageProps": { "card": card_body() } } })).unwrap();
        let wrapped = normalize(json!({ "card": card_body() })).unwrap();
        let raw = normalize(card_body()).unwrap();

        assert_eq!(embedded, wrapped);
        assert_eq!(wrapped, raw);
        assert_eq!(raw.title.as_deref(), Some("Songs"));
    }

    #[test]
    fn test_embedded_shape_wins() {
        let doc = json!({
            "card": { "title": "wrapped" },
            "props": { "pageProps": { "card": { "title": "embedded" } } }
        });
        let envelope = Envelope::detect(doc).unwrap();
        assert_eq!(envelope.kind(), "embedded-page");
        assert_eq!(envelope.into_card().unwrap().title.as_deref(), Some("embedded"));
    }

    #[test]
    fn test_title_only_is_raw_card() {
        let envelope = Envelope::detect(json!({ "title": "Loose" })).unwrap();
        assert_eq!(envelope.kind(), "raw-card");
    }

    #[test]
    fn test_unrecognized_shape() {
        let err = normalize(json!({ "props": { "pageProps": {} }, "card": null })).unwrap_err();
        assert!(matches!(err, ExtractError::Schema(_)));
        assert!(err.to_string().contains("props"));

        let err = normalize(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ExtractError::Schema(_)));
    }

    #[test]
    fn test_malformed_card_is_schema_error() {
        let err = normalize(json!({ "card": { "title": ["not", "a", "string"] } })).unwrap_err();
        assert!(matches!(err, ExtractError::Schema(_)));
    }
}
