use serde_json::{json, Map, Value};

use crate::models::limits::FieldLimit;

/// Strict output schema for one ad-copy option.
///
/// Dropdown fields are skipped. Repeated fields become fixed-length string
/// arrays; everything else is a single string.
pub fn build_json_schema(fields: &[FieldLimit]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for limit in fields.iter().filter(|f| !f.is_dropdown) {
        let key = limit.key();
        let property = match limit.count.filter(|_| limit.is_repeated()) {
            Some(count) => json!({
                "type": "array",
                "description": format!("{} (max {} chars each)", limit.field, limit.max_chars),
                "items": {"type": "string"},
                "minItems": count,
                "maxItems": count,
            }),
            None => json!({
                "type": "string",
                "description": format!("{} (max {} chars)", limit.field, limit.max_chars),
            }),
        };
        properties.insert(key.clone(), property);
        required.push(Value::String(key));
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// Schema name sent with the request, e.g. `performance_max_ad_copy`.
pub fn schema_name(channel: &str) -> String {
    format!("{}_ad_copy", channel.to_lowercase().replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(field: &str, max_chars: usize, count: Option<usize>, is_dropdown: bool) -> FieldLimit {
        FieldLimit {
            field: field.to_string(),
            max_chars,
            max_words: 0,
            emojis_allowed: false,
            count,
            notes: None,
            is_dropdown,
            dropdown_options: None,
        }
    }

    #[test]
    fn test_schema_shapes() {
        let schema = build_json_schema(&[
            limit("Headlines", 30, Some(3), false),
            limit("Primary Text", 125, Some(1), false),
            limit("Call To Action", 20, None, true),
        ]);

        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["required"], json!(["headlines", "primary_text"]));

        let headlines = &schema["properties"]["headlines"];
        assert_eq!(headlines["type"], "array");
        assert_eq!(headlines["minItems"], 3);
        assert_eq!(headlines["maxItems"], 3);
        assert_eq!(headlines["description"], "Headlines (max 30 chars each)");

        assert_eq!(schema["properties"]["primary_text"]["type"], "string");
        assert!(schema["properties"].get("call_to_action").is_none());
    }

    #[test]
    fn test_schema_name() {
        assert_eq!(schema_name("Performance Max"), "performance_max_ad_copy");
        assert_eq!(schema_name("Meta"), "meta_ad_copy");
    }
}
