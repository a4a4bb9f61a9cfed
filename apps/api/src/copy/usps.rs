use serde_json::{json, Value};
use tracing::{error, info};

use crate::copy::prompts::{USP_SYSTEM, USP_USER_TEMPLATE};
use crate::llm_client::{ChatPrompt, LlmError, ModelTier, OutputSchema, TextGenerator};

const USP_SCHEMA_NAME: &str = "usps_extraction";
const USP_TEMPERATURE: f32 = 0.3;
const MAX_CONTENT_CHARS: usize = 3000;

pub const FALLBACK_USPS: [&str; 3] = [
    "Quality education",
    "Excellent facilities",
    "Strong graduate outcomes",
];

fn usp_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "usps": {
                "type": "array",
                "description": "List of 3-5 key USPs",
                "items": {"type": "string"},
                "minItems": 3,
                "maxItems": 5,
            }
        },
        "required": ["usps"],
        "additionalProperties": false,
    })
}

/// Extracts 3–5 selling points from summarised page content.
///
/// Returns `FALLBACK_USPS` when the model call fails or the reply is unusable.
pub async fn extract_usps(llm: &dyn TextGenerator, content: &str) -> Vec<String> {
    match request_usps(llm, content).await {
        Ok(usps) => {
            info!("Extracted {} USPs from content", usps.len());
            usps
        }
        Err(e) => {
            error!("Error extracting USPs: {e}");
            FALLBACK_USPS.iter().map(|s| s.to_string()).collect()
        }
    }
}

async fn request_usps(llm: &dyn TextGenerator, content: &str) -> Result<Vec<String>, LlmError> {
    let excerpt: String = content.chars().take(MAX_CONTENT_CHARS).collect();
    let user = USP_USER_TEMPLATE.replace("{content}", &excerpt);
    let schema = usp_schema();

    let prompt = ChatPrompt {
        system: USP_SYSTEM,
        user: &user,
        temperature: USP_TEMPERATURE,
        tier: ModelTier::Mini,
    };
    let output = OutputSchema {
        name: USP_SCHEMA_NAME,
        schema: &schema,
    };

    let reply = llm.complete_structured(&prompt, &output).await?;
    let usps: Vec<String> = reply
        .get("usps")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if usps.is_empty() {
        return Err(LlmError::Malformed("no USPs in reply".to_string()));
    }
    Ok(usps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::tests::ScriptedGenerator;

    #[tokio::test]
    async fn test_extracts_usps_with_mini_model() {
        let llm = ScriptedGenerator::new(vec![Ok(json!({
            "usps": ["95% graduate employment", "Ranked top 10 for Nursing", "£2,000 scholarships"]
        }))]);

        let usps = extract_usps(&llm, "Title: Nursing BSc").await;

        assert_eq!(usps.len(), 3);
        assert_eq!(usps[0], "95% graduate employment");
        let call = &llm.calls()[0];
        assert_eq!(call.tier, ModelTier::Mini);
        assert_eq!(call.schema_name.as_deref(), Some("usps_extraction"));
    }

    #[tokio::test]
    async fn test_content_is_capped() {
        let llm = ScriptedGenerator::new(vec![Ok(json!({"usps": ["a", "b", "c"]}))]);
        extract_usps(&llm, &"x".repeat(5000)).await;
        let user = &llm.calls()[0].user;
        assert!(user.contains(&"x".repeat(3000)));
        assert!(!user.contains(&"x".repeat(3001)));
    }

    #[tokio::test]
    async fn test_failure_returns_fallback() {
        let llm = ScriptedGenerator::new(vec![Err(LlmError::Timeout)]);
        let usps = extract_usps(&llm, "anything").await;
        assert_eq!(usps, FALLBACK_USPS.to_vec());
    }

    #[tokio::test]
    async fn test_empty_reply_returns_fallback() {
        let llm = ScriptedGenerator::new(vec![Ok(json!({"usps": []}))]);
        let usps = extract_usps(&llm, "anything").await;
        assert_eq!(usps, FALLBACK_USPS.to_vec());
    }
}
