//! Copy generation. Builds the prompts and strict schema for a channel's
//! field limits and asks the text generator for one structured object per
//! requested option.
//!
//! Each option gets `MAX_GENERATION_ATTEMPTS` tries. An empty, unparseable or
//! wrongly-shaped reply counts as a failed attempt.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{info, warn};

use crate::copy::prompts::{
    GENERATION_SYSTEM_TEMPLATE, GENERATION_USER_TEMPLATE, NO_EXCLAMATION_CHANNELS,
    NO_EXCLAMATION_RULE,
};
use crate::copy::schema::{build_json_schema, schema_name};
use crate::errors::AppError;
use crate::llm_client::prompts::CHARACTER_COUNT_INSTRUCTION;
use crate::llm_client::{ChatPrompt, LlmError, ModelTier, OutputSchema, TextGenerator};
use crate::models::copy::GeneratedValue;
use crate::models::limits::FieldLimit;

const MAX_GENERATION_ATTEMPTS: u32 = 2;

/// Added to the base temperature for each further option.
const OPTION_TEMPERATURE_STEP: f32 = 0.05;

/// One raw option keyed by normalised field name.
pub type RawOption = HashMap<String, GeneratedValue>;

/// Everything the prompts need besides the field limits.
#[derive(Debug, Clone, Default)]
pub struct CopyBrief<'a> {
    pub channel: &'a str,
    pub subtype: &'a str,
    pub university: &'a str,
    pub tone: &'a str,
    pub audience: &'a str,
    pub usps: &'a str,
    pub tone_hint: &'a str,
    pub audience_hint: &'a str,
    /// Empty when the subtype has no extra guidance.
    pub subtype_hint: &'a str,
    pub emojis_allowed: bool,
    pub creativity: u8,
    pub scraped_context: Option<&'a str>,
    pub open_day_date: Option<&'a str>,
    pub num_options: usize,
}

/// 3 → 0.4 (conservative), 5 → 0.5, 7 → 0.7; anything else is treated as 5.
pub fn creativity_to_temperature(creativity: u8) -> f32 {
    match creativity {
        3 => 0.4,
        5 => 0.5,
        7 => 0.7,
        _ => 0.5,
    }
}

pub fn build_system_prompt(brief: &CopyBrief<'_>) -> String {
    let channel_rules = if NO_EXCLAMATION_CHANNELS.contains(&brief.channel.to_uppercase().as_str()) {
        NO_EXCLAMATION_RULE
    } else {
        ""
    };

    let subtype_context = if brief.subtype_hint.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nCommunication Type Context: {}\n{}\n",
            brief.subtype, brief.subtype_hint
        )
    };

    GENERATION_SYSTEM_TEMPLATE
        .replace("{channel}", brief.channel)
        .replace("{subtype}", brief.subtype)
        .replace("{tone}", brief.tone)
        .replace("{tone_hint}", brief.tone_hint)
        .replace("{audience}", brief.audience)
        .replace("{audience_hint}", brief.audience_hint)
        .replace("{subtype_context}", &subtype_context)
        .replace("{channel_rules}", channel_rules)
}

pub fn build_user_prompt(brief: &CopyBrief<'_>, fields: &[FieldLimit]) -> String {
    let fields_text = fields
        .iter()
        .filter(|f| !f.is_dropdown)
        .map(|f| {
            let variations = match f.count.filter(|_| f.is_repeated()) {
                Some(count) => format!(" (provide {count} variations)"),
                None => String::new(),
            };
            let emoji_note = if brief.emojis_allowed && f.emojis_allowed {
                " (emojis allowed)"
            } else {
                " (no emojis)"
            };
            format!(
                "- {}: MUST be ≤{} characters (aim for {}-{}){variations}{emoji_note}",
                f.field,
                f.max_chars,
                f.max_chars * 9 / 10,
                f.max_chars
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let context_section = brief
        .scraped_context
        .map(|c| format!("\n\nLanding Page Context:\n{c}\n"))
        .unwrap_or_default();

    let open_day_section = brief
        .open_day_date
        .map(|d| {
            format!(
                "\n\nOpen Day Date: {d}\nNote: Include this date in the copy where appropriate \
                 to create urgency and specificity.\n"
            )
        })
        .unwrap_or_default();

    GENERATION_USER_TEMPLATE
        .replace("{university}", brief.university)
        .replace("{usps}", brief.usps)
        .replace("{context_section}", &context_section)
        .replace("{open_day_section}", &open_day_section)
        .replace("{fields_text}", &fields_text)
        .replace("{character_count_instruction}", CHARACTER_COUNT_INSTRUCTION)
}

/// Generates `brief.num_options` raw options.
///
/// Fails with the last model error once any option exhausts its attempts.
pub async fn generate_copy(
    llm: &dyn TextGenerator,
    brief: &CopyBrief<'_>,
    fields: &[FieldLimit],
) -> Result<Vec<RawOption>, AppError> {
    let schema = build_json_schema(fields);
    let name = schema_name(brief.channel);
    let output = OutputSchema {
        name: &name,
        schema: &schema,
    };
    let system = build_system_prompt(brief);
    let user = build_user_prompt(brief, fields);
    let base_temperature = creativity_to_temperature(brief.creativity);

    info!(
        "Generating {} ad copy options for {} ({})",
        brief.num_options, brief.channel, brief.subtype
    );

    let mut options = Vec::with_capacity(brief.num_options);
    for option_index in 0..brief.num_options {
        let prompt = ChatPrompt {
            system: &system,
            user: &user,
            temperature: base_temperature + option_index as f32 * OPTION_TEMPERATURE_STEP,
            tier: ModelTier::Generation,
        };

        let option = generate_option(llm, &prompt, &output, fields)
            .await
            .map_err(|e| AppError::from_llm("Copy generation failed", e))?;
        info!("Generated option {}/{}", option_index + 1, brief.num_options);
        options.push(option);
    }

    Ok(options)
}

async fn generate_option(
    llm: &dyn TextGenerator,
    prompt: &ChatPrompt<'_>,
    output: &OutputSchema<'_>,
    fields: &[FieldLimit],
) -> Result<RawOption, LlmError> {
    let mut last_error = LlmError::EmptyContent;

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let result = llm
            .complete_structured(prompt, output)
            .await
            .and_then(|value| parse_option(&value, fields).map_err(LlmError::Malformed));

        match result {
            Ok(option) => return Ok(option),
            Err(e) => {
                warn!(
                    "Generation attempt {attempt}/{MAX_GENERATION_ATTEMPTS} failed: {e}"
                );
                last_error = e;
            }
        }
    }

    Err(last_error)
}

/// Checks a structured reply against the generated fields and converts it.
///
/// Malformed when the reply is not an object, a required key is missing, a
/// value has the wrong shape for its field, or a repeated field does not
/// carry exactly `count` items.
pub fn parse_option(value: &Value, fields: &[FieldLimit]) -> Result<RawOption, String> {
    let object = value
        .as_object()
        .ok_or_else(|| "reply is not a JSON object".to_string())?;

    let mut option = RawOption::new();
    for limit in fields.iter().filter(|f| !f.is_dropdown) {
        let key = limit.key();
        let raw = object
            .get(&key)
            .ok_or_else(|| format!("missing field '{key}'"))?;

        let parsed = match (limit.is_repeated(), raw) {
            (false, Value::String(s)) => GeneratedValue::Single(s.clone()),
            (true, Value::Array(items)) => {
                let expected = limit.count.unwrap_or_default();
                if items.len() != expected {
                    return Err(format!(
                        "field '{key}' should have {expected} items, got {}",
                        items.len()
                    ));
                }
                GeneratedValue::Many(
                    items
                        .iter()
                        .map(|i| {
                            i.as_str()
                                .map(str::to_string)
                                .ok_or_else(|| format!("non-string item in '{key}'"))
                        })
                        .collect::<Result<_, _>>()?,
                )
            }
            (true, _) => return Err(format!("field '{key}' should be an array")),
            (false, _) => return Err(format!("field '{key}' should be a string")),
        };
        option.insert(key, parsed);
    }

    Ok(option)
}
