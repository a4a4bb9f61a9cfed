use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::copy::prompts::{SHORTEN_SYSTEM, SHORTEN_USER_TEMPLATE};
use crate::llm_client::{ChatPrompt, ModelTier, TextGenerator};

const SHORTEN_TEMPERATURE: f32 = 0.3;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortenMethod {
    /// Text already fit.
    None,
    Llm,
    /// The rewrite was still too long and was cut at a word boundary.
    LlmTruncated,
    /// The model call failed or returned no text; plain word-boundary truncation.
    Truncated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shortened {
    pub text: String,
    pub method: ShortenMethod,
}

/// Cuts `text` at the last word boundary that leaves room for an ellipsis.
///
/// The result never exceeds `max_chars` characters, except that a limit below
/// the ellipsis length yields the ellipsis alone.
pub fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let marker_len = ELLIPSIS.chars().count();
    if max_chars < marker_len {
        return ELLIPSIS.to_string();
    }

    let budget = max_chars - marker_len;
    let head: String = text.chars().take(budget).collect();
    let next_is_break = text
        .chars()
        .nth(budget)
        .is_some_and(char::is_whitespace);

    let cut = if next_is_break {
        head.as_str()
    } else {
        match head.rfind(char::is_whitespace) {
            Some(idx) if !head[..idx].trim_end().is_empty() => &head[..idx],
            _ => head.as_str(),
        }
    };

    format!("{}{ELLIPSIS}", cut.trim_end())
}

pub fn build_shorten_prompt(text: &str, max_chars: usize, keep_cta: bool, remove_emojis: bool) -> String {
    let current_length = text.chars().count();
    let reduction = (current_length - max_chars.min(current_length)) as f64 / current_length.max(1) as f64 * 100.0;

    SHORTEN_USER_TEMPLATE
        .replace("{current_length}", &current_length.to_string())
        .replace("{text}", text)
        .replace("{max_chars}", &max_chars.to_string())
        .replace("{reduction}", &format!("{reduction:.0}"))
        .replace(
            "{cta_rule}",
            if keep_cta {
                "Keep any call-to-action intact"
            } else {
                "CTA can be modified if needed"
            },
        )
        .replace(
            "{emoji_rule}",
            if remove_emojis {
                "Remove all emojis"
            } else {
                "Emojis can be kept if space allows"
            },
        )
}

/// Shortens `text` to at most `max_chars` characters.
///
/// Never fails: a model error degrades to word-boundary truncation.
pub async fn shorten_copy(
    llm: &dyn TextGenerator,
    text: &str,
    max_chars: usize,
    keep_cta: bool,
    remove_emojis: bool,
) -> Shortened {
    let current_length = text.chars().count();
    if current_length <= max_chars {
        info!("Text already within limit ({current_length}/{max_chars} chars)");
        return Shortened {
            text: text.to_string(),
            method: ShortenMethod::None,
        };
    }

    let user = build_shorten_prompt(text, max_chars, keep_cta, remove_emojis);
    let prompt = ChatPrompt {
        system: SHORTEN_SYSTEM,
        user: &user,
        temperature: SHORTEN_TEMPERATURE,
        tier: ModelTier::Generation,
    };

    match llm.complete(&prompt).await {
        Ok(reply) => {
            let rewritten = reply.trim().trim_matches('"').trim();
            let length = rewritten.chars().count();
            if length == 0 {
                warn!("Shortening call returned no text, truncating instead");
                Shortened {
                    text: truncate_at_word_boundary(text, max_chars),
                    method: ShortenMethod::Truncated,
                }
            } else if length <= max_chars {
                info!("Shortened text from {current_length} to {length} chars");
                Shortened {
                    text: rewritten.to_string(),
                    method: ShortenMethod::Llm,
                }
            } else {
                warn!("Rewrite still too long ({length}/{max_chars}), truncating");
                Shortened {
                    text: truncate_at_word_boundary(rewritten, max_chars),
                    method: ShortenMethod::LlmTruncated,
                }
            }
        }
        Err(e) => {
            warn!("Shortening call failed, truncating instead: {e}");
            Shortened {
                text: truncate_at_word_boundary(text, max_chars),
                method: ShortenMethod::Truncated,
            }
        }
    }
}
