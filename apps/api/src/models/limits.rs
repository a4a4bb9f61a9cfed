use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Character limit rule for a single ad field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldLimit {
    pub field: String,
    pub max_chars: usize,
    #[serde(default)]
    pub max_words: usize,
    pub emojis_allowed: bool,
    /// Number of variations the channel expects (e.g. 15 Search headlines).
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Dropdown fields are picked from `dropdown_options`, never generated.
    #[serde(default)]
    pub is_dropdown: bool,
    #[serde(default)]
    pub dropdown_options: Option<Vec<String>>,
}

impl FieldLimit {
    /// Wire key for this field: lower-cased, spaces replaced with underscores.
    pub fn key(&self) -> String {
        normalize_field_key(&self.field)
    }

    /// True when the model should return an array of `count` strings.
    pub fn is_repeated(&self) -> bool {
        self.count.is_some_and(|c| c > 1)
    }
}

pub fn normalize_field_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// All field limits for a channel, optionally narrowed to a subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelLimitSet {
    pub channel: String,
    #[serde(default)]
    pub subtype: Option<String>,
    pub fields: Vec<FieldLimit>,
}

/// Creative asset specification for a channel placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSpec {
    pub channel: String,
    pub placement_or_format: String,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub recommended_px: Option<String>,
    #[serde(default)]
    pub duration_seconds_max: u32,
    #[serde(default)]
    pub file_types: Vec<String>,
    #[serde(default)]
    pub max_file_size_mb: u32,
    #[serde(default)]
    pub caption_limit_chars: usize,
    #[serde(default)]
    pub notes: Option<String>,
}

pub const DEFAULT_TONE_HINT: &str = "Clear and engaging.";
pub const DEFAULT_AUDIENCE_HINT: &str = "Tailor to their needs and aspirations.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomies {
    pub social_channels: Vec<String>,
    pub non_emoji_channels: Vec<String>,
    pub all_channels: Vec<String>,
    pub tones: Vec<String>,
    pub audiences: Vec<String>,
    pub subtypes: Vec<String>,
    #[serde(default)]
    pub tone_hints: HashMap<String, String>,
    #[serde(default)]
    pub audience_hints: HashMap<String, String>,
    #[serde(default)]
    pub subtype_hints: HashMap<String, String>,
}

impl Taxonomies {
    pub fn tone_hint(&self, tone: &str) -> &str {
        self.tone_hints
            .get(tone)
            .map(String::as_str)
            .unwrap_or(DEFAULT_TONE_HINT)
    }

    pub fn audience_hint(&self, audience: &str) -> &str {
        self.audience_hints
            .get(audience)
            .map(String::as_str)
            .unwrap_or(DEFAULT_AUDIENCE_HINT)
    }

    /// Empty when the subtype has no extra guidance.
    pub fn subtype_hint(&self, subtype: &str) -> &str {
        self.subtype_hints
            .get(subtype)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn allows_emojis(&self, channel: &str) -> bool {
        self.social_channels.iter().any(|c| c == channel)
    }
}
