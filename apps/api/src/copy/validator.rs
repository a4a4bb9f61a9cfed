//! Character-limit validation of generated copy.
//!
//! Pure function of its inputs: no retries, no external calls. Over-limit
//! fields are annotated with a truncated fallback and one warning each; they
//! never fail the request.

use std::collections::HashMap;

use tracing::warn;

use crate::models::copy::{GeneratedField, GeneratedValue, Warning};
use crate::models::limits::{normalize_field_key, FieldLimit};

const ELLIPSIS: &str = "...";

/// Validates generated values against the resolved limits.
///
/// Output follows the declared order of `limits`. Incoming keys are matched
/// after normalisation; keys with no matching limit are skipped. When several
/// keys normalise to the same field, an exact wire key wins, otherwise the
/// lexicographically first raw key.
pub fn validate_generated_fields(
    generated: &HashMap<String, GeneratedValue>,
    limits: &[FieldLimit],
) -> (Vec<GeneratedField>, Vec<Warning>) {
    // Already-normalised keys first, then by raw key, so collisions resolve
    // the same way regardless of map iteration order.
    let mut entries: Vec<(&String, &GeneratedValue)> = generated.iter().collect();
    let rank = |k: &str| normalize_field_key(k) != k;
    entries.sort_by(|(a, _), (b, _)| (rank(a.as_str()), *a).cmp(&(rank(b.as_str()), *b)));

    let mut by_key: HashMap<String, &GeneratedValue> = HashMap::new();
    for (raw, value) in entries {
        let key = normalize_field_key(raw);
        if by_key.contains_key(&key) {
            warn!("Duplicate generated key '{raw}' normalises to '{key}', keeping the first");
            continue;
        }
        by_key.insert(key, value);
    }

    for key in by_key.keys() {
        if !limits.iter().any(|l| &l.key() == key) {
            warn!("No field limit found for '{key}', skipping validation");
        }
    }

    let mut fields = Vec::new();
    let mut warnings = Vec::new();

    for limit in limits {
        let Some(value) = by_key.get(&limit.key()) else {
            continue;
        };
        let (field, warning) = validate_field(limit, value);
        fields.push(field);
        warnings.extend(warning);
    }

    (fields, warnings)
}

fn validate_field(limit: &FieldLimit, value: &GeneratedValue) -> (GeneratedField, Option<Warning>) {
    let max = limit.max_chars;

    let char_count = match value {
        GeneratedValue::Single(s) => char_len(s),
        GeneratedValue::Many(items) => items.iter().map(|i| char_len(i)).max().unwrap_or(0),
    };

    let mut field = GeneratedField {
        field: limit.field.clone(),
        value: value.clone(),
        char_count,
        max_chars: max,
        is_over_limit: false,
        shortened: None,
        is_dropdown: limit.is_dropdown,
        dropdown_options: limit.dropdown_options.clone(),
    };

    // Dropdown values are picked from fixed options and never length-checked.
    if limit.is_dropdown || char_count <= max {
        return (field, None);
    }

    field.is_over_limit = true;
    let (shortened, message) = match value {
        GeneratedValue::Single(s) => (
            GeneratedValue::Single(truncate_with_marker(s, max)),
            format!(
                "{} exceeds {} characters by {}",
                limit.field,
                max,
                char_count - max
            ),
        ),
        GeneratedValue::Many(items) => (
            GeneratedValue::Many(
                items
                    .iter()
                    .map(|item| {
                        if char_len(item) > max {
                            truncate_with_marker(item, max)
                        } else {
                            item.clone()
                        }
                    })
                    .collect(),
            ),
            format!(
                "One or more {} items exceed {} characters",
                limit.field, max
            ),
        ),
    };
    field.shortened = Some(shortened);

    let warning = Warning {
        field: limit.field.clone(),
        original_length: char_count,
        max_length: max,
        message,
    };
    (field, Some(warning))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `max` characters followed by the ellipsis marker.
fn truncate_with_marker(s: &str, max: usize) -> String {
    let mut out: String = s.chars().take(max).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(field: &str, max_chars: usize) -> FieldLimit {
        FieldLimit {
            field: field.to_string(),
            max_chars,
            max_words: 0,
            emojis_allowed: false,
            count: None,
            notes: None,
            is_dropdown: false,
            dropdown_options: None,
        }
    }

    fn single(s: &str) -> GeneratedValue {
        GeneratedValue::Single(s.to_string())
    }

    fn many(items: &[&str]) -> GeneratedValue {
        GeneratedValue::Many(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_overlong_headline_is_flagged_and_truncated() {
        let value = "This headline is much too long for the limit";
        let generated = HashMap::from([("headline".to_string(), single(value))]);

        let (fields, warnings) = validate_generated_fields(&generated, &[limit("Headline", 30)]);

        assert_eq!(fields.len(), 1);
        let field = &fields[0];
        assert_eq!(field.char_count, value.chars().count());
        assert!(field.is_over_limit);
        let expected: String = value.chars().take(30).collect::<String>() + "...";
        assert_eq!(field.shortened, Some(GeneratedValue::Single(expected)));

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].original_length, field.char_count);
        assert_eq!(warnings[0].max_length, 30);
    }

    #[test]
    fn test_value_at_limit_is_not_flagged() {
        let generated = HashMap::from([("headline".to_string(), single(&"a".repeat(30)))]);
        let (fields, warnings) = validate_generated_fields(&generated, &[limit("Headline", 30)]);
        assert!(!fields[0].is_over_limit);
        assert!(fields[0].shortened.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_array_reports_longest_item_and_one_warning() {
        let mut headlines = limit("Headlines", 10);
        headlines.count = Some(3);
        let generated = HashMap::from([(
            "headlines".to_string(),
            many(&["short", "way too long one", "also far too long"]),
        )]);

        let (fields, warnings) = validate_generated_fields(&generated, &[headlines]);

        assert_eq!(fields[0].char_count, 17);
        assert!(fields[0].is_over_limit);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].original_length, 17);
        assert_eq!(
            fields[0].shortened,
            Some(many(&["short", "way too lo...", "also far t..."]))
        );
    }

    #[test]
    fn test_array_within_limit() {
        let generated = HashMap::from([("headlines".to_string(), many(&["one", "three"]))]);
        let (fields, warnings) = validate_generated_fields(&generated, &[limit("Headlines", 10)]);
        assert_eq!(fields[0].char_count, 5);
        assert!(!fields[0].is_over_limit);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_keys_are_normalised_and_unknown_keys_skipped() {
        let generated = HashMap::from([
            ("Primary Text".to_string(), single("Join us this autumn")),
            ("mystery_field".to_string(), single("ignored")),
        ]);
        let (fields, _) = validate_generated_fields(&generated, &[limit("Primary Text", 125)]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "Primary Text");
    }

    #[test]
    fn test_output_follows_declared_order() {
        let generated = HashMap::from([
            ("description".to_string(), single("b")),
            ("headline".to_string(), single("a")),
        ]);
        let limits = [limit("Headline", 30), limit("Description", 90)];
        let (fields, _) = validate_generated_fields(&generated, &limits);
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["Headline", "Description"]);
    }

    #[test]
    fn test_dropdown_is_exempt() {
        let mut cta = limit("Call To Action", 5);
        cta.is_dropdown = true;
        cta.dropdown_options = Some(vec!["Learn More".to_string(), "Apply Now".to_string()]);
        let generated = HashMap::from([("call_to_action".to_string(), single("Learn More"))]);

        let (fields, warnings) = validate_generated_fields(&generated, &[cta]);

        assert!(!fields[0].is_over_limit);
        assert!(fields[0].shortened.is_none());
        assert!(fields[0].is_dropdown);
        assert_eq!(fields[0].dropdown_options.as_ref().map(Vec::len), Some(2));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let generated = HashMap::from([("headline".to_string(), single("Café société 🎓"))]);
        let (fields, warnings) = validate_generated_fields(&generated, &[limit("Headline", 14)]);
        assert_eq!(fields[0].char_count, 14);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_colliding_keys_resolve_deterministically() {
        let limits = [limit("Headline", 30)];

        let generated = HashMap::from([
            ("Headline".to_string(), single("From display name")),
            ("headline".to_string(), single("From wire key")),
            ("HEADLINE".to_string(), single("Shouting")),
        ]);
        for _ in 0..5 {
            let (fields, _) = validate_generated_fields(&generated, &limits);
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].value, single("From wire key"));
        }

        let generated = HashMap::from([
            ("Headline".to_string(), single("Title case")),
            ("HEADLINE".to_string(), single("Shouting")),
        ]);
        let (fields, _) = validate_generated_fields(&generated, &limits);
        assert_eq!(fields[0].value, single("Shouting"));
    }
}
