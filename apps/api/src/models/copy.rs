use serde::{Deserialize, Serialize};

/// A generated value: one string, or a fixed-size list for repeated fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedValue {
    Single(String),
    Many(Vec<String>),
}

/// A generated field annotated against its character limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedField {
    pub field: String,
    pub value: GeneratedValue,
    /// For list values this is the longest item.
    pub char_count: usize,
    pub max_chars: usize,
    pub is_over_limit: bool,
    pub shortened: Option<GeneratedValue>,
    pub is_dropdown: bool,
    pub dropdown_options: Option<Vec<String>>,
}

/// Emitted once per field that exceeds its limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub field: String,
    pub original_length: usize,
    pub max_length: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedOption {
    pub option: usize,
    pub fields: Vec<GeneratedField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_value_untagged_shapes() {
        let single: GeneratedValue = serde_json::from_str("\"Study with us\"").unwrap();
        assert_eq!(single, GeneratedValue::Single("Study with us".to_string()));

        let many: GeneratedValue = serde_json::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(
            many,
            GeneratedValue::Many(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_generated_value_rejects_numbers() {
        let result: Result<GeneratedValue, _> = serde_json::from_str("42");
        assert!(result.is_err());
    }
}
