use serde::{Deserialize, Serialize};

use super::column::ColumnType;
use super::model::ModelKind;
use crate::error::{StudioError, StudioResult};

/// Predicted value: numeric for regression, a label for classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictedValue {
    Number(f64),
    Label(String),
}

impl std::fmt::Display for PredictedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictedValue::Number(n) => {
                write!(f, "{}", super::model::display_value(&serde_json::json!(n)))
            }
            PredictedValue::Label(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub kind: ModelKind,
    pub prediction: PredictedValue,
    /// Class probabilities, positionally aligned with the class index.
    pub probabilities: Option<Vec<f64>>,
}

/// A single form value after decoding against its column type.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Null,
    Number(f64),
    Text(String),
}

impl InputValue {
    /// Decode raw form text using the column's declared type.
    pub fn decode(column: &str, column_type: &ColumnType, raw: &str) -> StudioResult<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return Ok(InputValue::Null);
        }

        match column_type {
            ColumnType::Boolean => match text.to_lowercase().as_str() {
                "true" | "1" => Ok(InputValue::Number(1.0)),
                "false" | "0" => Ok(InputValue::Number(0.0)),
                _ => Err(StudioError::Validation(format!(
                    "column '{}' expects true, false, 1 or 0, got '{}'",
                    column, text
                ))),
            },
            ColumnType::Integer | ColumnType::Float => parse_number(column, text),
            // Undeclared types keep the lenient number-or-text behaviour.
            ColumnType::Other(_) => Ok(parse_number(column, text)
                .unwrap_or_else(|_| InputValue::Text(raw.to_string()))),
            ColumnType::Categorical | ColumnType::DateTime => Ok(InputValue::Text(raw.to_string())),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            InputValue::Null => serde_json::Value::Null,
            InputValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            InputValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

fn parse_number(column: &str, text: &str) -> StudioResult<InputValue> {
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(InputValue::Number(n)),
        _ => Err(StudioError::Validation(format!(
            "column '{}' expects a number, got '{}'",
            column, text
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_numeric() {
        assert_eq!(
            InputValue::decode("x", &ColumnType::Float, " 3.5 ").unwrap(),
            InputValue::Number(3.5)
        );
        assert_eq!(
            InputValue::decode("x", &ColumnType::Integer, "").unwrap(),
            InputValue::Null
        );
        assert!(matches!(
            InputValue::decode("x", &ColumnType::Integer, "abc"),
            Err(StudioError::Validation(_))
        ));
    }

    #[test]
    fn test_decode_passes_text_through() {
        assert_eq!(
            InputValue::decode("city", &ColumnType::Categorical, "Paris").unwrap(),
            InputValue::Text("Paris".to_string())
        );
        assert_eq!(
            InputValue::decode("code", &ColumnType::Categorical, "42").unwrap(),
            InputValue::Text("42".to_string())
        );
    }

    #[test]
    fn test_decode_boolean() {
        assert_eq!(
            InputValue::decode("flag", &ColumnType::Boolean, "TRUE").unwrap(),
            InputValue::Number(1.0)
        );
        assert_eq!(
            InputValue::decode("flag", &ColumnType::Boolean, "0").unwrap(),
            InputValue::Number(0.0)
        );
        assert_eq!(
            InputValue::decode("flag", &ColumnType::Boolean, " 1 ").unwrap(),
            InputValue::Number(1.0)
        );
    }

    #[test]
    fn test_decode_boolean_rejects_other_numbers() {
        for text in ["2.5", "-1", "yes"] {
            assert!(matches!(
                InputValue::decode("flag", &ColumnType::Boolean, text),
                Err(StudioError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_predicted_value_untagged() {
        let v: PredictedValue = serde_json::from_str("2.5").unwrap();
        assert_eq!(v, PredictedValue::Number(2.5));
        let v: PredictedValue = serde_json::from_str("\"yes\"").unwrap();
        assert_eq!(v, PredictedValue::Label("yes".to_string()));
    }
}
