//! Normalization of the session parameters handed over by the scheduler.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;

/// Parameters for one resell session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionParams {
    pub minimum_profit: i64,
}

#[derive(Deserialize)]
struct RawParams {
    #[serde(rename = "MinimumProfit")]
    minimum_profit: Option<Value>,
}

impl SessionParams {
    /// Parse the scheduler's action parameter object, e.g.
    /// `{"MinimumProfit": 300}` or `{"MinimumProfit": "300"}`.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let params: RawParams =
            serde_json::from_str(raw).map_err(|err| ConfigError::Params(err.to_string()))?;
        let value = params
            .minimum_profit
            .ok_or_else(|| ConfigError::MinimumProfit("missing".to_string()))?;
        Ok(Self {
            minimum_profit: minimum_profit_from_value(&value)?,
        })
    }
}

/// Accept an integer, a float (truncated) or a numeric string.
pub fn minimum_profit_from_value(value: &Value) -> Result<i64, ConfigError> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| ConfigError::MinimumProfit(number.to_string())),
        Value::String(text) => parse_minimum_profit(text),
        other => Err(ConfigError::MinimumProfit(format!(
            "expected number or numeric string, got {other}"
        ))),
    }
}

/// Parse a numeric-string minimum profit.
pub fn parse_minimum_profit(text: &str) -> Result<i64, ConfigError> {
    text.parse()
        .map_err(|_| ConfigError::MinimumProfit(format!("'{text}' is not an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_number_and_numeric_string() {
        let from_number = SessionParams::from_json(r#"{"MinimumProfit": 300}"#).expect("number");
        let from_string = SessionParams::from_json(r#"{"MinimumProfit": "300"}"#).expect("string");
        assert_eq!(from_number.minimum_profit, 300);
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn float_is_truncated() {
        let params = SessionParams::from_json(r#"{"MinimumProfit": 250.9}"#).expect("float");
        assert_eq!(params.minimum_profit, 250);
    }

    #[test]
    fn negative_values_are_allowed() {
        assert_eq!(parse_minimum_profit("-50"), Ok(-50));
    }

    #[test]
    fn rejects_other_types() {
        for raw in [
            r#"{"MinimumProfit": true}"#,
            r#"{"MinimumProfit": null}"#,
            r#"{"MinimumProfit": [1]}"#,
            r#"{"MinimumProfit": "3oo"}"#,
            r#"{"MinimumProfit": " 300"}"#,
        ] {
            let err = SessionParams::from_json(raw).unwrap_err();
            assert!(matches!(err, ConfigError::MinimumProfit(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn missing_or_malformed_object_is_an_error() {
        assert!(matches!(
            SessionParams::from_json("{}"),
            Err(ConfigError::MinimumProfit(_))
        ));
        assert!(matches!(
            SessionParams::from_json("not json"),
            Err(ConfigError::Params(_))
        ));
    }
}
