use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Display label substituted for unknown domain values.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A single value a plotted variable can take.
///
/// Categorical domains hold text (sample identifiers, signature names),
/// continuous and binary domains hold numbers. The numeric variant wraps
/// `OrderedFloat` so equality is total: NaN members still match themselves
/// in domain lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomainValue {
    Number(OrderedFloat<f64>),
    Text(String),
}

impl DomainValue {
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Centralized unknown-value check used by every color, comparator,
    /// and label implementation.
    ///
    /// A value is unknown when it equals the literal `"nan"` marker that
    /// tabular exporters emit for missing cells, or when it is a NaN
    /// number. Lookups that produce no value at all (`None`) are treated
    /// as unknown by callers.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        match self {
            Self::Number(n) => n.is_nan(),
            Self::Text(s) => s == "nan",
        }
    }

    /// Numeric view of the value, coercing numeric text.
    ///
    /// Returns `None` for non-numeric text and for unknown values.
    #[must_use]
    pub fn to_number(&self) -> Option<f64> {
        if self.is_unknown() {
            return None;
        }
        match self {
            Self::Number(n) => Some(n.into_inner()),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Whether this value is labeled by `name`, as hierarchy leaves are.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            Self::Text(s) => s == name,
            Self::Number(n) => name
                .parse::<f64>()
                .is_ok_and(|parsed| parsed == n.into_inner()),
        }
    }

    /// Converts a JSON value into a domain value.
    ///
    /// `null` carries no value and maps to `None`; booleans map onto the
    /// 1/0 encoding binary scales use.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(Self::number),
            serde_json::Value::String(s) => Some(Self::text(s.clone())),
            serde_json::Value::Bool(b) => Some(Self::number(if *b { 1.0 } else { 0.0 })),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Number(n) => serde_json::Number::from_f64(n.into_inner())
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => {
                let value = n.into_inner();
                if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
                    write!(f, "{}", value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for DomainValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<i64> for DomainValue {
    fn from(value: i64) -> Self {
        Self::number(value as f64)
    }
}

impl From<&str> for DomainValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for DomainValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DomainValue;

    #[test]
    fn unknown_detection_covers_marker_and_nan() {
        assert!(DomainValue::text("nan").is_unknown());
        assert!(DomainValue::number(f64::NAN).is_unknown());
        assert!(!DomainValue::text("NaN-like").is_unknown());
        assert!(!DomainValue::number(0.0).is_unknown());
    }

    #[test]
    fn numeric_coercion_parses_text() {
        assert_eq!(DomainValue::text("3000").to_number(), Some(3000.0));
        assert_eq!(DomainValue::number(2.5).to_number(), Some(2.5));
        assert_eq!(DomainValue::text("S1").to_number(), None);
        assert_eq!(DomainValue::text("nan").to_number(), None);
    }

    #[test]
    fn display_drops_trailing_zero_on_integral_numbers() {
        assert_eq!(DomainValue::number(1.0).to_string(), "1");
        assert_eq!(DomainValue::number(1.5).to_string(), "1.5");
        assert_eq!(DomainValue::text("S1").to_string(), "S1");
    }

    #[test]
    fn json_round_trip_preserves_variant() {
        let text: DomainValue = serde_json::from_str("\"S1\"").expect("text value");
        assert_eq!(text, DomainValue::text("S1"));

        let number: DomainValue = serde_json::from_str("4.25").expect("number value");
        assert_eq!(number, DomainValue::number(4.25));
        assert_eq!(serde_json::to_string(&number).expect("serialize"), "4.25");
    }
}
