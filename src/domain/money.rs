use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer};
use serde::{ser, Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use thiserror::Error;

use super::TransactionKind;

/// A strictly positive decimal quantity of money.
///
/// The inner value keeps whatever precision was entered; rounding only
/// happens when the amount is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount is required")]
    EmptyAmount,

    #[error("amount is not a number: {0}")]
    NotANumber(String),

    #[error("amount must be positive, got {0}")]
    NotPositive(Decimal),

    #[error("amount {0} is too large, the {1} total would overflow")]
    TotalOverflow(Decimal, TransactionKind),
}

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::NotPositive(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Amount::new(parse_decimal(input)?)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.0))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Parse user input into a decimal.
/// Example: "50" -> 50, " 120.50 " -> 120.50, "1e3" -> 1000
pub fn parse_decimal(input: &str) -> Result<Decimal, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }

    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| ValidationError::NotANumber(input.to_string()))
}

/// Format a decimal rounded to two places.
/// Example: 379.5 -> "379.50", -0.005 -> "-0.01"
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

// Amounts go to disk as JSON numbers spelled with the exact decimal digits,
// never through a float. Older snapshots stored the raw form text, so reads
// accept a numeric string as well.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.0.to_string()).map_err(ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get();

        let value = if text.starts_with('"') {
            let inner: String = serde_json::from_str(text).map_err(de::Error::custom)?;
            parse_decimal(&inner)
        } else {
            parse_decimal(text)
        }
        .map_err(de::Error::custom)?;

        Amount::new(value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("50")), "50.00");
        assert_eq!(format_amount(dec("12.34")), "12.34");
        assert_eq!(format_amount(dec("379.5")), "379.50");
        assert_eq!(format_amount(dec("0.005")), "0.01");
        assert_eq!(format_amount(dec("100.999")), "101.00");
        assert_eq!(format_amount(dec("0")), "0.00");
        assert_eq!(format_amount(dec("-40")), "-40.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!("50".parse::<Amount>().unwrap().value(), dec("50"));
        assert_eq!(" 120.50 ".parse::<Amount>().unwrap().value(), dec("120.50"));
        assert_eq!("1e3".parse::<Amount>().unwrap().value(), dec("1000"));
    }

    #[test]
    fn test_parse_amount_keeps_precision() {
        let amount: Amount = "0.123456".parse().unwrap();
        assert_eq!(amount.value(), dec("0.123456"));
        assert_eq!(amount.to_string(), "0.12");
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert_eq!("".parse::<Amount>(), Err(ValidationError::EmptyAmount));
        assert_eq!("   ".parse::<Amount>(), Err(ValidationError::EmptyAmount));
        assert!(matches!(
            "abc".parse::<Amount>(),
            Err(ValidationError::NotANumber(_))
        ));
        assert!(matches!(
            "NaN".parse::<Amount>(),
            Err(ValidationError::NotANumber(_))
        ));
        assert!(matches!(
            "Infinity".parse::<Amount>(),
            Err(ValidationError::NotANumber(_))
        ));
        assert!(matches!(
            "12.34.56".parse::<Amount>(),
            Err(ValidationError::NotANumber(_))
        ));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert_eq!(
            "0".parse::<Amount>(),
            Err(ValidationError::NotPositive(Decimal::ZERO))
        );
        assert_eq!(
            "-5".parse::<Amount>(),
            Err(ValidationError::NotPositive(dec("-5")))
        );
    }

    #[test]
    fn test_amount_serializes_as_number() {
        let amount: Amount = "120.50".parse().unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "120.50");
    }

    #[test]
    fn test_amount_keeps_every_digit_on_disk() {
        for text in [
            "0.1234567890123456789",
            "79228162514264337593543950335",
            "123456789012345.678901",
        ] {
            let amount: Amount = text.parse().unwrap();
            let json = serde_json::to_string(&amount).unwrap();
            assert_eq!(json, text);

            let back: Amount = serde_json::from_str(&json).unwrap();
            assert_eq!(back.value().to_string(), text);
        }
    }

    #[test]
    fn test_amount_deserializes_from_number_or_string() {
        let from_number: Amount = serde_json::from_str("120.5").unwrap();
        let from_string: Amount = serde_json::from_str("\"120.50\"").unwrap();
        assert_eq!(from_number, from_string);

        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Amount>("-3").is_err());
        assert!(serde_json::from_str::<Amount>("true").is_err());
        assert!(serde_json::from_str::<Amount>("null").is_err());
        assert!(serde_json::from_str::<Amount>("7.922816251426434e28").is_err());
    }
}
