//! Constructor argument values and value-to-send amounts.

use std::{fmt, str::FromStr};

use alloy_core::primitives::{Address, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A fully resolved constructor argument, as handed to a [`crate::ContractDeployer`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Uint(U256),
    Int(i64),
    String(String),
    Address(Address),
}

impl Value {
    /// Returns the address if this value is one.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(address) => Some(*address),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Uint(n) => write!(f, "{n}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Address(a) => write!(f, "{a}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Uint(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Value::Address(value)
    }
}

/// Errors returned when parsing an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountParseError {
    #[error("empty amount")]
    Empty,
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("unknown unit `{0}`, expected one of wei, gwei, ether")]
    UnknownUnit(String),
    #[error("`{0}` has more decimals than the unit allows")]
    TooPrecise(String),
    #[error("`{0}` does not fit in 256 bits")]
    Overflow(String),
}

/// A quantity of wei sent along with a contract creation.
///
/// Parsed from `"<number> [wei|gwei|ether]"`. Without a unit the number is read
/// as wei. Fractions are accepted as long as the result is a whole number of wei,
/// so `"0.5 ether"` works and `"0.5 wei"` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, derive_more::From)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wrap a raw wei quantity.
    pub const fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    /// The amount in wei.
    pub const fn wei(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let (number, unit) = match s.split_once(char::is_whitespace) {
            Some((number, unit)) => (number, unit.trim()),
            None => (s, "wei"),
        };

        let decimals = match unit.to_ascii_lowercase().as_str() {
            "wei" => 0,
            "gwei" => 9,
            "ether" | "eth" => 18,
            _ => return Err(AmountParseError::UnknownUnit(unit.to_string())),
        };

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        let fraction = fraction.trim_end_matches('0');

        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction)
        {
            return Err(AmountParseError::InvalidNumber(number.to_string()));
        }
        if fraction.len() > decimals {
            return Err(AmountParseError::TooPrecise(s.to_string()));
        }

        let scaled = format!("{whole}{fraction:0<decimals$}");
        U256::from_str_radix(&scaled, 10)
            .map(Self)
            .map_err(|_| AmountParseError::Overflow(s.to_string()))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Wei(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Wei(wei) => Ok(Self(U256::from(wei))),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ETHER: u64 = 1_000_000_000_000_000_000;

    #[test]
    fn test_bare_number_is_wei() {
        let amount: Amount = "42".parse().unwrap();
        assert_eq!(amount.wei(), U256::from(42));
    }

    #[test]
    fn test_units() {
        assert_eq!(
            "3 gwei".parse::<Amount>().unwrap().wei(),
            U256::from(3_000_000_000u64)
        );
        assert_eq!(
            "1 ether".parse::<Amount>().unwrap().wei(),
            U256::from(ONE_ETHER)
        );
        assert_eq!(
            "2 ETH".parse::<Amount>().unwrap().wei(),
            U256::from(2 * ONE_ETHER)
        );
    }

    #[test]
    fn test_fractional_ether() {
        let amount: Amount = "0.5 ether".parse().unwrap();
        assert_eq!(amount.wei(), U256::from(ONE_ETHER / 2));

        let amount: Amount = ".25 ether".parse().unwrap();
        assert_eq!(amount.wei(), U256::from(ONE_ETHER / 4));

        // Trailing zeros do not count against the unit's precision.
        let amount: Amount = "7.000 wei".parse().unwrap();
        assert_eq!(amount.wei(), U256::from(7));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!("".parse::<Amount>(), Err(AmountParseError::Empty));
        assert!(matches!(
            "0.5 wei".parse::<Amount>(),
            Err(AmountParseError::TooPrecise(_))
        ));
        assert!(matches!(
            "1 finney".parse::<Amount>(),
            Err(AmountParseError::UnknownUnit(_))
        ));
        assert!(matches!(
            "-1 ether".parse::<Amount>(),
            Err(AmountParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            ". ether".parse::<Amount>(),
            Err(AmountParseError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("Azbit Token").to_string(), "\"Azbit Token\"");
        assert_eq!(Value::from(1_000_000_000u64).to_string(), "1000000000");
        assert_eq!(Value::from(-3i64).to_string(), "-3");
    }
}
