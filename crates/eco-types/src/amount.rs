use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const SCALE: u64 = 100;

/// Non-negative token quantity with two exact decimal places.
///
/// Stored as an integer count of hundredths so that balances never drift and
/// the canonical encoding is a plain integer.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(u64);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Whole tokens, e.g. `from_whole(3)` is `3.00`.
    pub const fn from_whole(tokens: u64) -> Self {
        Self(tokens * SCALE)
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Multiply a per-unit rate by a unit count.
    pub fn checked_mul(self, count: u64) -> Option<Self> {
        self.0.checked_mul(count).map(Self)
    }

    /// The amount as a positive ledger delta.
    pub fn credit(self) -> SignedAmount {
        SignedAmount(i64::try_from(self.0).unwrap_or(i64::MAX))
    }

    /// The amount as a negative ledger delta.
    pub fn debit(self) -> SignedAmount {
        SignedAmount(i64::try_from(self.0).map(|c| -c).unwrap_or(i64::MIN))
    }
}

impl fmt::Debug for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenAmount({self})")
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / SCALE, self.0 % SCALE)
    }
}

/// Parses `"12"`, `"12.5"` and `"12.50"`; anything with more than two
/// decimal places, a sign, or stray characters is rejected.
impl FromStr for TokenAmount {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| TypeError::InvalidAmount {
            input: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("empty amount"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("expected digits with an optional decimal point"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places are supported"));
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let frac_cents: u64 = match frac.len() {
            0 => 0,
            1 => u64::from(frac.as_bytes()[0] - b'0') * 10,
            _ => frac.parse().map_err(|_| invalid("invalid fraction"))?,
        };

        whole
            .checked_mul(SCALE)
            .and_then(|c| c.checked_add(frac_cents))
            .map(Self)
            .ok_or_else(|| invalid("amount too large"))
    }
}

/// Signed ledger delta in hundredths of a token.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedAmount(i64);

impl SignedAmount {
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Debug for SignedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignedAmount({self})")
    }
}

impl fmt::Display for SignedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / SCALE, abs % SCALE)
    }
}

/// Serde adapter that reads and writes a [`TokenAmount`] as a decimal
/// string, for human-edited configuration files.
pub mod decimal_str {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TokenAmount;

    pub fn serialize<S>(amount: &TokenAmount, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TokenAmount, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
