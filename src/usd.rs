use anyhow::{bail, ensure};
use serde_with::DeserializeFromStr;

use std::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::AddAssign,
    str::FromStr,
};

/// Represents an amount of money in USD currency.
///
/// The amount is stored internally as an integer number of cents, so sums
/// never accumulate floating-point drift. The [`Display`] implementation
/// formats it as dollars to 2 decimal places with thousands separators
/// (for example `$1,234.56`).
#[derive(Clone, Copy, Default, DeserializeFromStr, Eq, PartialEq, Ord, PartialOrd)]
pub struct Usd(i64);

impl Usd {
    /// Creates an amount from an integer number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount as an integer number of cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns the amount in dollars, for use at rendering boundaries
    /// (chart scaling) where a float is unavoidable.
    #[must_use]
    pub fn dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Debug for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        let dollars = (cents / 100).to_string();
        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, digit) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        write!(f, "{sign}${grouped}.{:02}", cents % 100)
    }
}

impl FromStr for Usd {
    type Err = anyhow::Error;

    /// Parses a decimal dollar amount with up to 2 fraction digits.
    ///
    /// Thousands separators and a leading `$` are tolerated, so `1,234.5`,
    /// `$1234.50`, and `1234` all parse to the same amount.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().replace(',', "");
        let (sign, number) = match s.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, s.as_str()),
        };
        let number = number.strip_prefix('$').unwrap_or(number);
        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        ensure!(!whole.is_empty() || !frac.is_empty(), "empty amount: {s:?}");
        if frac.len() > 2 {
            bail!("too many decimal places in amount: {s:?}");
        }
        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse()? };
        let mut frac_cents: i64 = if frac.is_empty() { 0 } else { frac.parse()? };
        if frac.len() == 1 {
            frac_cents *= 10;
        }
        Ok(Self(sign * (whole * 100 + frac_cents)))
    }
}

impl AddAssign for Usd {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Usd {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|usd| usd.0).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_fn_parses_two_decimal_amounts() {
        assert_eq!(Usd::from_str("543.21").unwrap(), Usd::from_cents(54321));
        assert_eq!(Usd::from_str("0.05").unwrap(), Usd::from_cents(5));
    }

    #[test]
    fn from_str_fn_normalizes_short_fractions() {
        assert_eq!(Usd::from_str("543").unwrap(), Usd::from_cents(54300));
        assert_eq!(Usd::from_str("543.2").unwrap(), Usd::from_cents(54320));
        assert_eq!(Usd::from_str(".5").unwrap(), Usd::from_cents(50));
    }

    #[test]
    fn from_str_fn_tolerates_commas_and_dollar_signs() {
        assert_eq!(Usd::from_str("$3,409.15").unwrap(), Usd::from_cents(340_915));
        assert_eq!(Usd::from_str("-$50.00").unwrap(), Usd::from_cents(-5000));
    }

    #[test]
    fn from_str_fn_rejects_bad_amounts() {
        assert!(Usd::from_str("1.234").is_err(), "3 decimal places");
        assert!(Usd::from_str("bogus").is_err(), "non-numeric");
        assert!(Usd::from_str("").is_err(), "empty");
        assert!(Usd::from_str("$").is_err(), "sign only");
    }

    #[test]
    fn display_impl_groups_thousands() {
        assert_eq!(Usd::from_cents(123_456_789).to_string(), "$1,234,567.89");
        assert_eq!(Usd::from_cents(5000).to_string(), "$50.00");
        assert_eq!(Usd::from_cents(0).to_string(), "$0.00");
        assert_eq!(Usd::from_cents(-5000).to_string(), "-$50.00");
    }
}
