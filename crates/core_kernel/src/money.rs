//! Claim amounts and their en-US rendering
//!
//! Amounts travel as decimals; `Money` pairs one with its currency so it
//! can be shown as `$1,250,000.00` in tables, detail views and reports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ISO 4217 currencies a claim can be denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    CAD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    /// Digits after the decimal point when rendered
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    pub const ALL: [Currency; 5] = [Currency::USD, Currency::CAD, Currency::EUR, Currency::GBP, Currency::JPY];

    /// Prefix used by `Money::format`
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::CAD => "CA$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::CAD => "CAD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or(MoneyError::UnknownCurrency(code))
    }
}

/// Errors raised while reading money values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// An amount in a currency, as shown in claim tables and reports
///
/// Kept to four decimal places; rounding to the currency's minor unit
/// happens only on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Renders the amount in en-US currency style, e.g. `$1,250,000.00`
    pub fn format(&self) -> String {
        let dp = self.currency.decimal_places();
        let rounded = self.amount.abs().round_dp(dp);
        let plain = format!("{:.dp$}", rounded, dp = dp as usize);

        let (whole, fraction) = match plain.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (plain.as_str(), None),
        };

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let symbol = self.currency.symbol();
        let sign = if self.is_negative() && !rounded.is_zero() { "-" } else { "" };

        match fraction {
            Some(fraction) => format!("{sign}{symbol}{grouped}.{fraction}"),
            None => format!("{sign}{symbol}{grouped}"),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn formatted_digits_round_trip_to_amount(cents in 0i64..10_000_000_000i64) {
            let money = Money::new(Decimal::new(cents, 2), Currency::USD);
            let digits: String = money
                .format()
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            prop_assert_eq!(digits.parse::<Decimal>().unwrap(), money.amount());
        }

        #[test]
        fn negative_amounts_carry_one_leading_sign(cents in 1i64..1_000_000_000i64) {
            let formatted = Money::new(Decimal::new(-cents, 2), Currency::USD).format();
            prop_assert!(formatted.starts_with("-$"));
            prop_assert_eq!(formatted.matches('-').count(), 1);
        }
    }
}
