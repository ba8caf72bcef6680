//! Monetary value objects.
//!
//! Integer amounts in the smallest unit of a currency — no floating point
//! anywhere near money. These exist for the mining boundary (reward
//! transactions); the chain itself never does arithmetic on them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency denominations the reward surface understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Bitcoin (smallest unit: satoshi, 10^-8).
    BTC,
    /// United States Dollar (smallest unit: cent, 10^-2).
    USD,
    /// Euro (smallest unit: cent, 10^-2).
    EUR,
    /// Arbitrary ticker for anything else.
    Custom(String),
}

impl Currency {
    /// Display symbol, for human-facing formatting only.
    pub fn symbol(&self) -> &str {
        match self {
            Self::BTC => "₿",
            Self::USD => "$",
            Self::EUR => "€",
            Self::Custom(ticker) => ticker,
        }
    }

    /// Decimal places for display. The protocol always works in the
    /// smallest unit; this only shapes output.
    pub fn decimals(&self) -> u8 {
        match self {
            Self::BTC => 8,
            Self::USD | Self::EUR => 2,
            Self::Custom(_) => 8,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BTC => write!(f, "BTC"),
            Self::USD => write!(f, "USD"),
            Self::EUR => write!(f, "EUR"),
            Self::Custom(ticker) => write!(f, "{ticker}"),
        }
    }
}

/// An amount of money in the smallest indivisible unit of its currency.
///
/// # Examples
///
/// ```
/// use strata_ledger::wallet::{Currency, Money};
///
/// let reward = Money::new(100, Currency::BTC);
/// assert_eq!(reward.to_string(), "₿ 100");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Value in the smallest unit.
    pub amount: u64,
    /// Denomination.
    pub currency: Currency,
}

impl Money {
    /// Create a new amount.
    pub fn new(amount: u64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// `true` when the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Decimal rendering, e.g. `150_000_000` satoshi → `"1.50000000 BTC"`.
    pub fn display_decimal(&self) -> String {
        let decimals = self.currency.decimals() as u32;
        let divisor = 10u64.pow(decimals);
        format!(
            "{}.{:0>width$} {}",
            self.amount / divisor,
            self.amount % divisor,
            self.currency,
            width = decimals as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency.symbol(), self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_symbol() {
        assert_eq!(Money::new(100, Currency::BTC).to_string(), "₿ 100");
        assert_eq!(Money::new(50, Currency::USD).to_string(), "$ 50");
    }

    #[test]
    fn decimal_rendering() {
        let m = Money::new(150_000_000, Currency::BTC);
        assert_eq!(m.display_decimal(), "1.50000000 BTC");

        let cents = Money::new(1, Currency::EUR);
        assert_eq!(cents.display_decimal(), "0.01 EUR");
    }

    #[test]
    fn custom_ticker_passthrough() {
        let c = Currency::Custom("STR".into());
        assert_eq!(c.symbol(), "STR");
        assert_eq!(c.to_string(), "STR");
    }

    #[test]
    fn serde_roundtrip() {
        let m = Money::new(42, Currency::BTC);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(serde_json::from_str::<Money>(&json).unwrap(), m);
    }
}
