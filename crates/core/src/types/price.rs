//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are kept in the source currency (USD) and converted to
//! Ugandan shillings for display and for the hosted payment widget. UGX has no
//! minor unit, so converted amounts are rounded to whole shillings, half away
//! from zero.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default USD to UGX rate used when the backend does not provide one.
pub const DEFAULT_USD_TO_UGX_RATE: i64 = 3700;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Amount rounded to the currency's minor units (half away from zero).
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount.round_dp_with_strategy(
            self.currency_code.minor_units(),
            RoundingStrategy::MidpointAwayFromZero,
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        let digits = format!("{:.*}", self.currency_code.minor_units() as usize, rounded.abs());
        let (whole, fraction) = digits
            .split_once('.')
            .map_or((digits.as_str(), None), |(w, f)| (w, Some(f)));
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        match self.currency_code.symbol() {
            Some(symbol) => write!(f, "{sign}{symbol}{}", group_thousands(whole))?,
            None => write!(f, "{sign}{} {}", self.currency_code, group_thousands(whole))?,
        }
        if let Some(fraction) = fraction {
            write!(f, ".{fraction}")?;
        }
        Ok(())
    }
}

/// Insert `,` separators every three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// ISO 4217 currency codes accepted by the store and the payment widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    UGX,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Number of decimal places used by the currency.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::UGX => 0,
            Self::USD | Self::EUR | Self::GBP => 2,
        }
    }

    /// Display symbol, if the currency has a conventional one.
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        match self {
            Self::USD => Some("$"),
            Self::EUR => Some("€"),
            Self::GBP => Some("£"),
            Self::UGX => None,
        }
    }

    /// The ISO code as a string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::UGX => "UGX",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "UGX" => Ok(Self::UGX),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

/// USD to UGX conversion rate (shillings per dollar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    /// Create a rate. Returns `None` unless the rate is strictly positive.
    #[must_use]
    pub fn new(rate: Decimal) -> Option<Self> {
        (rate > Decimal::ZERO).then_some(Self(rate))
    }

    /// Shillings per dollar.
    #[must_use]
    pub const fn rate(self) -> Decimal {
        self.0
    }

    /// Convert a USD amount to whole shillings.
    #[must_use]
    pub fn usd_to_ugx(self, usd: Decimal) -> Price {
        let ugx = (usd * self.0).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Price::new(ugx, CurrencyCode::UGX)
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self(Decimal::from(DEFAULT_USD_TO_UGX_RATE))
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = String;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("exchange rate must be positive, got {value}"))
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(rate: ExchangeRate) -> Self {
        rate.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_usd_display() {
        assert_eq!(Price::usd(dec("20")).to_string(), "$20.00");
        assert_eq!(Price::usd(dec("1234.5")).to_string(), "$1,234.50");
        assert_eq!(Price::usd(dec("0.005")).to_string(), "$0.01");
    }

    #[test]
    fn test_ugx_display_has_no_minor_units() {
        let price = Price::new(dec("259000"), CurrencyCode::UGX);
        assert_eq!(price.to_string(), "UGX 259,000");
    }

    #[test]
    fn test_negative_display() {
        assert_eq!(Price::usd(dec("-5")).to_string(), "-$5.00");
    }

    #[test]
    fn test_usd_to_ugx_default_rate() {
        let rate = ExchangeRate::default();
        assert_eq!(rate.usd_to_ugx(dec("70")).amount, dec("259000"));
    }

    #[test]
    fn test_usd_to_ugx_rounds_half_away_from_zero() {
        // 2.5 shillings must round up, not to even
        let rate = ExchangeRate::new(dec("5")).unwrap();
        assert_eq!(rate.usd_to_ugx(dec("0.5")).amount, dec("3"));
    }

    #[test]
    fn test_exchange_rate_must_be_positive() {
        assert!(ExchangeRate::new(Decimal::ZERO).is_none());
        assert!(ExchangeRate::new(dec("-1")).is_none());
        assert!(serde_json::from_str::<ExchangeRate>("\"0\"").is_err());
        assert!(serde_json::from_str::<ExchangeRate>("3700").is_ok());
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("ugx".parse::<CurrencyCode>().unwrap(), CurrencyCode::UGX);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
