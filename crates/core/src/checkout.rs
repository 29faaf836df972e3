//! Checkout pricing and contact form validation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, Email, ExchangeRate, Price};

/// A form field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    /// Name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Missing(field) | Self::Invalid { field, .. } => field,
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Trim `value` and reject it if nothing is left.
///
/// # Errors
///
/// Returns [`ValidationError::Missing`] naming `field`.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(trimmed.to_string())
}

/// Delivery speed chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
}

impl ShippingMethod {
    /// Flat fee in USD, before any backend surcharge.
    #[must_use]
    pub fn fee(self) -> Decimal {
        match self {
            Self::Standard => Decimal::from(10),
            Self::Express => Decimal::from(25),
        }
    }
}

/// Store-wide pricing settings published by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Surcharge in USD added on top of the shipping method fee.
    pub shipping_rate: Decimal,
    /// Tax as a fraction of the subtotal (0.12 = 12%).
    pub tax_rate: Decimal,
    pub usd_to_ugx: ExchangeRate,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            shipping_rate: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            usd_to_ugx: ExchangeRate::default(),
        }
    }
}

/// Raw `/checkout-settings/` payload. Field names vary between backend
/// versions, so both spellings are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSettingsPayload {
    #[serde(default, rename = "shippingRate", alias = "SHIPPING_RATE")]
    pub shipping_rate: Option<Decimal>,
    #[serde(default, rename = "taxRate", alias = "TAX_RATE")]
    pub tax_rate: Option<Decimal>,
    #[serde(default, rename = "usdToUgxRate", alias = "USD_TO_UGX_RATE")]
    pub usd_to_ugx_rate: Option<Decimal>,
}

impl TryFrom<CheckoutSettingsPayload> for CheckoutSettings {
    type Error = ValidationError;

    /// Normalize the payload. A tax rate above 1 is read as a percentage.
    fn try_from(payload: CheckoutSettingsPayload) -> Result<Self, Self::Error> {
        let shipping_rate = payload.shipping_rate.unwrap_or_default();
        if shipping_rate < Decimal::ZERO {
            return Err(ValidationError::invalid("shippingRate", "must not be negative"));
        }

        let raw_tax = payload.tax_rate.unwrap_or_default();
        if raw_tax < Decimal::ZERO {
            return Err(ValidationError::invalid("taxRate", "must not be negative"));
        }
        let tax_rate = if raw_tax > Decimal::ONE {
            raw_tax / Decimal::ONE_HUNDRED
        } else {
            raw_tax
        };

        let usd_to_ugx = match payload.usd_to_ugx_rate {
            Some(rate) => ExchangeRate::new(rate)
                .ok_or_else(|| ValidationError::invalid("usdToUgxRate", "must be positive"))?,
            None => ExchangeRate::default(),
        };

        Ok(Self {
            shipping_rate,
            tax_rate,
            usd_to_ugx,
        })
    }
}

/// Contact and delivery details submitted at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub shipping_method: ShippingMethod,
}

/// A checkout form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: String,
    pub shipping_method: ShippingMethod,
}

impl ShippingDetails {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CheckoutForm {
    /// Check required fields in form order and parse the email.
    ///
    /// # Errors
    ///
    /// Returns the first field that is missing or invalid.
    pub fn validate(&self) -> Result<ShippingDetails, ValidationError> {
        let first_name = required("first_name", &self.first_name)?;
        let last_name = required("last_name", &self.last_name)?;
        let email = required("email", &self.email)?;
        let email =
            Email::parse(&email).map_err(|e| ValidationError::invalid("email", e.to_string()))?;
        let phone = required("phone", &self.phone)?;
        let address = required("address", &self.address)?;
        let city = required("city", &self.city)?;
        let country = required("country", &self.country)?;

        Ok(ShippingDetails {
            first_name,
            last_name,
            email,
            phone,
            address,
            city,
            state: optional(&self.state),
            zip_code: optional(&self.zip_code),
            country,
            shipping_method: self.shipping_method,
        })
    }
}

/// Totals shown before payment, in USD with the UGX equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    /// `total` converted to whole shillings.
    pub total_ugx: Decimal,
}

impl OrderSummary {
    /// Price a cart subtotal with the chosen shipping method.
    #[must_use]
    pub fn compute(
        subtotal: Decimal,
        method: ShippingMethod,
        settings: &CheckoutSettings,
    ) -> Self {
        let shipping = method.fee() + settings.shipping_rate;
        let tax = (subtotal * settings.tax_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let total = subtotal + shipping + tax;
        let total_ugx = settings.usd_to_ugx.usd_to_ugx(total).amount;
        Self {
            subtotal,
            shipping,
            tax,
            total,
            total_ugx,
        }
    }

    /// The amount to charge in `currency`.
    ///
    /// UGX charges use the converted total; other currencies charge the USD
    /// figure as-is.
    #[must_use]
    pub fn charge_in(&self, currency: CurrencyCode) -> Price {
        match currency {
            CurrencyCode::UGX => Price::new(self.total_ugx, CurrencyCode::UGX),
            other => Price::new(self.total, other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ada".to_string(),
            last_name: "Okello".to_string(),
            email: " ada@example.com ".to_string(),
            phone: "+256700000000".to_string(),
            address: "Plot 4 Kampala Road".to_string(),
            city: "Kampala".to_string(),
            country: "Uganda".to_string(),
            ..CheckoutForm::default()
        }
    }

    #[test]
    fn test_summary_without_surcharge_or_tax() {
        let summary = OrderSummary::compute(
            dec("20"),
            ShippingMethod::Standard,
            &CheckoutSettings::default(),
        );
        assert_eq!(summary.shipping, dec("10"));
        assert_eq!(summary.tax, Decimal::ZERO);
        assert_eq!(summary.total, dec("30"));
        assert_eq!(summary.total_ugx, dec("111000"));
    }

    #[test]
    fn test_summary_with_surcharge_and_tax() {
        let settings = CheckoutSettings {
            shipping_rate: dec("2.50"),
            tax_rate: dec("0.125"),
            usd_to_ugx: ExchangeRate::default(),
        };
        let summary = OrderSummary::compute(dec("10.02"), ShippingMethod::Express, &settings);
        assert_eq!(summary.shipping, dec("27.50"));
        // 1.2525 rounds to 1.25
        assert_eq!(summary.tax, dec("1.25"));
        assert_eq!(summary.total, dec("38.77"));
        assert_eq!(summary.charge_in(CurrencyCode::UGX).amount, dec("143449"));
        assert_eq!(summary.charge_in(CurrencyCode::USD).amount, dec("38.77"));
    }

    #[test]
    fn test_settings_percent_tax_is_normalized() {
        let payload: CheckoutSettingsPayload =
            serde_json::from_str(r#"{"shippingRate": 5, "taxRate": 12, "usdToUgxRate": 3800}"#)
                .unwrap();
        let settings = CheckoutSettings::try_from(payload).unwrap();
        assert_eq!(settings.tax_rate, dec("0.12"));
        assert_eq!(settings.shipping_rate, dec("5"));
        assert_eq!(settings.usd_to_ugx.rate(), dec("3800"));
    }

    #[test]
    fn test_settings_accept_upper_snake_names_and_defaults() {
        let payload: CheckoutSettingsPayload =
            serde_json::from_str(r#"{"TAX_RATE": "0.18"}"#).unwrap();
        let settings = CheckoutSettings::try_from(payload).unwrap();
        assert_eq!(settings.tax_rate, dec("0.18"));
        assert_eq!(settings.shipping_rate, Decimal::ZERO);
        assert_eq!(settings.usd_to_ugx, ExchangeRate::default());
    }

    #[test]
    fn test_settings_reject_invalid_values() {
        let negative = CheckoutSettingsPayload {
            shipping_rate: Some(dec("-1")),
            ..CheckoutSettingsPayload::default()
        };
        assert_eq!(
            CheckoutSettings::try_from(negative).unwrap_err().field(),
            "shippingRate"
        );

        let zero_rate = CheckoutSettingsPayload {
            usd_to_ugx_rate: Some(Decimal::ZERO),
            ..CheckoutSettingsPayload::default()
        };
        assert_eq!(
            CheckoutSettings::try_from(zero_rate).unwrap_err().field(),
            "usdToUgxRate"
        );
    }

    #[test]
    fn test_valid_form() {
        let details = valid_form().validate().unwrap();
        assert_eq!(details.email.as_str(), "ada@example.com");
        assert_eq!(details.full_name(), "Ada Okello");
        assert_eq!(details.state, None);
        assert_eq!(details.shipping_method, ShippingMethod::Standard);
    }

    #[test]
    fn test_form_errors_name_the_field() {
        let mut form = valid_form();
        form.city = "   ".to_string();
        assert_eq!(form.validate(), Err(ValidationError::Missing("city")));

        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(err.field(), "email");
        assert!(matches!(err, ValidationError::Invalid { .. }));

        assert_eq!(
            CheckoutForm::default().validate(),
            Err(ValidationError::Missing("first_name"))
        );
    }

    #[test]
    fn test_shipping_method_names() {
        let method: ShippingMethod = serde_json::from_str("\"express\"").unwrap();
        assert_eq!(method.fee(), dec("25"));
    }
}
