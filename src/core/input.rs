use crate::config::InputPolicy;
use crate::core::money::{parse_money, parse_percent, AmountParseError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Installment counts offered by the sales form.
pub const INSTALLMENT_OPTIONS: [u32; 6] = [12, 18, 24, 36, 48, 60];

/// Monthly rates offered by the sales form, as fractions.
pub const RATE_OPTIONS: [Decimal; 6] = [
    dec!(0.010),
    dec!(0.012),
    dec!(0.015),
    dec!(0.018),
    dec!(0.020),
    dec!(0.025),
];

/// Per-field validation failures for a financing quote.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("vehicle price is required and must be positive: {0}")]
    InvalidVehiclePrice(String),
    #[error("down payment cannot be read: {0}")]
    UnreadableDownPayment(AmountParseError),
    #[error("down payment must not be negative, got {0}")]
    NegativeDownPayment(Decimal),
    #[error("down payment {down_payment} exceeds vehicle price {vehicle_price}")]
    DownPaymentExceedsPrice {
        down_payment: Decimal,
        vehicle_price: Decimal,
    },
    #[error("installment count must be a positive integer: {0}")]
    InvalidInstallmentCount(String),
    #[error("monthly rate cannot be read: {0}")]
    UnreadableRate(AmountParseError),
    #[error("monthly rate must not be negative, got {0}")]
    NegativeRate(Decimal),
    #[error("{0} installments is not an offered term (12, 18, 24, 36, 48 or 60)")]
    OffCatalogInstallments(u32),
    #[error("monthly rate {0} is not an offered rate")]
    OffCatalogRate(Decimal),
}

impl InputError {
    /// Name of the form field this error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            InputError::InvalidVehiclePrice(_) => "vehicle_price",
            InputError::UnreadableDownPayment(_)
            | InputError::NegativeDownPayment(_)
            | InputError::DownPaymentExceedsPrice { .. } => "down_payment",
            InputError::InvalidInstallmentCount(_) | InputError::OffCatalogInstallments(_) => {
                "installments"
            }
            InputError::UnreadableRate(_)
            | InputError::NegativeRate(_)
            | InputError::OffCatalogRate(_) => "monthly_rate",
        }
    }
}

/// Validated inputs for a financing quote.
///
/// Holding a `QuoteInput` guarantees `vehicle_price > 0`,
/// `0 <= down_payment <= vehicle_price`, `installment_count > 0` and
/// `monthly_rate >= 0`.
///
/// # Examples
///
/// ```
/// use moto_financing::core::input::QuoteInput;
/// use rust_decimal_macros::dec;
///
/// let input = QuoteInput::new(dec!(25000), dec!(5000), 24, dec!(0.015)).unwrap();
/// assert_eq!(input.financed_amount(), dec!(20000));
///
/// assert!(QuoteInput::new(dec!(0), dec!(0), 24, dec!(0.015)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuoteInput {
    vehicle_price: Decimal,
    down_payment: Decimal,
    installment_count: u32,
    monthly_rate: Decimal,
}

impl QuoteInput {
    pub fn new(
        vehicle_price: Decimal,
        down_payment: Decimal,
        installment_count: u32,
        monthly_rate: Decimal,
    ) -> Result<Self, InputError> {
        if vehicle_price <= Decimal::ZERO {
            return Err(InputError::InvalidVehiclePrice(format!(
                "got {}",
                vehicle_price
            )));
        }
        if down_payment < Decimal::ZERO {
            return Err(InputError::NegativeDownPayment(down_payment));
        }
        if down_payment > vehicle_price {
            return Err(InputError::DownPaymentExceedsPrice {
                down_payment,
                vehicle_price,
            });
        }
        if installment_count == 0 {
            return Err(InputError::InvalidInstallmentCount("got 0".to_string()));
        }
        if monthly_rate < Decimal::ZERO {
            return Err(InputError::NegativeRate(monthly_rate));
        }
        Ok(Self {
            vehicle_price,
            down_payment,
            installment_count,
            monthly_rate,
        })
    }

    /// Fail unless the term and rate are among the ones the sales form offers.
    pub fn check_catalog(&self) -> Result<(), InputError> {
        if !INSTALLMENT_OPTIONS.contains(&self.installment_count) {
            return Err(InputError::OffCatalogInstallments(self.installment_count));
        }
        if !RATE_OPTIONS.contains(&self.monthly_rate) {
            return Err(InputError::OffCatalogRate(self.monthly_rate));
        }
        Ok(())
    }

    pub fn vehicle_price(&self) -> Decimal {
        self.vehicle_price
    }

    pub fn down_payment(&self) -> Decimal {
        self.down_payment
    }

    pub fn installment_count(&self) -> u32 {
        self.installment_count
    }

    pub fn monthly_rate(&self) -> Decimal {
        self.monthly_rate
    }

    /// Principal subject to interest.
    pub fn financed_amount(&self) -> Decimal {
        self.vehicle_price - self.down_payment
    }
}

/// Quote request exactly as typed into the sales form.
///
/// The rate is a percentage (`"1.5"` means 1.5% a month). Money fields
/// accept pt-BR formatting such as `"R$ 25.000,00"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteForm {
    pub vehicle_price: String,
    #[serde(default)]
    pub down_payment: String,
    #[serde(default)]
    pub installments: String,
    #[serde(default)]
    pub monthly_rate_percent: String,
}

impl QuoteForm {
    pub fn new(
        vehicle_price: impl Into<String>,
        down_payment: impl Into<String>,
        installments: impl Into<String>,
        monthly_rate_percent: impl Into<String>,
    ) -> Self {
        Self {
            vehicle_price: vehicle_price.into(),
            down_payment: down_payment.into(),
            installments: installments.into(),
            monthly_rate_percent: monthly_rate_percent.into(),
        }
    }

    /// Validate the form under `policy`.
    ///
    /// The down payment is optional: a blank field means the policy's
    /// default under every mode.
    pub fn parse(&self, policy: &InputPolicy) -> Result<QuoteInput, InputError> {
        let vehicle_price = self.parse_vehicle_price()?;
        let down_payment = self.parse_down_payment(policy)?;

        let installment_count = match self.installments.trim().parse::<i64>() {
            Ok(n) if n > 0 => match u32::try_from(n) {
                Ok(count) => count,
                Err(_) => fallback(
                    policy,
                    InputError::InvalidInstallmentCount(format!("{} is too large", n)),
                    policy.default_installments,
                )?,
            },
            Ok(n) => fallback(
                policy,
                InputError::InvalidInstallmentCount(format!("got {}", n)),
                policy.default_installments,
            )?,
            Err(_) => fallback(
                policy,
                InputError::InvalidInstallmentCount(format!(
                    "'{}' is not an integer",
                    self.installments.trim()
                )),
                policy.default_installments,
            )?,
        };

        let monthly_rate = match parse_percent(&self.monthly_rate_percent) {
            Ok(rate) => rate,
            Err(e) => fallback(
                policy,
                InputError::UnreadableRate(e),
                policy.default_monthly_rate,
            )?,
        };

        let input = QuoteInput::new(vehicle_price, down_payment, installment_count, monthly_rate)?;
        if policy.catalog_only {
            input.check_catalog()?;
        }
        Ok(input)
    }

    /// The vehicle price, which is never defaulted.
    pub fn parse_vehicle_price(&self) -> Result<Decimal, InputError> {
        parse_money(&self.vehicle_price)
            .map_err(|e| InputError::InvalidVehiclePrice(e.to_string()))
    }

    /// The down payment as typed, or the policy's default when blank or,
    /// under a lenient policy, unreadable.
    pub fn parse_down_payment(&self, policy: &InputPolicy) -> Result<Decimal, InputError> {
        if self.down_payment.trim().is_empty() {
            return Ok(policy.default_down_payment);
        }
        match parse_money(&self.down_payment) {
            Ok(amount) => Ok(amount),
            Err(e) => fallback(
                policy,
                InputError::UnreadableDownPayment(e),
                policy.default_down_payment,
            ),
        }
    }
}

/// Resolve a field failure: strict mode propagates it, lenient mode logs and
/// substitutes `default`.
pub(crate) fn fallback<T: std::fmt::Display>(
    policy: &InputPolicy,
    error: InputError,
    default: T,
) -> Result<T, InputError> {
    if policy.is_strict() {
        return Err(error);
    }
    log::warn!("{} ({}); using default {}", error, error.field(), default);
    Ok(default)
}
