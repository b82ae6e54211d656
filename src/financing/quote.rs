use crate::config::InputPolicy;
use crate::core::input::{fallback, InputError, QuoteForm, QuoteInput};
use crate::core::money::{format_brl, format_rate};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors arising from computing a quote.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("amounts overflow for {installment_count} installments at monthly rate {monthly_rate}")]
    Overflow {
        installment_count: u32,
        monthly_rate: Decimal,
    },
    #[error("quote figures do not match its inputs")]
    Inconsistent,
}

/// A computed financing quote under compound interest.
///
/// The fixed installment follows the annuity formula
///
/// ```text
/// growth      = (1 + rate) ^ n
/// installment = financed * rate * growth / (growth - 1)
/// ```
///
/// with a zero rate falling back to `financed / n`. No field is rounded;
/// rounding happens only when a quote is displayed.
///
/// # Examples
///
/// ```
/// use moto_financing::core::input::QuoteInput;
/// use moto_financing::financing::quote::FinancingQuote;
/// use rust_decimal_macros::dec;
///
/// let input = QuoteInput::new(dec!(25000), dec!(5000), 24, dec!(0.015)).unwrap();
/// let quote = FinancingQuote::compute(&input).unwrap();
///
/// assert_eq!(quote.financed_amount(), dec!(20000));
/// assert_eq!(quote.installment_amount().round_dp(2), dec!(998.48));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingQuote {
    vehicle_price: Decimal,
    down_payment: Decimal,
    financed_amount: Decimal,
    installment_count: u32,
    installment_amount: Decimal,
    total_paid: Decimal,
    total_interest: Decimal,
    monthly_rate: Decimal,
}

impl FinancingQuote {
    /// Compute the quote for already validated inputs.
    pub fn compute(input: &QuoteInput) -> Result<Self, QuoteError> {
        let financed = input.financed_amount();
        let count = input.installment_count();
        let rate = input.monthly_rate();
        let overflow = || QuoteError::Overflow {
            installment_count: count,
            monthly_rate: rate,
        };

        let installment = installment_amount(financed, count, rate).ok_or_else(overflow)?;
        let total_paid = installment
            .checked_mul(Decimal::from(count))
            .and_then(|paid| paid.checked_add(input.down_payment()))
            .ok_or_else(overflow)?;
        let total_interest = total_paid - input.vehicle_price();

        log::debug!(
            "quote: financed {} over {} at {} -> installment {}, interest {}",
            financed,
            count,
            rate,
            installment,
            total_interest
        );

        Ok(Self {
            vehicle_price: input.vehicle_price(),
            down_payment: input.down_payment(),
            financed_amount: financed,
            installment_count: count,
            installment_amount: installment,
            total_paid,
            total_interest,
            monthly_rate: rate,
        })
    }

    /// Re-derive the quote from its own inputs and fail unless every stored
    /// figure matches. Quotes read back from disk go through this.
    pub fn verify(&self) -> Result<(), QuoteError> {
        let input = QuoteInput::new(
            self.vehicle_price,
            self.down_payment,
            self.installment_count,
            self.monthly_rate,
        )?;
        if FinancingQuote::compute(&input)? != *self {
            return Err(QuoteError::Inconsistent);
        }
        Ok(())
    }

    // --- Accessors ---

    pub fn vehicle_price(&self) -> Decimal {
        self.vehicle_price
    }

    pub fn down_payment(&self) -> Decimal {
        self.down_payment
    }

    pub fn financed_amount(&self) -> Decimal {
        self.financed_amount
    }

    pub fn installment_count(&self) -> u32 {
        self.installment_count
    }

    pub fn installment_amount(&self) -> Decimal {
        self.installment_amount
    }

    pub fn total_paid(&self) -> Decimal {
        self.total_paid
    }

    pub fn total_interest(&self) -> Decimal {
        self.total_interest
    }

    pub fn monthly_rate(&self) -> Decimal {
        self.monthly_rate
    }

    pub fn is_interest_free(&self) -> bool {
        self.monthly_rate.is_zero()
    }

    /// One-line recap, e.g.
    /// `Down payment R$ 5.000,00 + 24 installments of R$ 998,48 = R$ 28.963,57`.
    pub fn summary(&self) -> String {
        format!(
            "Down payment {} + {} installments of {} = {}",
            format_brl(self.down_payment),
            self.installment_count,
            format_brl(self.installment_amount),
            format_brl(self.total_paid)
        )
    }
}

/// Fixed installment for `financed` over `count` periods at `rate`.
///
/// Returns `None` when the intermediate amounts overflow.
fn installment_amount(financed: Decimal, count: u32, rate: Decimal) -> Option<Decimal> {
    if financed.is_zero() {
        return Some(Decimal::ZERO);
    }
    let periods = Decimal::from(count);
    if rate.is_zero() {
        return Some(financed / periods);
    }

    let growth = Decimal::ONE
        .checked_add(rate)?
        .checked_powu(u64::from(count))?;
    // A rate below the decimal's resolution leaves the growth factor at one.
    if growth == Decimal::ONE {
        return Some(financed / periods);
    }
    financed
        .checked_mul(rate)?
        .checked_mul(growth)?
        .checked_div(growth - Decimal::ONE)
}

impl fmt::Display for FinancingQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Financing Simulation ===")?;
        writeln!(f, "Vehicle Price:      {}", format_brl(self.vehicle_price))?;
        writeln!(f, "Down Payment:       {}", format_brl(self.down_payment))?;
        writeln!(f, "Financed Amount:    {}", format_brl(self.financed_amount))?;
        writeln!(f, "Installments:       {}x", self.installment_count)?;
        writeln!(f, "Installment Amount: {}", format_brl(self.installment_amount))?;
        writeln!(f, "Monthly Rate:       {} per month", format_rate(self.monthly_rate))?;
        writeln!(f, "Total Paid:         {}", format_brl(self.total_paid))?;
        writeln!(f, "Total Interest:     {}", format_brl(self.total_interest))?;
        writeln!(f)?;
        writeln!(f, "Summary: {}", self.summary())
    }
}

/// Entry point for running simulations under a given input policy.
///
/// The simulator holds no state besides its policy; one instance can serve
/// any number of callers.
#[derive(Debug, Clone, Default)]
pub struct FinancingSimulator {
    policy: InputPolicy,
}

impl FinancingSimulator {
    pub fn new(policy: InputPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &InputPolicy {
        &self.policy
    }

    /// Compute a quote from numeric inputs.
    ///
    /// A zero installment count follows the policy (default or reject);
    /// every other invalid value is rejected.
    pub fn compute_quote(
        &self,
        vehicle_price: Decimal,
        down_payment: Decimal,
        installment_count: u32,
        monthly_rate: Decimal,
    ) -> Result<FinancingQuote, QuoteError> {
        let installment_count = if installment_count == 0 {
            fallback(
                &self.policy,
                InputError::InvalidInstallmentCount("got 0".to_string()),
                self.policy.default_installments,
            )?
        } else {
            installment_count
        };
        let input = QuoteInput::new(vehicle_price, down_payment, installment_count, monthly_rate)?;
        if self.policy.catalog_only {
            input.check_catalog()?;
        }
        FinancingQuote::compute(&input)
    }

    /// Compute a quote from raw form text.
    pub fn quote_form(&self, form: &QuoteForm) -> Result<FinancingQuote, QuoteError> {
        let input = form.parse(&self.policy)?;
        FinancingQuote::compute(&input)
    }
}
