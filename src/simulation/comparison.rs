//! Side-by-side comparison of financing terms.
//!
//! Runs the same vehicle price and down payment through every combination
//! of term and rate so a salesperson can show the options together.

use crate::core::input::{QuoteForm, QuoteInput, INSTALLMENT_OPTIONS, RATE_OPTIONS};
use crate::core::money::{format_brl, format_rate};
use crate::financing::quote::{FinancingQuote, FinancingSimulator, QuoteError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terms and rates to compare.
#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    pub installment_counts: Vec<u32>,
    /// Monthly rates as fractions.
    pub monthly_rates: Vec<Decimal>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            installment_counts: INSTALLMENT_OPTIONS.to_vec(),
            monthly_rates: RATE_OPTIONS.to_vec(),
        }
    }
}

/// Grid of quotes, one per (term, rate) pair, ordered by term then rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermComparison {
    vehicle_price: Decimal,
    down_payment: Decimal,
    installment_counts: Vec<u32>,
    monthly_rates: Vec<Decimal>,
    quotes: Vec<FinancingQuote>,
}

impl TermComparison {
    pub fn vehicle_price(&self) -> Decimal {
        self.vehicle_price
    }

    pub fn down_payment(&self) -> Decimal {
        self.down_payment
    }

    pub fn quotes(&self) -> &[FinancingQuote] {
        &self.quotes
    }

    /// Quote for a specific term and rate, if it was part of the grid.
    pub fn get(&self, installment_count: u32, monthly_rate: Decimal) -> Option<&FinancingQuote> {
        self.quotes.iter().find(|q| {
            q.installment_count() == installment_count && q.monthly_rate() == monthly_rate
        })
    }

    /// The option with the smallest installment.
    pub fn lowest_installment(&self) -> Option<&FinancingQuote> {
        self.quotes.iter().min_by_key(|q| q.installment_amount())
    }

    /// The option with the least total interest.
    pub fn lowest_interest(&self) -> Option<&FinancingQuote> {
        self.quotes.iter().min_by_key(|q| q.total_interest())
    }
}

/// Quote every configured term/rate pair for one vehicle and down payment.
pub fn compare_terms(
    vehicle_price: Decimal,
    down_payment: Decimal,
    config: &ComparisonConfig,
) -> Result<TermComparison, QuoteError> {
    let mut quotes =
        Vec::with_capacity(config.installment_counts.len() * config.monthly_rates.len());

    for &count in &config.installment_counts {
        for &rate in &config.monthly_rates {
            let input = QuoteInput::new(vehicle_price, down_payment, count, rate)?;
            quotes.push(FinancingQuote::compute(&input)?);
        }
    }

    log::debug!(
        "compared {} terms x {} rates for {}",
        config.installment_counts.len(),
        config.monthly_rates.len(),
        vehicle_price
    );

    Ok(TermComparison {
        vehicle_price,
        down_payment,
        installment_counts: config.installment_counts.clone(),
        monthly_rates: config.monthly_rates.clone(),
        quotes,
    })
}

impl FinancingSimulator {
    /// Compare terms for the price and down payment typed into `form`.
    ///
    /// The down payment goes through the simulator's input policy exactly
    /// as it does for a single quote; the term and rate fields are ignored.
    pub fn compare_form(
        &self,
        form: &QuoteForm,
        config: &ComparisonConfig,
    ) -> Result<TermComparison, QuoteError> {
        let vehicle_price = form.parse_vehicle_price()?;
        let down_payment = form.parse_down_payment(self.policy())?;
        compare_terms(vehicle_price, down_payment, config)
    }
}

impl fmt::Display for TermComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Term Comparison ===")?;
        writeln!(f, "Vehicle Price: {}", format_brl(self.vehicle_price))?;
        writeln!(f, "Down Payment:  {}", format_brl(self.down_payment))?;
        writeln!(f, "\nMonthly installment by term (rows) and rate (columns):")?;

        write!(f, "{:>6}", "")?;
        for rate in &self.monthly_rates {
            write!(f, "  {:>14}", format_rate(*rate))?;
        }
        writeln!(f)?;

        for &count in &self.installment_counts {
            write!(f, "{:>5}x", count)?;
            for &rate in &self.monthly_rates {
                let cell = self
                    .get(count, rate)
                    .map(|q| format_brl(q.installment_amount()))
                    .unwrap_or_default();
                write!(f, "  {:>14}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputPolicy;
    use crate::core::input::InputError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_grid_covers_catalog() {
        let grid = compare_terms(dec!(25000), dec!(5000), &ComparisonConfig::default()).unwrap();
        assert_eq!(grid.quotes().len(), 36);
        let q = grid.get(24, dec!(0.015)).unwrap();
        assert_eq!(q.installment_amount().round_dp(2), dec!(998.48));
    }

    #[test]
    fn test_extremes() {
        let grid = compare_terms(dec!(25000), dec!(5000), &ComparisonConfig::default()).unwrap();

        let cheapest_monthly = grid.lowest_installment().unwrap();
        assert_eq!(cheapest_monthly.installment_count(), 60);
        assert_eq!(cheapest_monthly.monthly_rate(), dec!(0.010));

        let cheapest_overall = grid.lowest_interest().unwrap();
        assert_eq!(cheapest_overall.installment_count(), 12);
        assert_eq!(cheapest_overall.monthly_rate(), dec!(0.010));
    }

    #[test]
    fn test_custom_grid() {
        let config = ComparisonConfig {
            installment_counts: vec![10],
            monthly_rates: vec![Decimal::ZERO, dec!(0.01)],
        };
        let grid = compare_terms(dec!(1000), dec!(0), &config).unwrap();
        assert_eq!(grid.quotes().len(), 2);
        assert_eq!(grid.get(10, Decimal::ZERO).unwrap().installment_amount(), dec!(100));
        assert!(grid.get(12, Decimal::ZERO).is_none());
    }

    #[test]
    fn test_invalid_price_rejected() {
        let err = compare_terms(dec!(0), dec!(0), &ComparisonConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            QuoteError::Input(InputError::InvalidVehiclePrice(_))
        ));
    }

    #[test]
    fn test_compare_form_lenient_defaults_unreadable_down_payment() {
        let form = QuoteForm::new("25000", "abc", "", "");
        let grid = FinancingSimulator::default()
            .compare_form(&form, &ComparisonConfig::default())
            .unwrap();
        assert_eq!(grid.down_payment(), Decimal::ZERO);
        assert_eq!(grid.quotes().len(), 36);
        assert!(grid.quotes().iter().all(|q| q.financed_amount() == dec!(25000)));
    }

    #[test]
    fn test_compare_form_strict_rejects_unreadable_down_payment() {
        let form = QuoteForm::new("25000", "abc", "", "");
        let err = FinancingSimulator::new(InputPolicy::strict())
            .compare_form(&form, &ComparisonConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            QuoteError::Input(InputError::UnreadableDownPayment(_))
        ));
    }

    #[test]
    fn test_compare_form_uses_policy_default_down_payment() {
        let policy = InputPolicy {
            default_down_payment: dec!(2000),
            ..Default::default()
        };
        let form = QuoteForm::new("R$ 12.000,00", "", "", "");
        let grid = FinancingSimulator::new(policy)
            .compare_form(&form, &ComparisonConfig::default())
            .unwrap();
        assert_eq!(grid.down_payment(), dec!(2000));
        assert_eq!(grid.vehicle_price(), dec!(12000));
    }

    #[test]
    fn test_display_has_a_row_per_term() {
        let grid = compare_terms(dec!(25000), dec!(5000), &ComparisonConfig::default()).unwrap();
        let text = grid.to_string();
        assert!(text.contains("R$ 998,48"));
        assert_eq!(text.lines().filter(|l| l.contains("x  ")).count(), 6);
    }
}
