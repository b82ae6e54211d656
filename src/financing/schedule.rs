use crate::core::money::format_brl;
use crate::financing::quote::FinancingQuote;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest schedule that will be tabulated: 100 years of monthly payments.
pub const MAX_SCHEDULE_ROWS: u32 = 1200;

/// Errors arising from tabulating a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("{requested} installments is too many to tabulate (at most {max})")]
    TooManyRows { requested: u32, max: u32 },
}

/// One period of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based installment number.
    pub number: u32,
    pub payment: Decimal,
    /// Interest accrued on the opening balance this period.
    pub interest: Decimal,
    /// Portion of the payment that reduces the balance.
    pub principal: Decimal,
    /// Balance left after this payment.
    pub balance: Decimal,
}

/// Period-by-period breakdown of a quote (French / Price amortization).
///
/// Every payment equals the quote's installment except the last, which
/// settles whatever residual the decimal arithmetic left, so the closing
/// balance is exactly zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    financed_amount: Decimal,
    monthly_rate: Decimal,
    rows: Vec<ScheduleRow>,
}

impl AmortizationSchedule {
    /// Tabulate `quote`, refusing terms longer than [`MAX_SCHEDULE_ROWS`].
    pub fn from_quote(quote: &FinancingQuote) -> Result<Self, ScheduleError> {
        let rate = quote.monthly_rate();
        let payment = quote.installment_amount();
        let count = quote.installment_count();
        if count > MAX_SCHEDULE_ROWS {
            return Err(ScheduleError::TooManyRows {
                requested: count,
                max: MAX_SCHEDULE_ROWS,
            });
        }

        let mut balance = quote.financed_amount();
        let mut rows = Vec::with_capacity(count as usize);

        for number in 1..=count {
            let interest = balance * rate;
            let (principal, payment) = if number == count {
                (balance, balance + interest)
            } else {
                (payment - interest, payment)
            };
            balance -= principal;
            rows.push(ScheduleRow {
                number,
                payment,
                interest,
                principal,
                balance,
            });
        }

        log::debug!(
            "schedule: {} rows, last payment {}",
            rows.len(),
            rows.last().map(|r| r.payment).unwrap_or_default()
        );

        Ok(Self {
            financed_amount: quote.financed_amount(),
            monthly_rate: rate,
            rows,
        })
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn financed_amount(&self) -> Decimal {
        self.financed_amount
    }

    pub fn monthly_rate(&self) -> Decimal {
        self.monthly_rate
    }

    /// Sum of all payments.
    pub fn total_payments(&self) -> Decimal {
        self.rows.iter().map(|r| r.payment).sum()
    }

    /// Sum of the interest column.
    pub fn total_interest(&self) -> Decimal {
        self.rows.iter().map(|r| r.interest).sum()
    }

    /// Sum of the principal column; the financed amount up to decimal precision.
    pub fn total_principal(&self) -> Decimal {
        self.rows.iter().map(|r| r.principal).sum()
    }

    /// Balance after the final payment.
    pub fn closing_balance(&self) -> Decimal {
        self.rows
            .last()
            .map(|r| r.balance)
            .unwrap_or(self.financed_amount)
    }
}

impl fmt::Display for AmortizationSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Amortization Schedule ===")?;
        writeln!(
            f,
            "{:>4}  {:>16}  {:>16}  {:>16}  {:>16}",
            "#", "Payment", "Interest", "Principal", "Balance"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>4}  {:>16}  {:>16}  {:>16}  {:>16}",
                row.number,
                format_brl(row.payment),
                format_brl(row.interest),
                format_brl(row.principal),
                format_brl(row.balance)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total Payments: {}", format_brl(self.total_payments()))?;
        writeln!(f, "Total Interest: {}", format_brl(self.total_interest()))
    }
}
