//! Compound-interest financing: installment quotes and amortization schedules.

pub mod quote;
pub mod schedule;
