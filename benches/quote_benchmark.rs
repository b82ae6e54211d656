use criterion::{black_box, criterion_group, criterion_main, Criterion};
use moto_financing::core::input::QuoteForm;
use moto_financing::financing::quote::FinancingSimulator;
use moto_financing::financing::schedule::AmortizationSchedule;
use moto_financing::simulation::comparison::{compare_terms, ComparisonConfig};
use rust_decimal_macros::dec;

fn bench_single_quote(c: &mut Criterion) {
    let simulator = FinancingSimulator::default();

    c.bench_function("quote_24x", |b| {
        b.iter(|| {
            simulator.compute_quote(
                black_box(dec!(25000)),
                black_box(dec!(5000)),
                black_box(24),
                black_box(dec!(0.015)),
            )
        })
    });
}

fn bench_form_quote(c: &mut Criterion) {
    let simulator = FinancingSimulator::default();
    let form = QuoteForm::new("R$ 25.000,00", "R$ 5.000,00", "60", "2,5");

    c.bench_function("quote_form_60x", |b| {
        b.iter(|| simulator.quote_form(black_box(&form)))
    });
}

fn bench_schedule_60(c: &mut Criterion) {
    let quote = FinancingSimulator::default()
        .compute_quote(dec!(25000), dec!(5000), 60, dec!(0.025))
        .expect("valid quote");

    c.bench_function("schedule_60x", |b| {
        b.iter(|| AmortizationSchedule::from_quote(black_box(&quote)))
    });
}

fn bench_comparison_grid(c: &mut Criterion) {
    let config = ComparisonConfig::default();

    c.bench_function("compare_catalog", |b| {
        b.iter(|| compare_terms(black_box(dec!(25000)), black_box(dec!(5000)), &config))
    });
}

criterion_group!(
    benches,
    bench_single_quote,
    bench_form_quote,
    bench_schedule_60,
    bench_comparison_grid
);
criterion_main!(benches);
