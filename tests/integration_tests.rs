use moto_financing::config::{CoercionMode, InputPolicy, SimulatorConfig};
use moto_financing::core::ids::{LeadId, Role, UserId};
use moto_financing::core::input::{InputError, QuoteForm};
use moto_financing::financing::quote::{FinancingSimulator, QuoteError};
use moto_financing::financing::schedule::AmortizationSchedule;
use moto_financing::simulation::comparison::{compare_terms, ComparisonConfig};
use moto_financing::simulation::record::SimulationRecord;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Full pipeline: typed form → quote → schedule → saved record.
#[test]
fn full_pipeline_sales_floor_scenario() {
    let simulator = FinancingSimulator::default();
    let form = QuoteForm::new("R$ 25.000,00", "R$ 5.000,00", "24", "1.5");

    let quote = simulator.quote_form(&form).unwrap();
    assert_eq!(quote.vehicle_price(), dec!(25000));
    assert_eq!(quote.down_payment(), dec!(5000));
    assert_eq!(quote.financed_amount(), dec!(20000));
    assert_eq!(quote.installment_count(), 24);
    assert_eq!(quote.monthly_rate(), dec!(0.015));
    assert_eq!(quote.installment_amount().round_dp(2), dec!(998.48));
    assert_eq!(quote.total_paid().round_dp(2), dec!(28963.57));
    assert_eq!(quote.total_interest().round_dp(2), dec!(3963.57));

    // The schedule agrees with the quote.
    let schedule = AmortizationSchedule::from_quote(&quote).unwrap();
    assert_eq!(schedule.len(), 24);
    assert_eq!(schedule.closing_balance(), Decimal::ZERO);
    assert_eq!(
        schedule.total_interest().round_dp(6),
        quote.total_interest().round_dp(6)
    );

    // The record keeps the quote unrounded.
    let record = SimulationRecord::new(
        LeadId::new("lead-2024-001"),
        UserId::new("vendedor-12"),
        Role::Vendedor,
        quote.clone(),
    )
    .unwrap()
    .with_notes("wants to decide this week");
    assert_eq!(record.quote(), &quote);

    let path = std::env::temp_dir().join(format!("moto-financing-it-{}.json", record.id()));
    record.save_to(&path).unwrap();
    let loaded = SimulationRecord::load_from(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded.quote().installment_amount(), quote.installment_amount());
    assert_eq!(loaded.notes(), Some("wants to decide this week"));
}

#[test]
fn down_payment_covers_whole_price() {
    let simulator = FinancingSimulator::default();
    for n in [12, 18, 24, 36, 48, 60] {
        let quote = simulator
            .compute_quote(dec!(10000), dec!(10000), n, dec!(0.025))
            .unwrap();
        assert_eq!(quote.financed_amount(), Decimal::ZERO);
        assert_eq!(quote.installment_amount(), Decimal::ZERO);
        assert_eq!(quote.total_paid(), dec!(10000));
        assert_eq!(quote.total_interest(), Decimal::ZERO);
    }
}

#[test]
fn price_is_the_single_validation_gate_when_lenient() {
    let simulator = FinancingSimulator::default();

    for price in ["", "   ", "free", "0", "-100", "R$ 0,00"] {
        let form = QuoteForm::new(price, "1000", "24", "1.5");
        let err = simulator.quote_form(&form).unwrap_err();
        assert!(
            matches!(err, QuoteError::Input(InputError::InvalidVehiclePrice(_))),
            "price {:?} should be rejected, got {:?}",
            price,
            err
        );
    }

    // Everything else falls back to the sales form defaults.
    let form = QuoteForm::new("25000", "???", "", "x");
    let quote = simulator.quote_form(&form).unwrap();
    assert_eq!(quote.down_payment(), Decimal::ZERO);
    assert_eq!(quote.installment_count(), 24);
    assert_eq!(quote.monthly_rate(), dec!(0.015));
}

#[test]
fn strict_config_file_rejects_what_lenient_defaults() {
    let config = SimulatorConfig::from_json_str(r#"{ "input": { "mode": "strict" } }"#).unwrap();
    assert_eq!(config.input.mode, CoercionMode::Strict);

    let strict = FinancingSimulator::new(config.input);
    let lenient = FinancingSimulator::default();
    let form = QuoteForm::new("25000", "5000", "twenty", "1.5");

    assert!(lenient.quote_form(&form).is_ok());
    let err = strict.quote_form(&form).unwrap_err();
    assert!(err.to_string().contains("installment"));
}

#[test]
fn custom_defaults_apply() {
    let policy = InputPolicy {
        default_installments: 36,
        default_monthly_rate: dec!(0.02),
        ..Default::default()
    };
    let quote = FinancingSimulator::new(policy)
        .quote_form(&QuoteForm::new("30000", "", "", ""))
        .unwrap();
    assert_eq!(quote.installment_count(), 36);
    assert_eq!(quote.monthly_rate(), dec!(0.02));
}

#[test]
fn zero_rate_is_a_designed_case() {
    let quote = FinancingSimulator::default()
        .quote_form(&QuoteForm::new("R$ 9.000,00", "", "18", "0"))
        .unwrap();
    assert_eq!(quote.installment_amount(), dec!(500));
    assert_eq!(quote.total_interest(), Decimal::ZERO);
    assert!(quote.to_string().contains("0.0% per month"));
}

#[test]
fn comparison_grid_contains_the_single_quote() {
    let simulator = FinancingSimulator::default();
    let grid = compare_terms(dec!(18000), dec!(3000), &ComparisonConfig::default()).unwrap();

    for quote in grid.quotes() {
        let single = simulator
            .compute_quote(
                dec!(18000),
                dec!(3000),
                quote.installment_count(),
                quote.monthly_rate(),
            )
            .unwrap();
        assert_eq!(&single, quote);
    }
}

#[test]
fn referrers_cannot_save_simulations() {
    let quote = FinancingSimulator::default()
        .compute_quote(dec!(15000), dec!(0), 12, dec!(0.01))
        .unwrap();
    let result = SimulationRecord::new(
        LeadId::new("lead-9"),
        UserId::new("indicador-4"),
        Role::Indicador,
        quote,
    );
    assert!(result.is_err());
}
