//! moto-financing CLI
//!
//! Run financing simulations from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Quote a motorcycle: price, down payment, 24 installments at 1.5% a month
//! moto-financing quote --price "R$ 25.000,00" --down 5000 --installments 24 --rate 1.5
//!
//! # Output as JSON
//! moto-financing quote --price 25000 --format json
//!
//! # Full amortization table
//! moto-financing schedule --price 25000 --down 5000
//!
//! # Compare every offered term and rate
//! moto-financing compare --price 25000 --down 5000
//! ```

use moto_financing::config::{CoercionMode, SimulatorConfig};
use moto_financing::core::ids::{LeadId, Role, UserId};
use moto_financing::core::input::QuoteForm;
use moto_financing::core::money::format_rate;
use moto_financing::financing::quote::{FinancingQuote, FinancingSimulator};
use moto_financing::financing::schedule::AmortizationSchedule;
use moto_financing::simulation::comparison::ComparisonConfig;
use moto_financing::simulation::record::SimulationRecord;
use serde::Serialize;
use std::process;

fn print_usage() {
    eprintln!(
        r#"moto-financing — compound-interest financing simulator

USAGE:
    moto-financing <COMMAND> [OPTIONS]

COMMANDS:
    quote       Compute the monthly installment for one scenario
    schedule    Print the amortization table for one scenario
    compare     Compare every offered term and rate side by side
    help        Show this message

OPTIONS (all commands):
    --price <AMOUNT>        Vehicle price, e.g. 25000 or "R$ 25.000,00" (required)
    --down <AMOUNT>         Down payment (default: 0)
    --format <FORMAT>       Output format: text (default) or json
    --config <FILE>         JSON config file with the input policy
    --strict                Reject malformed fields instead of using defaults

OPTIONS (quote, schedule):
    --installments <N>      Number of monthly installments (default: 24)
    --rate <PERCENT>        Monthly interest rate in percent (default: 1.5)

OPTIONS (quote):
    --save <FILE>           Save the simulation as a JSON record
    --lead <ID>             Lead the simulation is for (required with --save)
    --seller <ID>           Salesperson running it (required with --save)
    --role <ROLE>           admin or vendedor (default: vendedor)
    --notes <TEXT>          Free-text notes for the saved record

ENVIRONMENT:
    RUST_LOG                Log verbosity, e.g. RUST_LOG=debug

EXAMPLES:
    moto-financing quote --price 25000 --down 5000 --installments 36 --rate 1.8
    moto-financing quote --price 25000 --format json
    moto-financing quote --price 25000 --save sim.json --lead L-17 --seller S-3
    moto-financing schedule --price 12000 --installments 12 --rate 0
    moto-financing compare --price 25000 --down 5000"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Options shared by every command.
#[derive(Default)]
struct Options {
    price: Option<String>,
    down: String,
    installments: Option<String>,
    rate: Option<String>,
    format: Option<String>,
    config: Option<String>,
    strict: bool,
    save: Option<String>,
    lead: Option<String>,
    seller: Option<String>,
    role: Option<String>,
    notes: Option<String>,
}

impl Options {
    fn parse(args: &[String]) -> Self {
        let mut opts = Options::default();
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            if flag == "--strict" {
                opts.strict = true;
                i += 1;
                continue;
            }

            i += 1;
            let value = args
                .get(i)
                .cloned()
                .unwrap_or_else(|| fail(format!("{} requires a value", flag)));
            match flag {
                "--price" => opts.price = Some(value),
                "--down" => opts.down = value,
                "--installments" => opts.installments = Some(value),
                "--rate" => opts.rate = Some(value),
                "--format" => opts.format = Some(value),
                "--config" => opts.config = Some(value),
                "--save" => opts.save = Some(value),
                "--lead" => opts.lead = Some(value),
                "--seller" => opts.seller = Some(value),
                "--role" => opts.role = Some(value),
                "--notes" => opts.notes = Some(value),
                _ => fail(format!("unknown option: {}", flag)),
            }
            i += 1;
        }
        opts
    }

    fn json(&self) -> bool {
        match self.format.as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => fail(format!("--format must be 'text' or 'json', got '{}'", other)),
        }
    }

    fn simulator(&self) -> FinancingSimulator {
        let mut config = match &self.config {
            Some(path) => SimulatorConfig::from_json_file(path).unwrap_or_else(|e| fail(e)),
            None => SimulatorConfig::default(),
        };
        if self.strict {
            config.input.mode = CoercionMode::Strict;
        }
        FinancingSimulator::new(config.input)
    }

    fn price(&self) -> &str {
        self.price
            .as_deref()
            .unwrap_or_else(|| fail("--price <AMOUNT> is required"))
    }

    /// The form a salesperson would have filled in, with the form's own
    /// preselected term and rate when the flags are absent.
    fn form(&self) -> QuoteForm {
        QuoteForm::new(
            self.price(),
            self.down.as_str(),
            self.installments.as_deref().unwrap_or("24"),
            self.rate.as_deref().unwrap_or("1.5"),
        )
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("cannot encode JSON: {}", e)),
    }
}

fn compute(opts: &Options) -> FinancingQuote {
    opts.simulator()
        .quote_form(&opts.form())
        .unwrap_or_else(|e| fail(e))
}

fn save_record(opts: &Options, path: &str, quote: FinancingQuote) {
    let lead = opts
        .lead
        .as_deref()
        .unwrap_or_else(|| fail("--save requires --lead <ID>"));
    let seller = opts
        .seller
        .as_deref()
        .unwrap_or_else(|| fail("--save requires --seller <ID>"));
    let role: Role = opts
        .role
        .as_deref()
        .unwrap_or("vendedor")
        .parse()
        .unwrap_or_else(|e| fail(e));

    let mut record = SimulationRecord::new(LeadId::new(lead), UserId::new(seller), role, quote)
        .unwrap_or_else(|e| fail(e));
    if let Some(notes) = &opts.notes {
        record = record.with_notes(notes.as_str());
    }
    record.save_to(path).unwrap_or_else(|e| fail(e));
    eprintln!("Saved simulation {} → {}", record.id(), path);
}

fn cmd_quote(args: &[String]) {
    let opts = Options::parse(args);
    let quote = compute(&opts);

    if opts.json() {
        print_json(&quote);
    } else {
        println!("{}", quote);
    }

    if let Some(path) = &opts.save {
        save_record(&opts, path, quote);
    }
}

fn cmd_schedule(args: &[String]) {
    let opts = Options::parse(args);
    let quote = compute(&opts);
    let schedule = AmortizationSchedule::from_quote(&quote).unwrap_or_else(|e| fail(e));

    if opts.json() {
        print_json(&schedule);
    } else {
        println!("{}", quote);
        println!("{}", schedule);
    }
}

fn cmd_compare(args: &[String]) {
    let opts = Options::parse(args);
    let comparison = opts
        .simulator()
        .compare_form(&opts.form(), &ComparisonConfig::default())
        .unwrap_or_else(|e| fail(e));

    if opts.json() {
        print_json(&comparison);
    } else {
        println!("{}", comparison);
        if let Some(best) = comparison.lowest_interest() {
            println!(
                "Least interest: {}x at {} → {}",
                best.installment_count(),
                format_rate(best.monthly_rate()),
                best.summary()
            );
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "quote" => cmd_quote(rest),
        "schedule" => cmd_schedule(rest),
        "compare" => cmd_compare(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
