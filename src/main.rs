//! margin-penalty CLI
//!
//! Check margin shortfall penalties from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Check a single shortfall
//! margin-penalty check --available 368578.89 --required 5361689.21
//!
//! # Repeat violation, JSON output
//! margin-penalty check --available 0 --required 250000 --rate 0.5 --days 4 --format json
//!
//! # Combine several shortfalls from a file
//! margin-penalty combine --input shortfalls.json
//!
//! # Generate random shortfalls for testing
//! margin-penalty generate --count 20
//! ```

use env_logger::Env;
use margin_penalty::core::input::{MarginInput, PenaltyRate};
use margin_penalty::core::money::Grouping;
use margin_penalty::penalty::calculator::{PenaltyCalculator, PenaltyResult, PenaltyStatus};
use margin_penalty::penalty::combined::{CombinedAssessment, ShortfallSet};
use margin_penalty::penalty::report::{AssessmentReport, CombinedReport, ReportFormat};
use margin_penalty::simulation::scenario_gen::{generate_random_scenarios, ScenarioConfig};
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"margin-penalty: margin shortfall penalty checker

USAGE:
    margin-penalty <COMMAND> [OPTIONS]

COMMANDS:
    check       Check one shortfall for penalty
    combine     Check several shortfalls from a JSON file and total them
    generate    Generate random shortfalls (for testing)
    help        Show this message

OPTIONS (check):
    --available <AMT>   Margin available (funds + collateral)
    --required <AMT>    Margin required
    --rate <PCT>        Base penalty rate: 0.5, 1.0 (default) or 5.0
    --days <N>          Consecutive days of shortfall, 0-10 (default: 0)
    --instances <N>     Shortfall instances this month, 0-30 (default: 0)

OPTIONS (check, combine):
    --input <FILE>      Path to JSON shortfalls file (combine only)
    --format <FORMAT>   Output format: text (default) or json
    --grouping <STYLE>  Digit grouping: western (default) or indian

OPTIONS (generate):
    --count <N>         Number of shortfalls (default: 10)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log filter (default: warn)

EXAMPLES:
    margin-penalty check --available 368578.89 --required 5361689.21
    margin-penalty check --available 0 --required 250000 --rate 0.5 --days 4
    margin-penalty combine --input shortfalls.json --grouping indian
    margin-penalty generate --count 20 --output shortfalls.json"#
    );
}

/// JSON output schema for a single assessment.
#[derive(serde::Serialize)]
struct AssessmentOutput {
    label: Option<String>,
    margin_available: String,
    margin_required: String,
    shortfall: String,
    shortfall_pct: String,
    status: PenaltyStatus,
    penalty_applicable: bool,
    trigger_reasons: Vec<String>,
    base_rate: String,
    effective_rate: String,
    escalation: Option<String>,
    penalty_amount: Option<String>,
    gst_amount: Option<String>,
    total_penalty: Option<String>,
}

impl AssessmentOutput {
    fn new(label: Option<&str>, input: &MarginInput, result: &PenaltyResult) -> Self {
        let breakdown = result.breakdown();
        AssessmentOutput {
            label: label.map(str::to_string),
            margin_available: input.margin_available().to_string(),
            margin_required: input.margin_required().to_string(),
            shortfall: result.shortfall().to_string(),
            shortfall_pct: result.shortfall_pct().round_dp(4).to_string(),
            status: result.status(),
            penalty_applicable: result.is_penalty_applicable(),
            trigger_reasons: result.trigger_messages(),
            base_rate: input.base_penalty_rate().percent().to_string(),
            effective_rate: result.effective_rate().to_string(),
            escalation: result.escalation().map(|c| c.to_string()),
            penalty_amount: breakdown.map(|b| b.penalty_amount.to_string()),
            gst_amount: breakdown.map(|b| b.gst_amount.to_string()),
            total_penalty: breakdown.map(|b| b.total_penalty.to_string()),
        }
    }
}

/// JSON output schema for a combined assessment.
#[derive(serde::Serialize)]
struct CombinedOutput {
    shortfalls: Vec<AssessmentOutput>,
    applicable_count: usize,
    total_shortfall: String,
    total_penalty_amount: String,
    total_gst: String,
    grand_total: String,
}

/// Options shared by `check` and `combine`.
#[derive(Default)]
struct OutputOptions {
    format: ReportFormat,
    grouping: Grouping,
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn next_value(args: &[String], i: usize, what: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{}", what);
        process::exit(1);
    })
}

fn parse_output_option(args: &[String], i: &mut usize, opts: &mut OutputOptions) -> bool {
    match args[*i].as_str() {
        "--format" => {
            *i += 1;
            let value = next_value(args, *i, "--format requires 'text' or 'json'");
            opts.format = value.parse().unwrap_or_else(|e| {
                eprintln!("{}", e);
                process::exit(1);
            });
            true
        }
        "--grouping" => {
            *i += 1;
            let value = next_value(args, *i, "--grouping requires 'western' or 'indian'");
            opts.grouping = value.parse().unwrap_or_else(|e| {
                eprintln!("{}", e);
                process::exit(1);
            });
            true
        }
        _ => false,
    }
}

fn parse_amount(args: &[String], i: usize, flag: &str) -> Decimal {
    let raw = next_value(args, i, &format!("{} requires an amount", flag));
    raw.parse().unwrap_or_else(|e| {
        eprintln!("Invalid amount '{}' for {}: {}", raw, flag, e);
        process::exit(1);
    })
}

fn parse_count(args: &[String], i: usize, flag: &str) -> u32 {
    args.get(i)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("{} requires a non-negative whole number", flag);
            process::exit(1);
        })
}

fn cmd_check(args: &[String]) {
    let mut available = None;
    let mut required = None;
    let mut rate = PenaltyRate::default();
    let mut days = 0u32;
    let mut instances = 0u32;
    let mut opts = OutputOptions::default();
    let mut i = 0;
    while i < args.len() {
        if parse_output_option(args, &mut i, &mut opts) {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "--available" => {
                i += 1;
                available = Some(parse_amount(args, i, "--available"));
            }
            "--required" => {
                i += 1;
                required = Some(parse_amount(args, i, "--required"));
            }
            "--rate" => {
                i += 1;
                let value = parse_amount(args, i, "--rate");
                rate = PenaltyRate::try_from(value).unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                });
            }
            "--days" => {
                i += 1;
                days = parse_count(args, i, "--days");
            }
            "--instances" => {
                i += 1;
                instances = parse_count(args, i, "--instances");
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (available, required) = match (available, required) {
        (Some(a), Some(r)) => (a, r),
        _ => {
            eprintln!("Error: --available <AMT> and --required <AMT> are required");
            process::exit(1);
        }
    };

    let input = MarginInput::new(available, required, rate)
        .and_then(|input| input.with_consecutive_days(days))
        .and_then(|input| input.with_monthly_instances(instances))
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    let result = PenaltyCalculator::assess(&input);

    match opts.format {
        ReportFormat::Json => print_json(&AssessmentOutput::new(None, &input, &result)),
        ReportFormat::Text => print!("{}", AssessmentReport::new(&input, &result, opts.grouping)),
    }
}

fn load_shortfalls(path: &str) -> ShortfallSet {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing shortfalls: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "shortfalls": [
    {{ "label": "Shortfall #1", "margin_available": "368578.89", "margin_required": "5361689.21",
       "base_penalty_rate": "1.0", "consecutive_days": 0, "monthly_instances": 0 }}
  ]
}}"#
        );
        process::exit(1);
    })
}

fn combined_output(combined: &CombinedAssessment) -> CombinedOutput {
    CombinedOutput {
        shortfalls: combined
            .assessments()
            .iter()
            .map(|a| AssessmentOutput::new(a.entry.label(), a.entry.input(), &a.result))
            .collect(),
        applicable_count: combined.applicable_count(),
        total_shortfall: combined.total_shortfall().to_string(),
        total_penalty_amount: combined.total_penalty_amount().to_string(),
        total_gst: combined.total_gst().to_string(),
        grand_total: combined.grand_total().to_string(),
    }
}

fn cmd_combine(args: &[String]) {
    let mut input_path = None;
    let mut opts = OutputOptions::default();
    let mut i = 0;
    while i < args.len() {
        if parse_output_option(args, &mut i, &mut opts) {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(next_value(args, i, "--input requires a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let set = load_shortfalls(&path);
    let combined = PenaltyCalculator::assess_all(&set).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    match opts.format {
        ReportFormat::Json => print_json(&combined_output(&combined)),
        ReportFormat::Text => print!("{}", CombinedReport::new(&combined, opts.grouping)),
    }
}

fn cmd_generate(args: &[String]) {
    let mut count = 10usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--count" => {
                i += 1;
                count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--count requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(next_value(args, i, "--output requires a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = ScenarioConfig {
        count,
        ..Default::default()
    };

    let set = generate_random_scenarios(&config).unwrap_or_else(|e| {
        eprintln!("Error generating shortfalls: {}", e);
        process::exit(1);
    });

    let json = serde_json::to_string_pretty(&set).unwrap_or_else(|e| {
        eprintln!("Error serializing shortfalls: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} shortfalls → {}", set.len(), path);
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "check" => cmd_check(rest),
        "combine" => cmd_combine(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
