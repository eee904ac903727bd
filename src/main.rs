//! Loan Calculator CLI
//!
//! Command-line interface for repayment schedules and rate estimates

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use rayon::prelude::*;

use loan_calculator::{
    api::{self, CalculateRequest, EstimateRateRequest},
    config::AmortizationConfig,
    AmortizationEngine, LoanTerms, MethodSummary, RateEstimate, RepaymentMethod, ScheduleResult,
};

#[derive(Debug, Parser)]
#[command(name = "loan_calculator", version, about = "Loan amortization schedules and rate estimates")]
struct Cli {
    /// Print the JSON response body instead of a report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the repayment schedule for one method
    Schedule {
        #[command(flatten)]
        term: TermArgs,

        /// Annual rate in percent
        #[arg(long, default_value_t = 0.0)]
        rate: f64,

        #[command(flatten)]
        method: MethodArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Estimate an interest rate from borrower attributes
    Estimate {
        #[command(flatten)]
        borrower: BorrowerArgs,
    },

    /// Estimate a rate, then compute the schedule at that rate
    Quote {
        #[command(flatten)]
        borrower: BorrowerArgs,

        #[command(flatten)]
        term: TermArgs,

        #[command(flatten)]
        method: MethodArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compute all four methods for the same loan and compare totals
    Compare {
        #[command(flatten)]
        term: TermArgs,

        /// Annual rate in percent
        #[arg(long, default_value_t = 0.0)]
        rate: f64,

        /// Annual step-up in percent for the step-up method
        #[arg(long)]
        step_rate: Option<f64>,
    },
}

#[derive(Debug, Args)]
struct TermArgs {
    /// Amount borrowed
    #[arg(long)]
    principal: f64,

    #[arg(long, default_value_t = 0)]
    years: u32,

    #[arg(long, default_value_t = 0)]
    months: u32,
}

#[derive(Debug, Args)]
struct MethodArgs {
    /// equal_payment, equal_principal, maturity_payment or step_up_payment
    #[arg(long, default_value = "equal_payment")]
    method: String,

    /// Annual step-up in percent (step_up_payment only)
    #[arg(long)]
    step_rate: Option<f64>,

    /// Iteration cap for the step-up installment search
    #[arg(long)]
    search_iterations: Option<u32>,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Number of schedule rows to print
    #[arg(long, default_value_t = 24)]
    rows: usize,

    /// Write the full schedule to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct BorrowerArgs {
    /// Credit score (300-999)
    #[arg(long)]
    credit_score: i64,

    /// mortgage, personal, auto or business
    #[arg(long, default_value = "personal")]
    loan_type: String,

    /// Annual income in thousands
    #[arg(long)]
    income: i64,

    /// regular, contract, freelance or business
    #[arg(long, default_value = "regular")]
    employment_type: String,
}

impl BorrowerArgs {
    fn to_request(&self) -> EstimateRateRequest {
        EstimateRateRequest {
            credit_score: self.credit_score,
            loan_type: self.loan_type.clone(),
            income: self.income,
            employment_type: self.employment_type.clone(),
        }
    }
}

fn calculate_request(term: &TermArgs, rate: f64, method: &MethodArgs) -> CalculateRequest {
    CalculateRequest {
        principal: term.principal,
        annual_rate: rate,
        years: term.years,
        months: term.months,
        payment_type: method.method.clone(),
        step_rate: method.step_rate,
    }
}

fn config_for(method: &MethodArgs) -> AmortizationConfig {
    let mut config = AmortizationConfig::default();
    if let Some(iterations) = method.search_iterations {
        config.step_search.max_iterations = iterations;
    }
    config
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Schedule { term, rate, method, output } => {
            let request = calculate_request(term, *rate, method);
            let result = api::calculate(&request, &config_for(method))?;
            report_schedule(&request, &result, output, cli.json)?;
        }
        Command::Estimate { borrower } => {
            let estimate = api::estimate(&borrower.to_request())?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&estimate)?);
            } else {
                print_estimate(&estimate);
            }
        }
        Command::Quote { borrower, term, method, output } => {
            let loan = calculate_request(term, 0.0, method);
            let quote = api::quote(&borrower.to_request(), &loan, &config_for(method))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                let priced = CalculateRequest {
                    annual_rate: quote.estimate.estimated_rate,
                    ..loan
                };
                print_estimate(&quote.estimate);
                println!();
                report_schedule(&priced, &quote.schedule, output, false)?;
            }
        }
        Command::Compare { term, rate, step_rate } => {
            compare_methods(term, *rate, *step_rate, cli.json)?;
        }
    }

    Ok(())
}

fn report_schedule(request: &CalculateRequest, result: &ScheduleResult, output: &OutputArgs, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_schedule(request, result, output.rows);
    }

    if let Some(path) = &output.csv {
        write_csv(path, result)?;
        if !json {
            println!("\nFull schedule written to: {}", path.display());
        }
    }

    Ok(())
}

fn print_schedule(request: &CalculateRequest, result: &ScheduleResult, rows: usize) {
    println!("Loan Calculator v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("Method: {}", result.method_name());
    println!("  Principal: {:.0}", request.principal);
    println!("  Annual Rate: {:.2}%", request.annual_rate);
    println!("  Term: {} months", result.term_months());
    println!();

    println!("{:>5} {:>16} {:>16} {:>14} {:>16}", "Month", "Payment", "Principal", "Interest", "Balance");
    println!("{}", "-".repeat(71));

    for entry in result.schedule.iter().take(rows) {
        println!(
            "{:>5} {:>16.0} {:>16.0} {:>14.0} {:>16.0}",
            entry.month, entry.payment, entry.principal, entry.interest, entry.balance
        );
    }

    if result.schedule.len() > rows {
        println!("... ({} more months)", result.schedule.len() - rows);
    }

    println!("\nSummary:");
    println!("  Total Payment: {:.0}", result.total_payment);
    println!("  Total Interest: {:.0}", result.total_interest);
    match result.summary {
        MethodSummary::EqualPayment { monthly_payment } => {
            println!("  Monthly Payment: {:.0}", monthly_payment);
        }
        MethodSummary::EqualPrincipal { first_payment, last_payment } => {
            println!("  First Payment: {:.0}", first_payment);
            println!("  Last Payment: {:.0}", last_payment);
        }
        MethodSummary::MaturityPayment { monthly_interest, final_payment } => {
            println!("  Monthly Interest: {:.0}", monthly_interest);
            println!("  Final Payment: {:.0}", final_payment);
        }
        MethodSummary::StepUpPayment { initial_payment, final_payment, step_rate } => {
            println!("  Initial Payment: {:.0}", initial_payment);
            println!("  Final Payment: {:.0}", final_payment);
            println!("  Step Rate: {:.2}%", step_rate);
        }
    }
}

fn print_estimate(estimate: &RateEstimate) {
    println!("Estimated Rate: {:.2}%", estimate.estimated_rate);
    println!("  Range: {:.2}% - {:.2}%", estimate.min_rate, estimate.max_rate);
    println!("  Credit Grade: {}", estimate.credit_grade.label());
    println!("  Base Rate: {:.2}%", estimate.base_rate);
    println!(
        "  Adjustments: credit {:+.1}, employment {:+.1}, income {:+.1}",
        estimate.adjustments.credit, estimate.adjustments.employment, estimate.adjustments.income
    );
}

fn write_csv(path: &Path, result: &ScheduleResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Unable to create CSV file {}", path.display()))?;

    for entry in &result.schedule {
        writer.serialize(entry)?;
    }
    writer.flush()?;

    info!("Wrote {} schedule rows to {}", result.schedule.len(), path.display());
    Ok(())
}

fn compare_methods(term: &TermArgs, rate: f64, step_rate: Option<f64>, json: bool) -> Result<()> {
    let config = AmortizationConfig::default();
    let terms = LoanTerms::with_config(term.principal, rate, term.years, term.months, &config)?;
    let step_rate = step_rate.unwrap_or(config.default_step_rate_percent);
    let engine = AmortizationEngine::with_config(terms, config);

    let step_up = RepaymentMethod::from_name("step_up_payment", step_rate)?;
    let methods = [
        RepaymentMethod::EqualPayment,
        RepaymentMethod::EqualPrincipal,
        RepaymentMethod::MaturityPayment,
        step_up,
    ];

    let results = methods
        .par_iter()
        .map(|&method| engine.calculate(method).map(|result| (method, result)))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        let body: serde_json::Map<String, serde_json::Value> = results
            .iter()
            .map(|(method, result)| -> Result<(String, serde_json::Value)> {
                Ok((method.as_str().to_string(), serde_json::to_value(result)?))
            })
            .collect::<Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("Comparison ({} months at {:.2}%):", engine.terms().term_months(), rate);
    println!(
        "{:<28} {:>16} {:>16} {:>16} {:>16}",
        "Method", "First Payment", "Peak Payment", "Total Interest", "Total Payment"
    );
    println!("{}", "-".repeat(96));

    for (method, result) in &results {
        println!(
            "{:<28} {:>16.0} {:>16.0} {:>16.0} {:>16.0}",
            method.display_name(),
            result.first_payment(),
            result.peak_payment(),
            result.total_interest,
            result.total_payment,
        );
    }

    Ok(())
}
