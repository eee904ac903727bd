//! Loan Calculator - amortization schedules and heuristic rate estimates
//!
//! This library provides:
//! - Repayment schedules for equal payment, equal principal, maturity (bullet)
//!   and step-up loans
//! - A rule-based interest rate estimate from credit score, loan category,
//!   income and employment
//! - A JSON request layer shared by the Lambda handler and the CLI

pub mod amortization;
pub mod api;
pub mod config;
pub mod error;
pub mod loan;
pub mod rates;

// Re-export commonly used types
pub use amortization::{AmortizationEngine, MethodSummary, ScheduleEntry, ScheduleResult};
pub use config::AmortizationConfig;
pub use error::{LoanError, LoanResult};
pub use loan::{LoanTerms, RepaymentMethod};
pub use rates::{estimate_rate, BorrowerProfile, CreditGrade, RateEstimate};
