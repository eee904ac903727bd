//! Amortization schedules for equal payment, equal principal, maturity and
//! step-up repayment

mod engine;
mod schedule;
mod step_up;

pub use engine::AmortizationEngine;
pub use schedule::{round_currency, MethodSummary, ScheduleEntry, ScheduleResult};
pub use step_up::{find_initial_payment, simulate_total_payments, StepSearch};
