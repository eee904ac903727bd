//! Heuristic interest rate estimation from credit score, loan category,
//! income and employment

mod estimator;
mod tables;

pub use estimator::{
    estimate_rate, round_rate, BorrowerProfile, RateAdjustments, RateEstimate, MAX_CREDIT_SCORE,
    MIN_CREDIT_SCORE, RATE_CEILING, RATE_FLOOR, RATE_SPREAD,
};
pub use tables::{income_adjustment, CreditGrade, EmploymentCategory, LoanCategory, FALLBACK_BASE_RATE};
