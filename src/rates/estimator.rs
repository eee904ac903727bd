//! Rule-based interest rate estimate from borrower attributes

use log::debug;
use serde::Serialize;

use crate::error::{LoanError, LoanResult};
use super::tables::{income_adjustment, CreditGrade, EmploymentCategory, LoanCategory};

pub const MIN_CREDIT_SCORE: i64 = 300;
pub const MAX_CREDIT_SCORE: i64 = 999;

/// Lowest rate ever quoted, in percent
pub const RATE_FLOOR: f64 = 1.0;
/// Highest rate ever quoted, in percent
pub const RATE_CEILING: f64 = 15.0;
/// Half-width of the quoted range around the estimate
pub const RATE_SPREAD: f64 = 0.5;

/// Borrower attributes used for pricing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorrowerProfile {
    pub credit_score: i64,
    pub loan_category: LoanCategory,
    /// Annual income in thousands of currency units
    pub annual_income: i64,
    pub employment: EmploymentCategory,
}

impl BorrowerProfile {
    /// Build a profile from wire names, applying the table fallbacks
    pub fn from_names(credit_score: i64, loan_type: &str, annual_income: i64, employment_type: &str) -> Self {
        let loan_category = LoanCategory::from_name(loan_type);
        if loan_category == LoanCategory::Other {
            debug!("Unlisted loan type '{}' priced at the fallback base rate", loan_type);
        }

        let employment = EmploymentCategory::from_name(employment_type);
        if employment == EmploymentCategory::Other {
            debug!("Unlisted employment type '{}' carries no adjustment", employment_type);
        }

        Self {
            credit_score,
            loan_category,
            annual_income,
            employment,
        }
    }
}

/// Signed rate adjustments in percentage points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateAdjustments {
    pub credit: f64,
    pub employment: f64,
    pub income: f64,
}

impl RateAdjustments {
    pub fn total(&self) -> f64 {
        self.credit + self.employment + self.income
    }
}

/// Estimated rate and its quoted range, all in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateEstimate {
    pub estimated_rate: f64,
    pub min_rate: f64,
    pub max_rate: f64,
    pub credit_grade: CreditGrade,
    pub base_rate: f64,
    pub adjustments: RateAdjustments,
}

/// Round a rate to two decimal places (ties to even)
pub fn round_rate(rate: f64) -> f64 {
    (rate * 100.0).round_ties_even() / 100.0
}

/// Validate the profile and price it
pub fn estimate_rate(profile: &BorrowerProfile) -> LoanResult<RateEstimate> {
    if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&profile.credit_score) {
        return Err(LoanError::invalid(
            "credit_score",
            format!("credit score must be between {} and {}", MIN_CREDIT_SCORE, MAX_CREDIT_SCORE),
        ));
    }

    if profile.annual_income <= 0 {
        return Err(LoanError::invalid("income", "annual income must be a positive amount"));
    }

    let base_rate = profile.loan_category.base_rate();
    let credit_grade = CreditGrade::from_score(profile.credit_score);
    let adjustments = RateAdjustments {
        credit: credit_grade.adjustment(),
        employment: profile.employment.adjustment(),
        income: income_adjustment(profile.annual_income),
    };

    let estimated = (base_rate + adjustments.credit + adjustments.employment + adjustments.income)
        .clamp(RATE_FLOOR, RATE_CEILING);
    let min_rate = (estimated - RATE_SPREAD).max(RATE_FLOOR);
    let max_rate = (estimated + RATE_SPREAD).min(RATE_CEILING);

    debug!(
        "Rate estimate for score {}: base {} + adjustments {:.2} = {:.2}",
        profile.credit_score,
        base_rate,
        adjustments.total(),
        estimated
    );

    Ok(RateEstimate {
        estimated_rate: round_rate(estimated),
        min_rate: round_rate(min_rate),
        max_rate: round_rate(max_rate),
        credit_grade,
        base_rate,
        adjustments,
    })
}
