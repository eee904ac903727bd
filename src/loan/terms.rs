//! Validated loan terms and the repayment method selector

use std::fmt;

use crate::config::AmortizationConfig;
use crate::error::{LoanError, LoanResult};

/// Principal, rate and term of a single loan
///
/// Only obtainable through [`LoanTerms::new`] or [`LoanTerms::with_config`], so
/// every value in circulation has a positive principal, a non-negative rate and
/// a non-empty term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    /// Amount borrowed, in currency units
    principal: f64,

    /// Nominal annual rate in percent (5.0 = 5%)
    annual_rate_percent: f64,

    /// Number of monthly installments
    term_months: u32,
}

impl LoanTerms {
    /// Validate and build terms using the default term ceiling
    pub fn new(principal: f64, annual_rate_percent: f64, years: u32, months: u32) -> LoanResult<Self> {
        Self::with_config(principal, annual_rate_percent, years, months, &AmortizationConfig::default())
    }

    /// Validate and build terms against a specific configuration
    pub fn with_config(
        principal: f64,
        annual_rate_percent: f64,
        years: u32,
        months: u32,
        config: &AmortizationConfig,
    ) -> LoanResult<Self> {
        if !principal.is_finite() || principal <= 0.0 {
            return Err(LoanError::invalid("principal", "loan principal must be a positive amount"));
        }

        if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
            return Err(LoanError::invalid("annual_rate", "annual rate must be 0% or higher"));
        }

        if years == 0 && months == 0 {
            return Err(LoanError::invalid("years", "loan term must be at least one month"));
        }

        let term_months = years
            .checked_mul(12)
            .and_then(|m| m.checked_add(months))
            .filter(|&m| m <= config.max_term_months)
            .ok_or_else(|| {
                LoanError::invalid(
                    "years",
                    format!("loan term must not exceed {} months", config.max_term_months),
                )
            })?;

        Ok(Self {
            principal,
            annual_rate_percent,
            term_months,
        })
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    /// Annual rate as a decimal fraction (0.05 for 5%)
    pub fn annual_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate() / 12.0
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }
}

/// Repayment schedule algorithm
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepaymentMethod {
    /// Fixed total installment (annuity)
    EqualPayment,
    /// Fixed principal installment, declining total payment
    EqualPrincipal,
    /// Interest-only installments with the full principal due at maturity
    MaturityPayment,
    /// Installment grows by `step_rate_percent` at the start of every year
    StepUpPayment { step_rate_percent: f64 },
}

impl RepaymentMethod {
    /// Wire names accepted by [`RepaymentMethod::from_name`]
    pub const NAMES: [&'static str; 4] = [
        "equal_payment",
        "equal_principal",
        "maturity_payment",
        "step_up_payment",
    ];

    /// Parse a wire name; `step_rate_percent` only matters for step-up
    pub fn from_name(name: &str, step_rate_percent: f64) -> LoanResult<Self> {
        match name {
            "equal_payment" => Ok(RepaymentMethod::EqualPayment),
            "equal_principal" => Ok(RepaymentMethod::EqualPrincipal),
            "maturity_payment" => Ok(RepaymentMethod::MaturityPayment),
            "step_up_payment" => {
                if !step_rate_percent.is_finite() || step_rate_percent <= 0.0 {
                    return Err(LoanError::invalid("step_rate", "step-up rate must be greater than 0%"));
                }
                Ok(RepaymentMethod::StepUpPayment { step_rate_percent })
            }
            other => Err(LoanError::invalid(
                "payment_type",
                format!("unknown repayment method '{}', expected one of {}", other, Self::NAMES.join(", ")),
            )),
        }
    }

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RepaymentMethod::EqualPayment => "equal_payment",
            RepaymentMethod::EqualPrincipal => "equal_principal",
            RepaymentMethod::MaturityPayment => "maturity_payment",
            RepaymentMethod::StepUpPayment { .. } => "step_up_payment",
        }
    }

    /// Human-readable label for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            RepaymentMethod::EqualPayment => "Equal payment (annuity)",
            RepaymentMethod::EqualPrincipal => "Equal principal",
            RepaymentMethod::MaturityPayment => "Bullet payment at maturity",
            RepaymentMethod::StepUpPayment { .. } => "Step-up payment",
        }
    }
}

impl fmt::Display for RepaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
