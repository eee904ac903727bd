//! Core amortization engine for the four repayment methods

use log::debug;

use crate::config::AmortizationConfig;
use crate::error::{ensure_finite, LoanResult};
use crate::loan::{LoanTerms, RepaymentMethod};
use super::schedule::{round_currency, MethodSummary, ScheduleBuilder, ScheduleResult};
use super::step_up::find_initial_payment;

/// Amortization engine for a single set of loan terms
#[derive(Debug, Clone)]
pub struct AmortizationEngine {
    terms: LoanTerms,
    config: AmortizationConfig,
}

impl AmortizationEngine {
    /// Create an engine with the default configuration
    pub fn new(terms: LoanTerms) -> Self {
        Self::with_config(terms, AmortizationConfig::default())
    }

    pub fn with_config(terms: LoanTerms, config: AmortizationConfig) -> Self {
        Self { terms, config }
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// Dispatch to the schedule for `method`
    pub fn calculate(&self, method: RepaymentMethod) -> LoanResult<ScheduleResult> {
        debug!(
            "Calculating {} schedule: principal={} rate={}% months={}",
            method,
            self.terms.principal(),
            self.terms.annual_rate_percent(),
            self.terms.term_months()
        );

        match method {
            RepaymentMethod::EqualPayment => self.equal_payment(),
            RepaymentMethod::EqualPrincipal => self.equal_principal(),
            RepaymentMethod::MaturityPayment => self.maturity_payment(),
            RepaymentMethod::StepUpPayment { step_rate_percent } => self.step_up_payment(step_rate_percent),
        }
    }

    /// Fixed total installment (annuity)
    pub fn equal_payment(&self) -> LoanResult<ScheduleResult> {
        let principal = self.terms.principal();
        let rate = self.terms.monthly_rate();
        let months = self.terms.term_months();

        if rate == 0.0 {
            return self.equal_payment_zero_rate();
        }

        let growth = (1.0 + rate).powf(months as f64);
        let installment = ensure_finite(principal * (rate * growth) / (growth - 1.0), "installment")?;

        let mut builder = ScheduleBuilder::with_capacity(months);
        let mut balance = principal;
        let mut total_interest = 0.0;

        for month in 1..=months {
            let interest = balance * rate;
            let principal_paid = installment - interest;
            balance -= principal_paid;
            total_interest += interest;

            builder.push(month, installment, principal_paid, interest, balance)?;
        }

        builder.finish(
            principal + total_interest,
            total_interest,
            MethodSummary::EqualPayment {
                monthly_payment: round_currency(installment),
            },
        )
    }

    /// Zero-rate annuity: every installment is pure principal
    fn equal_payment_zero_rate(&self) -> LoanResult<ScheduleResult> {
        let principal = self.terms.principal();
        let months = self.terms.term_months();
        let installment = principal / months as f64;

        let mut builder = ScheduleBuilder::with_capacity(months);
        let mut balance = principal;

        for month in 1..=months {
            balance -= installment;
            builder.push(month, installment, installment, 0.0, balance)?;
        }

        builder.finish(
            principal,
            0.0,
            MethodSummary::EqualPayment {
                monthly_payment: round_currency(installment),
            },
        )
    }

    /// Fixed principal installment with interest on the declining balance
    pub fn equal_principal(&self) -> LoanResult<ScheduleResult> {
        let principal = self.terms.principal();
        let rate = self.terms.monthly_rate();
        let months = self.terms.term_months();
        let principal_paid = principal / months as f64;

        let mut builder = ScheduleBuilder::with_capacity(months);
        let mut balance = principal;
        let mut total_interest = 0.0;

        for month in 1..=months {
            let interest = balance * rate;
            let payment = principal_paid + interest;
            balance -= principal_paid;
            total_interest += interest;

            builder.push(month, payment, principal_paid, interest, balance)?;
        }

        // Extremes come straight from the emitted rows
        let entries = builder.entries();
        let first_payment = entries.first().map(|e| e.payment).unwrap_or(0.0);
        let last_payment = entries.last().map(|e| e.payment).unwrap_or(0.0);

        builder.finish(
            principal + total_interest,
            total_interest,
            MethodSummary::EqualPrincipal {
                first_payment,
                last_payment,
            },
        )
    }

    /// Interest-only installments, full principal repaid with the last one
    pub fn maturity_payment(&self) -> LoanResult<ScheduleResult> {
        let principal = self.terms.principal();
        let months = self.terms.term_months();
        let monthly_interest = principal * self.terms.monthly_rate();

        // Simple interest over the term measured in (fractional) years,
        // not the sum of the monthly interest rows
        let total_interest = principal * self.terms.annual_rate() * (months as f64 / 12.0);

        let mut builder = ScheduleBuilder::with_capacity(months);

        for month in 1..=months {
            if month == months {
                builder.push(month, principal + monthly_interest, principal, monthly_interest, 0.0)?;
            } else {
                builder.push(month, monthly_interest, 0.0, monthly_interest, principal)?;
            }
        }

        builder.finish(
            principal + total_interest,
            total_interest,
            MethodSummary::MaturityPayment {
                monthly_interest: round_currency(monthly_interest),
                final_payment: round_currency(principal + monthly_interest),
            },
        )
    }

    /// Installment grows by `step_rate_percent` every 12 months; the last
    /// installment is resized to retire whatever balance remains
    pub fn step_up_payment(&self, step_rate_percent: f64) -> LoanResult<ScheduleResult> {
        let principal = self.terms.principal();
        let rate = self.terms.monthly_rate();
        let months = self.terms.term_months();
        let step_rate = step_rate_percent / 100.0;
        let step_factor = 1.0 + step_rate;

        let search = find_initial_payment(principal, months, step_rate, &self.config.step_search);
        let initial_payment = ensure_finite(search.initial_payment, "initial installment")?;
        debug!(
            "Step-up initial installment {:.4} after {} iterations (converged: {})",
            initial_payment, search.iterations, search.converged
        );

        let mut builder = ScheduleBuilder::with_capacity(months);
        let mut balance = principal;
        let mut current_payment = initial_payment;
        let mut total_interest = 0.0;

        for month in 1..=months {
            if month > 1 && (month - 1) % 12 == 0 {
                current_payment *= step_factor;
            }

            let interest = balance * rate;
            let mut principal_paid = current_payment - interest;

            if month == months {
                principal_paid = balance;
                current_payment = principal_paid + interest;
            }

            balance -= principal_paid;
            total_interest += interest;

            builder.push(month, current_payment, principal_paid, interest, balance)?;
        }

        let final_payment = builder.entries().last().map(|e| e.payment).unwrap_or(0.0);

        builder.finish(
            principal + total_interest,
            total_interest,
            MethodSummary::StepUpPayment {
                initial_payment: round_currency(initial_payment),
                final_payment,
                step_rate: step_rate * 100.0,
            },
        )
    }
}
