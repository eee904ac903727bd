//! Schedule output structures

use serde::Serialize;

use crate::error::{ensure_finite, LoanResult};

/// Round a monetary amount to whole currency units (ties to even)
pub fn round_currency(amount: f64) -> f64 {
    amount.round_ties_even()
}

/// A single month of a repayment schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleEntry {
    /// Installment number (1-indexed)
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    /// Outstanding balance after this installment
    pub balance: f64,
}

impl ScheduleEntry {
    /// Build an entry from unrounded amounts.
    /// Rounds every amount and clamps the balance at zero.
    pub fn new(month: u32, payment: f64, principal: f64, interest: f64, balance: f64) -> Self {
        Self {
            month,
            payment: round_currency(payment),
            principal: round_currency(principal),
            interest: round_currency(interest),
            balance: if balance > 0.0 { round_currency(balance) } else { 0.0 },
        }
    }
}

/// Summary fields that differ between repayment methods.
///
/// Flattened into [`ScheduleResult`] so each method serializes to its own
/// set of keys next to `total_payment` and `total_interest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MethodSummary {
    EqualPayment {
        monthly_payment: f64,
    },
    EqualPrincipal {
        first_payment: f64,
        last_payment: f64,
    },
    MaturityPayment {
        monthly_interest: f64,
        final_payment: f64,
    },
    StepUpPayment {
        initial_payment: f64,
        final_payment: f64,
        /// Annual step-up in percent
        step_rate: f64,
    },
}

/// Complete repayment schedule with totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleResult {
    pub schedule: Vec<ScheduleEntry>,
    pub total_payment: f64,
    pub total_interest: f64,
    #[serde(flatten)]
    pub summary: MethodSummary,
}

impl ScheduleResult {
    /// Wire name of the method that produced this schedule
    pub fn method_name(&self) -> &'static str {
        match self.summary {
            MethodSummary::EqualPayment { .. } => "equal_payment",
            MethodSummary::EqualPrincipal { .. } => "equal_principal",
            MethodSummary::MaturityPayment { .. } => "maturity_payment",
            MethodSummary::StepUpPayment { .. } => "step_up_payment",
        }
    }

    /// Number of installments
    pub fn term_months(&self) -> usize {
        self.schedule.len()
    }

    /// Sum of the (rounded) principal portions
    pub fn principal_repaid(&self) -> f64 {
        self.schedule.iter().map(|e| e.principal).sum()
    }

    pub fn first_payment(&self) -> f64 {
        self.schedule.first().map(|e| e.payment).unwrap_or(0.0)
    }

    pub fn last_payment(&self) -> f64 {
        self.schedule.last().map(|e| e.payment).unwrap_or(0.0)
    }

    /// Largest single installment
    pub fn peak_payment(&self) -> f64 {
        self.schedule.iter().map(|e| e.payment).fold(0.0, f64::max)
    }
}

/// Accumulates schedule rows and rejects non-finite amounts as they arrive
#[derive(Debug, Default)]
pub(crate) struct ScheduleBuilder {
    entries: Vec<ScheduleEntry>,
}

impl ScheduleBuilder {
    pub fn with_capacity(months: u32) -> Self {
        Self {
            entries: Vec::with_capacity(months as usize),
        }
    }

    /// Add an entry from unrounded amounts
    pub fn push(&mut self, month: u32, payment: f64, principal: f64, interest: f64, balance: f64) -> LoanResult<()> {
        let payment = ensure_finite(payment, "payment")?;
        let principal = ensure_finite(principal, "principal portion")?;
        let interest = ensure_finite(interest, "interest portion")?;
        let balance = ensure_finite(balance, "remaining balance")?;

        self.entries.push(ScheduleEntry::new(month, payment, principal, interest, balance));
        Ok(())
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Attach totals and the method summary; totals are rounded here
    pub fn finish(self, total_payment: f64, total_interest: f64, summary: MethodSummary) -> LoanResult<ScheduleResult> {
        let total_payment = ensure_finite(total_payment, "total payment")?;
        let total_interest = ensure_finite(total_interest, "total interest")?;

        Ok(ScheduleResult {
            schedule: self.entries,
            total_payment: round_currency(total_payment),
            total_interest: round_currency(total_interest),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanError;

    #[test]
    fn test_round_currency_ties_to_even() {
        assert_eq!(round_currency(2.5), 2.0);
        assert_eq!(round_currency(3.5), 4.0);
        assert_eq!(round_currency(41_666.666_666), 41_667.0);
        assert_eq!(round_currency(1234.49), 1234.0);
    }

    #[test]
    fn test_entry_clamps_negative_balance() {
        let entry = ScheduleEntry::new(12, 856_075.2, 852_523.4, 3_551.8, -0.000_001);
        assert_eq!(entry.balance, 0.0);
        assert!(entry.balance.is_sign_positive());
        assert_eq!(entry.payment, 856_075.0);
        assert_eq!(entry.principal, 852_523.0);
        assert_eq!(entry.interest, 3_552.0);

        let entry = ScheduleEntry::new(12, 1.0, 1.0, 0.0, -0.0);
        assert!(entry.balance.is_sign_positive());
    }

    #[test]
    fn test_builder_rejects_non_finite() {
        let mut builder = ScheduleBuilder::with_capacity(1);
        let err = builder.push(1, f64::NAN, 0.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, LoanError::ComputationFault(_)));
        assert!(builder.entries().is_empty());
    }

    #[test]
    fn test_summary_flattens_into_result() {
        let mut builder = ScheduleBuilder::with_capacity(1);
        builder.push(1, 1_000.0, 1_000.0, 0.0, 0.0).unwrap();
        let result = builder
            .finish(1_000.0, 0.0, MethodSummary::EqualPayment { monthly_payment: 1_000.0 })
            .unwrap();

        let json = serde_json::to_value(&result).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(json["monthly_payment"], 1_000.0);
        assert_eq!(json["schedule"][0]["balance"], 0.0);
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn test_step_up_summary_keys() {
        let result = ScheduleBuilder::default()
            .finish(
                10.0,
                1.0,
                MethodSummary::StepUpPayment {
                    initial_payment: 4.0,
                    final_payment: 6.0,
                    step_rate: 5.0,
                },
            )
            .unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["initial_payment"], 4.0);
        assert_eq!(json["final_payment"], 6.0);
        assert_eq!(json["step_rate"], 5.0);
        assert_eq!(result.method_name(), "step_up_payment");
    }
}
