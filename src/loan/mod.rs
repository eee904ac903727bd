//! Loan terms and repayment method selection

mod terms;

pub use terms::{LoanTerms, RepaymentMethod};
