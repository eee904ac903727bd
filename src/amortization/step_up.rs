//! Initial installment search for step-up schedules
//!
//! A step-up installment grows by a fixed factor at the start of every
//! 12-month block, so there is no closed form for the first installment.
//! It is located by bisection on the total nominal payments over the term.

use log::warn;

use crate::config::StepSearchConfig;

/// Outcome of the bisection search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSearch {
    /// Initial monthly installment (upper end of the final bracket)
    pub initial_payment: f64,

    /// Bisection steps taken
    pub iterations: u32,

    /// Whether the bracket narrowed to the tolerance before the iteration cap
    pub converged: bool,
}

/// Sum of nominal installments over `months`, starting at `initial_payment`
/// and compounding by `1 + step_rate` at months 13, 25, 37, ...
pub fn simulate_total_payments(initial_payment: f64, months: u32, step_rate: f64) -> f64 {
    let mut total = 0.0;
    let mut current = initial_payment;

    for month in 0..months {
        if month > 0 && month % 12 == 0 {
            current *= 1.0 + step_rate;
        }
        total += current;
    }

    total
}

/// Find the initial installment whose simulated total payments reach `principal`.
///
/// The bracket is `[config.lower_bound, principal]`. The comparison target is
/// the principal itself, not principal plus interest.
pub fn find_initial_payment(principal: f64, months: u32, step_rate: f64, config: &StepSearchConfig) -> StepSearch {
    let mut low = config.lower_bound;
    let mut high = principal;
    let mut iterations = 0;

    while high - low > config.tolerance {
        if iterations >= config.max_iterations {
            warn!(
                "Step-up search stopped after {} iterations with bracket [{:.4}, {:.4}]",
                iterations, low, high
            );
            return StepSearch {
                initial_payment: high,
                iterations,
                converged: false,
            };
        }

        let mid = (low + high) / 2.0;
        if simulate_total_payments(mid, months, step_rate) < principal {
            low = mid;
        } else {
            high = mid;
        }
        iterations += 1;
    }

    StepSearch {
        initial_payment: high,
        iterations,
        converged: true,
    }
}
