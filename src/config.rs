//! Tunables for the amortization engine

/// Bounds and stopping rule for the step-up initial installment search
#[derive(Debug, Clone, PartialEq)]
pub struct StepSearchConfig {
    /// Lower bound of the bisection interval (the upper bound is the principal)
    pub lower_bound: f64,

    /// Search stops once the bracket is no wider than this many currency units
    pub tolerance: f64,

    /// Hard cap on bisection steps
    pub max_iterations: u32,
}

impl Default for StepSearchConfig {
    fn default() -> Self {
        Self {
            lower_bound: 1000.0,
            tolerance: 1.0,
            max_iterations: 200,
        }
    }
}

/// Configuration for schedule calculations
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationConfig {
    /// Annual step-up percentage used when a request does not supply one
    pub default_step_rate_percent: f64,

    /// Longest accepted term (1200 = 100 years)
    pub max_term_months: u32,

    pub step_search: StepSearchConfig,
}

impl Default for AmortizationConfig {
    fn default() -> Self {
        Self {
            default_step_rate_percent: 5.0,
            max_term_months: 1200,
            step_search: StepSearchConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AmortizationConfig::default();
        assert_eq!(config.default_step_rate_percent, 5.0);
        assert_eq!(config.max_term_months, 1200);
        assert_eq!(config.step_search.lower_bound, 1000.0);
        assert_eq!(config.step_search.tolerance, 1.0);
        assert_eq!(config.step_search.max_iterations, 200);
    }
}
