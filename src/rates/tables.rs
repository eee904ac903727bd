//! Fixed pricing tables: base rates by loan category, credit score bands,
//! employment and income adjustments

use serde::{Serialize, Serializer};

/// Base rate for categories outside the table
pub const FALLBACK_BASE_RATE: f64 = 5.0;

/// Loan product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoanCategory {
    Mortgage,
    #[default]
    Personal,
    Auto,
    Business,
    /// Any category not in the table
    Other,
}

impl LoanCategory {
    /// Parse a wire name; unknown names map to [`LoanCategory::Other`]
    pub fn from_name(name: &str) -> Self {
        match name {
            "mortgage" => LoanCategory::Mortgage,
            "personal" => LoanCategory::Personal,
            "auto" => LoanCategory::Auto,
            "business" => LoanCategory::Business,
            _ => LoanCategory::Other,
        }
    }

    /// Annual base rate in percent
    pub fn base_rate(&self) -> f64 {
        match self {
            LoanCategory::Mortgage => 3.5,
            LoanCategory::Personal => 6.5,
            LoanCategory::Auto => 4.5,
            LoanCategory::Business => 5.5,
            LoanCategory::Other => FALLBACK_BASE_RATE,
        }
    }
}

/// Borrower employment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmploymentCategory {
    #[default]
    Regular,
    Contract,
    Freelance,
    Business,
    Other,
}

impl EmploymentCategory {
    pub fn from_name(name: &str) -> Self {
        match name {
            "regular" => EmploymentCategory::Regular,
            "contract" => EmploymentCategory::Contract,
            "freelance" => EmploymentCategory::Freelance,
            "business" => EmploymentCategory::Business,
            _ => EmploymentCategory::Other,
        }
    }

    /// Additive rate adjustment in percentage points
    pub fn adjustment(&self) -> f64 {
        match self {
            EmploymentCategory::Regular => 0.0,
            EmploymentCategory::Contract => 0.3,
            EmploymentCategory::Freelance => 0.8,
            EmploymentCategory::Business => 0.5,
            EmploymentCategory::Other => 0.0,
        }
    }
}

/// Credit grade derived from the credit score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditGrade {
    TopTier,
    Excellent,
    Good,
    Fair,
    Caution,
    HighRisk,
    VeryHighRisk,
}

/// Score bands, highest first; the lower bound is inclusive.
/// Scores below the last band are [`CreditGrade::VeryHighRisk`].
const CREDIT_BANDS: [(i64, CreditGrade); 6] = [
    (900, CreditGrade::TopTier),
    (850, CreditGrade::Excellent),
    (750, CreditGrade::Good),
    (650, CreditGrade::Fair),
    (550, CreditGrade::Caution),
    (450, CreditGrade::HighRisk),
];

impl CreditGrade {
    /// Determine the grade from a credit score
    pub fn from_score(score: i64) -> Self {
        CREDIT_BANDS
            .iter()
            .find(|(floor, _)| score >= *floor)
            .map(|&(_, grade)| grade)
            .unwrap_or(CreditGrade::VeryHighRisk)
    }

    /// Additive rate adjustment in percentage points
    pub fn adjustment(&self) -> f64 {
        match self {
            CreditGrade::TopTier => -2.0,
            CreditGrade::Excellent => -1.5,
            CreditGrade::Good => -1.0,
            CreditGrade::Fair => -0.5,
            CreditGrade::Caution => 0.5,
            CreditGrade::HighRisk => 1.5,
            CreditGrade::VeryHighRisk => 3.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CreditGrade::TopTier => "top tier",
            CreditGrade::Excellent => "excellent",
            CreditGrade::Good => "good",
            CreditGrade::Fair => "fair",
            CreditGrade::Caution => "caution",
            CreditGrade::HighRisk => "high risk",
            CreditGrade::VeryHighRisk => "very high risk",
        }
    }
}

impl Serialize for CreditGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Income adjustment in percentage points; `income` is in thousands
pub fn income_adjustment(income: i64) -> f64 {
    if income >= 10_000 {
        -0.3
    } else if income >= 7_000 {
        -0.2
    } else if income >= 5_000 {
        -0.1
    } else if income < 3_000 {
        0.2
    } else {
        0.0
    }
}
