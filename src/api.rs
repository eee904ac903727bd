//! JSON request/response layer shared by the Lambda handler and the CLI
//!
//! Request bodies are parsed with serde defaults for missing fields, validated
//! into domain types, and dispatched to the pure calculators. Every outcome,
//! including failures, is returned as an [`ApiResponse`] with an HTTP status.

use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::amortization::{AmortizationEngine, ScheduleResult};
use crate::config::AmortizationConfig;
use crate::error::{LoanError, LoanResult};
use crate::loan::{LoanTerms, RepaymentMethod};
use crate::rates::{estimate_rate, BorrowerProfile, RateEstimate};

/// Body of a schedule calculation request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CalculateRequest {
    /// Amount borrowed
    #[serde(default)]
    pub principal: f64,

    /// Annual rate in percent
    #[serde(default)]
    pub annual_rate: f64,

    #[serde(default)]
    pub years: u32,

    #[serde(default)]
    pub months: u32,

    /// One of `equal_payment`, `equal_principal`, `maturity_payment`, `step_up_payment`
    #[serde(default = "default_payment_type")]
    pub payment_type: String,

    /// Annual step-up in percent (step-up method only); the configured
    /// default applies when absent
    #[serde(default)]
    pub step_rate: Option<f64>,
}

fn default_payment_type() -> String { "equal_payment".to_string() }

/// Body of a rate estimate request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EstimateRateRequest {
    #[serde(default)]
    pub credit_score: i64,

    #[serde(default = "default_loan_type")]
    pub loan_type: String,

    /// Annual income in thousands
    #[serde(default)]
    pub income: i64,

    #[serde(default = "default_employment_type")]
    pub employment_type: String,
}

fn default_loan_type() -> String { "personal".to_string() }
fn default_employment_type() -> String { "regular".to_string() }

/// Status code and JSON body of a handled request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(500, &format!("Failed to encode response: {}", e)),
        }
    }

    /// CORS preflight acknowledgement; carries no body
    pub fn preflight() -> Self {
        Self {
            status: 200,
            body: Value::Null,
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    fn from_error(err: &LoanError, context: &str) -> Self {
        let status = err.status_code();
        if err.is_client_error() {
            warn!("{} rejected with status {}: {}", context, status, err);
        } else {
            error!("{} failed with status {}: {}", context, status, err);
        }
        match err {
            LoanError::InvalidInput { .. } => Self::error(status, &err.to_string()),
            LoanError::ComputationFault(_) => Self::error(status, &format!("{} failed: {}", context, err)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Validate a calculation request and compute its schedule
pub fn calculate(request: &CalculateRequest, config: &AmortizationConfig) -> LoanResult<ScheduleResult> {
    let terms = LoanTerms::with_config(
        request.principal,
        request.annual_rate,
        request.years,
        request.months,
        config,
    )?;
    let step_rate = request.step_rate.unwrap_or(config.default_step_rate_percent);
    let method = RepaymentMethod::from_name(&request.payment_type, step_rate)?;

    AmortizationEngine::with_config(terms, config.clone()).calculate(method)
}

/// Validate an estimate request and price it
pub fn estimate(request: &EstimateRateRequest) -> LoanResult<RateEstimate> {
    let profile = BorrowerProfile::from_names(
        request.credit_score,
        &request.loan_type,
        request.income,
        &request.employment_type,
    );
    estimate_rate(&profile)
}

/// A rate estimate and the schedule computed at the estimated rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub estimate: RateEstimate,
    pub schedule: ScheduleResult,
}

/// Estimate a rate for `borrower`, then price `loan` at that rate.
/// Any `annual_rate` already on `loan` is replaced.
pub fn quote(borrower: &EstimateRateRequest, loan: &CalculateRequest, config: &AmortizationConfig) -> LoanResult<Quote> {
    let estimate = estimate(borrower)?;
    let request = CalculateRequest {
        annual_rate: estimate.estimated_rate,
        ..loan.clone()
    };
    let schedule = calculate(&request, config)?;

    Ok(Quote { estimate, schedule })
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, ApiResponse> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| ApiResponse::error(400, &format!("Invalid JSON: {}", e)))
}

/// Handle a raw `/calculate` body
pub fn handle_calculate(body: &str, config: &AmortizationConfig) -> ApiResponse {
    let request: CalculateRequest = match parse_body(body) {
        Ok(r) => r,
        Err(response) => return response,
    };

    match calculate(&request, config) {
        Ok(result) => ApiResponse::ok(&result),
        Err(e) => ApiResponse::from_error(&e, "Calculation"),
    }
}

/// Handle a raw `/estimate-rate` body
pub fn handle_estimate_rate(body: &str) -> ApiResponse {
    let request: EstimateRateRequest = match parse_body(body) {
        Ok(r) => r,
        Err(response) => return response,
    };

    match estimate(&request) {
        Ok(estimate) => ApiResponse::ok(&estimate),
        Err(e) => ApiResponse::from_error(&e, "Rate estimation"),
    }
}

/// Dispatch a request by HTTP method and path.
///
/// `OPTIONS` is answered as a CORS preflight, other methods except `POST`
/// get 405, and paths match on their suffix with trailing slashes ignored.
pub fn route(method: &str, path: &str, body: &str, config: &AmortizationConfig) -> ApiResponse {
    if method.eq_ignore_ascii_case("OPTIONS") {
        return ApiResponse::preflight();
    }
    if !method.eq_ignore_ascii_case("POST") {
        return ApiResponse::error(405, "Only POST requests are supported");
    }

    let path = path.trim_end_matches('/');
    if path.ends_with("/calculate") {
        handle_calculate(body, config)
    } else if path.ends_with("/estimate-rate") {
        handle_estimate_rate(body)
    } else {
        ApiResponse::error(404, &format!("No route for {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(body: &str) -> ApiResponse {
        handle_calculate(body, &AmortizationConfig::default())
    }

    #[test]
    fn test_calculate_equal_payment() {
        let response = calc(
            r#"{"principal": 10000000, "annual_rate": 5, "years": 1, "months": 0, "payment_type": "equal_payment"}"#,
        );

        assert_eq!(response.status, 200);
        let body = &response.body;
        assert_eq!(body["monthly_payment"], 856_075.0);
        assert_eq!(body["total_interest"], 272_898.0);
        assert_eq!(body["total_payment"], 10_272_898.0);
        assert_eq!(body["schedule"].as_array().unwrap().len(), 12);

        let first = &body["schedule"][0];
        assert_eq!(first["month"], 1);
        assert_eq!(first["payment"], 856_075.0);
        assert_eq!(first["principal"], 814_408.0);
        assert_eq!(first["interest"], 41_667.0);
        assert_eq!(first["balance"], 9_185_592.0);
    }

    #[test]
    fn test_calculate_method_specific_fields() {
        let response = calc(r#"{"principal": 10000000, "annual_rate": 5, "years": 1, "payment_type": "equal_principal"}"#);
        assert_eq!(response.body["first_payment"], 875_000.0);
        assert_eq!(response.body["last_payment"], 836_806.0);
        assert!(response.body.get("monthly_payment").is_none());

        let response = calc(r#"{"principal": 10000000, "annual_rate": 5, "years": 1, "payment_type": "maturity_payment"}"#);
        assert_eq!(response.body["monthly_interest"], 41_667.0);
        assert_eq!(response.body["final_payment"], 10_041_667.0);
        assert_eq!(response.body["total_interest"], 500_000.0);

        let response = calc(r#"{"principal": 100000000, "annual_rate": 4, "years": 3, "payment_type": "step_up_payment"}"#);
        assert_eq!(response.body["initial_payment"], 2_643_405.0);
        assert_eq!(response.body["final_payment"], 9_719_266.0);
        assert_eq!(response.body["step_rate"], 5.0);
    }

    #[test]
    fn test_calculate_defaults_to_equal_payment() {
        let response = calc(r#"{"principal": 1200000, "months": 12}"#);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["monthly_payment"], 100_000.0);
        assert_eq!(response.body["total_interest"], 0.0);
    }

    #[test]
    fn test_calculate_validation_errors() {
        let cases = [
            r#"{"principal": 0, "annual_rate": 5, "years": 1}"#,
            r#"{"principal": -10, "annual_rate": 5, "years": 1}"#,
            r#"{"principal": 1000000, "annual_rate": 5, "years": 0, "months": 0}"#,
            r#"{"principal": 1000000, "annual_rate": 5, "years": 1, "payment_type": "balloon"}"#,
            r#"{"principal": 1000000, "annual_rate": -1, "years": 1}"#,
            r#"{"principal": 1000000, "annual_rate": 5, "years": 1, "payment_type": "step_up_payment", "step_rate": 0}"#,
            r#"{}"#,
        ];

        for body in cases {
            let response = calc(body);
            assert_eq!(response.status, 400, "body {}", body);
            assert!(response.body["error"].is_string());
        }
    }

    #[test]
    fn test_unknown_method_message() {
        let response = calc(r#"{"principal": 1000000, "annual_rate": 5, "years": 1, "payment_type": "balloon"}"#);
        let message = response.body["error"].as_str().unwrap();
        assert!(message.contains("payment_type"));
        assert!(message.contains("balloon"));
    }

    #[test]
    fn test_malformed_json() {
        let response = calc("{not json");
        assert_eq!(response.status, 400);
        assert!(response.body["error"].as_str().unwrap().starts_with("Invalid JSON"));

        let response = calc(r#"{"principal": "lots"}"#);
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_computation_fault_is_server_error() {
        let response = calc(r#"{"principal": 1e308, "annual_rate": 5000, "years": 100}"#);
        assert_eq!(response.status, 500);
        assert!(response.body["error"].as_str().unwrap().starts_with("Calculation failed"));
    }

    #[test]
    fn test_estimate_rate() {
        let response = handle_estimate_rate(
            r#"{"credit_score": 920, "loan_type": "mortgage", "income": 12000, "employment_type": "regular"}"#,
        );

        assert_eq!(response.status, 200);
        assert_eq!(response.body["estimated_rate"], 1.2);
        assert_eq!(response.body["min_rate"], 1.0);
        assert_eq!(response.body["max_rate"], 1.7);
        assert_eq!(response.body["credit_grade"], "top tier");
        assert_eq!(response.body["base_rate"], 3.5);
        assert_eq!(response.body["adjustments"]["credit"], -2.0);
        assert_eq!(response.body["adjustments"]["employment"], 0.0);
        assert_eq!(response.body["adjustments"]["income"], -0.3);
    }

    #[test]
    fn test_estimate_rate_defaults() {
        let response = handle_estimate_rate(r#"{"credit_score": 760, "income": 5000}"#);
        assert_eq!(response.status, 200);
        // personal 6.5 - 1.0 (good) + 0 (regular) - 0.1
        assert_eq!(response.body["base_rate"], 6.5);
        assert_eq!(response.body["estimated_rate"], 5.4);
    }

    #[test]
    fn test_estimate_rate_validation() {
        for body in [
            r#"{"credit_score": 299, "income": 5000}"#,
            r#"{"credit_score": 1000, "income": 5000}"#,
            r#"{"credit_score": 700, "income": 0}"#,
            "",
        ] {
            let response = handle_estimate_rate(body);
            assert_eq!(response.status, 400, "body {:?}", body);
        }

        assert!(handle_estimate_rate(r#"{"credit_score": 300, "income": 1}"#).is_success());
        assert!(handle_estimate_rate(r#"{"credit_score": 999, "income": 1}"#).is_success());
    }

    #[test]
    fn test_missing_step_rate_uses_configured_default() {
        let config = AmortizationConfig {
            default_step_rate_percent: 10.0,
            ..Default::default()
        };
        let body = r#"{"principal": 100000000, "annual_rate": 4, "years": 3, "payment_type": "step_up_payment"}"#;

        let response = handle_calculate(body, &config);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["step_rate"], 10.0);

        // An explicit step rate wins over the configured one
        let body = r#"{"principal": 100000000, "annual_rate": 4, "years": 3, "payment_type": "step_up_payment", "step_rate": 5}"#;
        let response = handle_calculate(body, &config);
        assert_eq!(response.body["step_rate"], 5.0);
        assert_eq!(response.body["initial_payment"], 2_643_405.0);
    }

    #[test]
    fn test_route_preflight_and_method_filter() {
        let config = AmortizationConfig::default();

        let response = route("OPTIONS", "/calculate", "", &config);
        assert_eq!(response.status, 200);
        assert!(response.body.is_null());

        let response = route("GET", "/calculate", "", &config);
        assert_eq!(response.status, 405);
        assert!(response.body["error"].is_string());
    }

    #[test]
    fn test_route_dispatch() {
        let config = AmortizationConfig::default();
        let loan = r#"{"principal": 1200000, "months": 12}"#;

        let response = route("POST", "/calculate", loan, &config);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["monthly_payment"], 100_000.0);

        let response = route("POST", "/prod/calculate/", loan, &config);
        assert_eq!(response.status, 200);

        let response = route("POST", "/estimate-rate", r#"{"credit_score": 920, "loan_type": "mortgage", "income": 12000}"#, &config);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["estimated_rate"], 1.2);

        let response = route("POST", "/nope", loan, &config);
        assert_eq!(response.status, 404);
        assert!(response.body["error"].as_str().unwrap().contains("/nope"));
    }

    #[test]
    fn test_route_empty_body_is_rejected() {
        let config = AmortizationConfig::default();
        assert_eq!(route("POST", "/calculate", "", &config).status, 400);
        assert_eq!(route("POST", "/estimate-rate", "", &config).status, 400);
    }

    #[test]
    fn test_quote_applies_estimated_rate() {
        let borrower = EstimateRateRequest {
            credit_score: 920,
            loan_type: "mortgage".to_string(),
            income: 12_000,
            employment_type: "regular".to_string(),
        };
        let loan = CalculateRequest {
            principal: 10_000_000.0,
            annual_rate: 9.0,
            years: 1,
            months: 0,
            payment_type: "maturity_payment".to_string(),
            step_rate: None,
        };

        let quote = quote(&borrower, &loan, &AmortizationConfig::default()).unwrap();
        assert_eq!(quote.estimate.estimated_rate, 1.2);
        // 10,000,000 * 1.2% / 12
        assert_eq!(quote.schedule.schedule[0].interest, 10_000.0);
        assert_eq!(quote.schedule.total_interest, 120_000.0);

        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["estimate"]["estimated_rate"], 1.2);
        assert_eq!(json["schedule"]["final_payment"], 10_010_000.0);
    }

    #[test]
    fn test_quote_rejects_invalid_borrower() {
        let borrower = EstimateRateRequest {
            credit_score: 100,
            loan_type: "personal".to_string(),
            income: 5_000,
            employment_type: "regular".to_string(),
        };
        let loan = CalculateRequest {
            principal: 1_000_000.0,
            annual_rate: 0.0,
            years: 1,
            months: 0,
            payment_type: "equal_payment".to_string(),
            step_rate: None,
        };

        let err = quote(&borrower, &loan, &AmortizationConfig::default()).unwrap_err();
        assert!(err.is_client_error());
    }
}
