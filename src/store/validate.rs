//! Input rules applied at the API/CLI boundary
//!
//! The stores accept any well-typed value; these checks reject user input
//! before it reaches them.

use crate::store::error::{StoreError, StoreResult};

/// A budget amount must be a positive, finite number
pub fn budget_amount(amount: f64) -> StoreResult<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(StoreError::Validation(
            "Please enter a valid budget amount".to_string(),
        ));
    }
    Ok(amount)
}

/// A target price must be positive and strictly below the current price
pub fn target_price(target: f64, current_price: f64) -> StoreResult<f64> {
    if !target.is_finite() || target <= 0.0 {
        return Err(StoreError::Validation(
            "Please enter a valid target price".to_string(),
        ));
    }
    if target >= current_price {
        return Err(StoreError::Validation(
            "Target price should be lower than current price".to_string(),
        ));
    }
    Ok(target)
}

/// A purchase amount must be positive and finite
pub fn purchase_amount(amount: f64) -> StoreResult<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(StoreError::Validation(
            "Purchase amount must be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

/// Onboarding needs at least one favorite genre
pub fn onboarding_genres<S: AsRef<str>>(genres: &[S]) -> StoreResult<()> {
    if genres.iter().all(|g| g.as_ref().trim().is_empty()) {
        return Err(StoreError::Validation(
            "Please select at least one genre".to_string(),
        ));
    }
    Ok(())
}

/// Parse a user-typed amount the way the budget form does
pub fn parse_amount(input: &str) -> StoreResult<f64> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| StoreError::Validation(format!("Not a number: {}", input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_amount() {
        assert_eq!(budget_amount(1500.0).unwrap(), 1500.0);
        assert!(budget_amount(0.0).is_err());
        assert!(budget_amount(-10.0).is_err());
        assert!(budget_amount(f64::NAN).is_err());
        assert!(budget_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_target_price() {
        assert_eq!(target_price(225.0, 250.0).unwrap(), 225.0);

        let err = target_price(250.0, 250.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Target price should be lower than current price"
        );
        assert!(target_price(0.0, 250.0).is_err());
        assert!(target_price(f64::NAN, 250.0).is_err());
    }

    #[test]
    fn test_purchase_amount() {
        assert!(purchase_amount(199.0).is_ok());
        assert!(purchase_amount(0.0).is_err());
    }

    #[test]
    fn test_onboarding_genres() {
        assert!(onboarding_genres(&["Romance"]).is_ok());
        assert!(onboarding_genres::<&str>(&[]).is_err());
        assert!(onboarding_genres(&["  "]).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 1200 ").unwrap(), 1200.0);
        assert!(parse_amount("lots").is_err());
    }
}
