//! Payment status and type enums.

use crate::error::CoreError;
use crate::types::Cents;

/// Currencies we accept for checkout.
pub const SUPPORTED_CURRENCIES: &[&str] = &["usd", "eur", "gbp", "inr"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(CoreError::Validation(format!(
                "Unknown payment status '{other}'"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    Membership,
    Spa,
    Training,
}

impl PaymentType {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "membership" => Ok(Self::Membership),
            "spa" => Ok(Self::Spa),
            "training" => Ok(Self::Training),
            other => Err(CoreError::Validation(format!(
                "Unknown payment type '{other}'. Must be one of: membership, spa, training"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Membership => "membership",
            Self::Spa => "spa",
            Self::Training => "training",
        }
    }
}

/// What completing a payment in `status` should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionAction {
    /// Mark the payment completed and apply its side effects.
    Complete,
    /// Already completed; return it unchanged.
    AlreadyDone,
}

/// Decide how to complete a payment currently in `status`.
pub fn completion_action(status: &str) -> Result<CompletionAction, CoreError> {
    match PaymentStatus::from_name(status)? {
        PaymentStatus::Pending => Ok(CompletionAction::Complete),
        PaymentStatus::Completed => Ok(CompletionAction::AlreadyDone),
        other => Err(CoreError::Conflict(format!(
            "Cannot complete a payment that is {}",
            other.name()
        ))),
    }
}

pub fn validate_amount(amount_cents: Cents) -> Result<(), CoreError> {
    if amount_cents <= 0 {
        return Err(CoreError::Validation(
            "Payment amount must be greater than zero".into(),
        ));
    }
    Ok(())
}

pub fn validate_currency(currency: &str) -> Result<(), CoreError> {
    if SUPPORTED_CURRENCIES.contains(&currency) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported currency '{currency}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_is_idempotent() {
        assert_eq!(completion_action("pending").unwrap(), CompletionAction::Complete);
        assert_eq!(
            completion_action("completed").unwrap(),
            CompletionAction::AlreadyDone
        );
    }

    #[test]
    fn failed_and_refunded_cannot_complete() {
        assert!(matches!(completion_action("failed"), Err(CoreError::Conflict(_))));
        assert!(matches!(completion_action("refunded"), Err(CoreError::Conflict(_))));
        assert!(matches!(completion_action("bogus"), Err(CoreError::Validation(_))));
    }

    #[test]
    fn types_round_trip_names() {
        for t in ["membership", "spa", "training"] {
            assert_eq!(PaymentType::from_name(t).unwrap().name(), t);
        }
        assert!(PaymentType::from_name("Membership").is_err());
    }

    #[test]
    fn amounts_and_currencies() {
        assert!(validate_amount(1).is_ok());
        assert!(validate_amount(0).is_err());
        assert!(validate_currency("usd").is_ok());
        assert!(validate_currency("USD").is_err());
    }
}
