//! Input validation for feed records and alerts
//!
//! Feed payloads arrive from upstream adapters as untrusted input. Every
//! ingestion surface validates here before any state is touched or any
//! ledger entry is written.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::alert::{SurveillanceAlert, MAX_SEVERITY};
use crate::comms::Communication;
use crate::trade::Trade;
use crate::wallet::WalletTransfer;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field {field} out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

pub type ValidationResult = Result<(), ValidationError>;

fn require(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn require_positive(field: &'static str, value: Decimal) -> ValidationResult {
    if value <= Decimal::ZERO {
        return Err(ValidationError::OutOfRange {
            field,
            reason: format!("must be positive, got {}", value),
        });
    }
    Ok(())
}

/// Validate a trade record from the trade feed
pub fn validate_trade(trade: &Trade) -> ValidationResult {
    require("id", &trade.id)?;
    require("accountId", &trade.account_id)?;
    require("symbol", &trade.symbol)?;
    require_positive("quantity", trade.quantity)?;
    require_positive("price", trade.price)?;
    Ok(())
}

/// Validate a wallet transfer from the crypto feed
pub fn validate_transfer(transfer: &WalletTransfer) -> ValidationResult {
    require("id", &transfer.id)?;
    require("wallet", &transfer.wallet)?;
    require("txHash", &transfer.tx_hash)?;
    require_positive("amount", transfer.amount)?;
    Ok(())
}

/// Validate a communication record from the comms feed
pub fn validate_communication(comm: &Communication) -> ValidationResult {
    require("id", &comm.id)?;
    require("from", &comm.from)?;
    if comm.to.is_empty() {
        return Err(ValidationError::MissingField("to"));
    }
    Ok(())
}

/// Validate an alert before it enters the case pipeline
pub fn validate_alert(alert: &SurveillanceAlert) -> ValidationResult {
    require("id", &alert.id)?;
    require("scenario", &alert.scenario)?;
    require("key", &alert.key)?;
    if alert.severity > MAX_SEVERITY {
        return Err(ValidationError::OutOfRange {
            field: "severity",
            reason: format!("must be <= {}, got {}", MAX_SEVERITY, alert.severity),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertKind;
    use crate::trade::{AssetType, TradeSide};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample_trade() -> Trade {
        Trade {
            id: "t1".to_string(),
            account_id: "ACC-1".to_string(),
            household_id: None,
            rep_id: "REP-1".to_string(),
            symbol: "BRF".to_string(),
            asset_type: AssetType::Equity,
            side: TradeSide::Buy,
            quantity: dec!(100),
            price: dec!(10.50),
            executed_at: Utc::now(),
            is_employee_account: false,
        }
    }

    #[test]
    fn test_valid_trade_passes() {
        assert!(validate_trade(&sample_trade()).is_ok());
    }

    #[test]
    fn test_trade_missing_account_rejected() {
        let mut trade = sample_trade();
        trade.account_id = "".to_string();
        assert_eq!(
            validate_trade(&trade),
            Err(ValidationError::MissingField("accountId"))
        );
    }

    #[test]
    fn test_trade_zero_quantity_rejected() {
        let mut trade = sample_trade();
        trade.quantity = dec!(0);
        assert!(matches!(
            validate_trade(&trade),
            Err(ValidationError::OutOfRange { field: "quantity", .. })
        ));
    }

    #[test]
    fn test_alert_blank_key_rejected() {
        let mut alert =
            SurveillanceAlert::new(AlertKind::Trading, "WASH_TRADE", 75, "k", json!({}));
        alert.key = "  ".to_string();
        assert_eq!(
            validate_alert(&alert),
            Err(ValidationError::MissingField("key"))
        );
    }

    #[test]
    fn test_communication_needs_recipient() {
        let comm = Communication {
            id: "c1".to_string(),
            channel: crate::comms::Channel::Email,
            from: "rep@firm.com".to_string(),
            to: vec![],
            ts: Utc::now(),
            text: "hello".to_string(),
        };
        assert_eq!(
            validate_communication(&comm),
            Err(ValidationError::MissingField("to"))
        );
    }
}
