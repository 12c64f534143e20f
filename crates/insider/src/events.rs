//! Insider list ledger events

use serde::{Deserialize, Serialize};

use crate::types::{Issuer, WallCrossing};

/// Events the insider list writes to the WORM ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum InsiderEvent {
    /// An issuer entered the restricted universe
    IssuerAdded { issuer: Issuer },

    /// A person was brought over the wall
    PersonWallCrossed { crossing: WallCrossing },

    /// A person's wall crossing was lifted
    PersonWallLifted { crossing: WallCrossing },

    /// A trade was disallowed inside a restricted window
    TradeBlocked {
        trade_id: String,
        symbol: String,
        trader_id: String,
        alert_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_event_wire_shape() {
        let event = InsiderEvent::TradeBlocked {
            trade_id: "t1".to_string(),
            symbol: "BRX".to_string(),
            trader_id: "advisor-1".to_string(),
            alert_id: "a1".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"TRADE_BLOCKED\""));
        assert!(json.contains("\"traderId\":\"advisor-1\""));
    }

    #[test]
    fn test_crossing_event_round_trip() {
        let event = InsiderEvent::PersonWallCrossed {
            crossing: WallCrossing {
                person_id: "p1".to_string(),
                issuer_id: "i1".to_string(),
                wall_crossed_at: Utc::now(),
                wall_crossed_off: None,
            },
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "PERSON_WALL_CROSSED");

        let parsed: InsiderEvent = serde_json::from_value(value).unwrap();
        assert!(matches!(parsed, InsiderEvent::PersonWallCrossed { .. }));
    }
}
