//! Communication feed types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel a communication arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Email,
    Im,
    Sms,
    Voice,
}

/// A captured communication from the archive feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communication {
    pub id: String,
    pub channel: Channel,
    pub from: String,
    pub to: Vec<String>,
    pub ts: DateTime<Utc>,
    pub text: String,
}
