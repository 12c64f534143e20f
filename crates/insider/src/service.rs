//! Insider list service
//!
//! Tracks restricted issuers and wall-crossed people, and assesses trades
//! against them. Every registration and every blocked trade is recorded in
//! the WORM ledger before the in-memory registry is touched; a failed
//! ledger write means the registration did not happen.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::json;

use vigil_core::{AlertKind, SurveillanceAlert, Trade};
use vigil_worm::WormLedger;

use crate::error::{InsiderError, InsiderResult};
use crate::events::InsiderEvent;
use crate::types::{AddPersonInput, Issuer, IssuerSpec, TradeAssessment, WallCrossing};

pub const INSIDER_WINDOW_BREACH: &str = "INSIDER_WINDOW_BREACH";
pub const INSIDER_WINDOW_BREACH_SEVERITY: u8 = 92;

#[derive(Default)]
struct InsiderState {
    /// Issuer id -> issuer
    issuers: HashMap<String, Issuer>,
    /// Symbol -> issuer id
    symbol_index: HashMap<String, String>,
    crossings: Vec<WallCrossing>,
}

impl InsiderState {
    fn issuer_by_symbol(&self, symbol: &str) -> Option<&Issuer> {
        self.symbol_index
            .get(symbol)
            .and_then(|id| self.issuers.get(id))
    }
}

/// Restricted list and wall-crossing registry
pub struct InsiderListService {
    ledger: Arc<WormLedger>,
    state: Mutex<InsiderState>,
}

impl InsiderListService {
    pub fn new(ledger: Arc<WormLedger>) -> Self {
        Self {
            ledger,
            state: Mutex::new(InsiderState::default()),
        }
    }

    /// Register an issuer on the restricted universe
    pub fn add_issuer(&self, spec: IssuerSpec) -> InsiderResult<Issuer> {
        let issuer = Issuer {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: spec.symbol,
            name: spec.name,
            event: spec.event,
            window_start: spec.window_start,
            window_end: spec.window_end,
            restricted_list: spec.restricted_list,
        };

        let mut state = self.state.lock().unwrap();
        self.ledger.append_event(&InsiderEvent::IssuerAdded {
            issuer: issuer.clone(),
        })?;
        state
            .symbol_index
            .insert(issuer.symbol.clone(), issuer.id.clone());
        state.issuers.insert(issuer.id.clone(), issuer.clone());

        tracing::info!(
            issuer_id = %issuer.id,
            symbol = %issuer.symbol,
            event = %issuer.event,
            "Issuer added to restricted universe"
        );

        Ok(issuer)
    }

    /// Bring a person over the wall for an issuer
    pub fn add_person(&self, input: AddPersonInput) -> InsiderResult<WallCrossing> {
        let mut state = self.state.lock().unwrap();
        if !state.issuers.contains_key(&input.issuer_id) {
            return Err(InsiderError::UnknownIssuer(input.issuer_id));
        }

        let crossing = WallCrossing {
            person_id: input.person_id,
            issuer_id: input.issuer_id,
            wall_crossed_at: input.wall_crossed_at,
            wall_crossed_off: None,
        };

        self.ledger.append_event(&InsiderEvent::PersonWallCrossed {
            crossing: crossing.clone(),
        })?;
        state.crossings.push(crossing.clone());

        tracing::info!(
            person_id = %crossing.person_id,
            issuer_id = %crossing.issuer_id,
            "Person wall-crossed"
        );

        Ok(crossing)
    }

    /// Lift a person's active wall crossing for an issuer
    pub fn lift_person(
        &self,
        person_id: &str,
        issuer_id: &str,
        at: chrono::DateTime<chrono::Utc>,
    ) -> InsiderResult<WallCrossing> {
        let mut state = self.state.lock().unwrap();
        let position = state
            .crossings
            .iter()
            .position(|c| {
                c.person_id == person_id && c.issuer_id == issuer_id && c.wall_crossed_off.is_none()
            })
            .ok_or_else(|| InsiderError::UnknownCrossing {
                person_id: person_id.to_string(),
                issuer_id: issuer_id.to_string(),
            })?;

        let mut lifted = state.crossings[position].clone();
        lifted.wall_crossed_off = Some(at);

        self.ledger.append_event(&InsiderEvent::PersonWallLifted {
            crossing: lifted.clone(),
        })?;
        state.crossings[position] = lifted.clone();

        tracing::info!(person_id, issuer_id, "Wall crossing lifted");

        Ok(lifted)
    }

    /// Assess a trade against the restricted list.
    ///
    /// The assessment is taken at the trade's execution time, not the call
    /// time, so re-running a feed batch gives the same answer. A disallowed
    /// trade produces an `INSIDER_WINDOW_BREACH` alert and a `TRADE_BLOCKED`
    /// ledger event.
    pub fn assess_trade(&self, trade: &Trade, trader_id: &str) -> InsiderResult<TradeAssessment> {
        let state = self.state.lock().unwrap();
        let t = trade.executed_at;

        let issuer = match state.issuer_by_symbol(&trade.symbol) {
            Some(issuer) => issuer,
            None => return Ok(TradeAssessment::allowed()),
        };
        let window_active =
            issuer.restricted_list && issuer.window_start <= t && t <= issuer.window_end;
        if !window_active {
            return Ok(TradeAssessment::allowed());
        }

        let crossed = state
            .crossings
            .iter()
            .any(|c| c.person_id == trader_id && c.issuer_id == issuer.id && c.is_inside_at(t));
        if !crossed {
            return Ok(TradeAssessment::allowed());
        }

        let alert = SurveillanceAlert::new(
            AlertKind::Trading,
            INSIDER_WINDOW_BREACH,
            INSIDER_WINDOW_BREACH_SEVERITY,
            format!("issuer|{}|trader|{}", trade.symbol, trader_id),
            json!({
                "symbol": trade.symbol,
                "traderId": trader_id,
                "issuerId": issuer.id,
                "event": issuer.event,
                "windowStart": issuer.window_start,
                "windowEnd": issuer.window_end,
            }),
        );

        self.ledger.append_event(&InsiderEvent::TradeBlocked {
            trade_id: trade.id.clone(),
            symbol: trade.symbol.clone(),
            trader_id: trader_id.to_string(),
            alert_id: alert.id.clone(),
        })?;

        tracing::warn!(
            trade_id = %trade.id,
            symbol = %trade.symbol,
            trader_id,
            "Trade blocked inside restricted window"
        );

        Ok(TradeAssessment::blocked(alert))
    }

    /// Rebuild the registry by folding insider events out of the ledger.
    ///
    /// Blocks written by other services are skipped; `TRADE_BLOCKED` records
    /// carry no registry state and are skipped too.
    pub fn replay(ledger: Arc<WormLedger>) -> Self {
        let mut state = InsiderState::default();

        for block in ledger.all() {
            let event: InsiderEvent = match serde_json::from_value(block.payload) {
                Ok(event) => event,
                Err(_) => continue,
            };
            match event {
                InsiderEvent::IssuerAdded { issuer } => {
                    state
                        .symbol_index
                        .insert(issuer.symbol.clone(), issuer.id.clone());
                    state.issuers.insert(issuer.id.clone(), issuer);
                }
                InsiderEvent::PersonWallCrossed { crossing } => {
                    state.crossings.push(crossing);
                }
                InsiderEvent::PersonWallLifted { crossing } => {
                    if let Some(active) = state.crossings.iter_mut().find(|c| {
                        c.person_id == crossing.person_id
                            && c.issuer_id == crossing.issuer_id
                            && c.wall_crossed_off.is_none()
                    }) {
                        active.wall_crossed_off = crossing.wall_crossed_off;
                    }
                }
                InsiderEvent::TradeBlocked { .. } => {}
            }
        }

        Self {
            ledger,
            state: Mutex::new(state),
        }
    }

    /// Issuers currently on the restricted universe
    pub fn list_issuers(&self) -> Vec<Issuer> {
        self.state.lock().unwrap().issuers.values().cloned().collect()
    }
}
