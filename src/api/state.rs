//! Application state for the engine's HTTP surface.

use std::sync::Arc;

use crate::config::JurisdictionTable;
use crate::engine::TimeLedger;

/// Shared application state.
///
/// Contains resources shared across all request handlers: the engine
/// facade over the external stores, and the static jurisdiction table.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<TimeLedger>,
    jurisdictions: Arc<JurisdictionTable>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(ledger: TimeLedger, jurisdictions: JurisdictionTable) -> Self {
        Self {
            ledger: Arc::new(ledger),
            jurisdictions: Arc::new(jurisdictions),
        }
    }

    /// Returns the engine facade.
    pub fn ledger(&self) -> &TimeLedger {
        &self.ledger
    }

    /// Returns the jurisdiction rule table.
    pub fn jurisdictions(&self) -> &JurisdictionTable {
        &self.jurisdictions
    }
}
