use std::sync::Arc;

use crate::domain::LedgerStore;

// Stores serialise their own writes, so the handle needs no outer lock.
pub type LedgerStoreType = Arc<dyn LedgerStore + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub ledger_store: LedgerStoreType,
}

impl AppState {
    pub fn new(ledger_store: LedgerStoreType) -> Self {
        Self { ledger_store }
    }
}
