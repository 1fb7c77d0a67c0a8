mod hashmap_ledger_store;
mod postgres_ledger_store;

pub use hashmap_ledger_store::*;
pub use postgres_ledger_store::*;
