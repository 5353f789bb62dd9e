pub mod contract;
pub mod ledger;
pub mod snapshot;
