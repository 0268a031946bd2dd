//! Browser implementations of the wallet and ledger capabilities

pub mod phantom;
pub mod rpc;
