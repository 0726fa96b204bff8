//! State account structures

pub mod protocol;
pub mod bucket;
pub mod ledger;
pub mod locks;
pub mod mining;
pub mod position;
pub mod role;

pub use protocol::*;
pub use bucket::*;
pub use ledger::*;
pub use locks::*;
pub use mining::*;
pub use position::*;
pub use role::*;
