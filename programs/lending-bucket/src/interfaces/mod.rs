//! Interfaces for external integrations (rate curve, swap router, reward vault)

pub mod irm;
pub mod router;
pub mod balance_vault;

pub use irm::*;
pub use router::*;
pub use balance_vault::*;
