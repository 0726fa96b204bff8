//! Instruction handlers for the lending bucket program

pub mod admin;
pub mod bucket;
pub mod bucket_admin;
pub mod position;
pub mod deposit;
pub mod transfer;
pub mod lock;
pub mod borrow;
pub mod loss;
pub mod mining;
pub mod utils;

pub use admin::*;
pub use bucket::*;
pub use bucket_admin::*;
pub use position::*;
pub use deposit::*;
pub use transfer::*;
pub use lock::*;
pub use borrow::*;
pub use loss::*;
pub use mining::*;
pub use utils::*;
