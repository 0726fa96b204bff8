//! Math library modules for safe fixed-point arithmetic

pub mod safe_math;
pub mod u256;
pub mod wad;
pub mod scaled;
pub mod interest;

pub use safe_math::*;
pub use u256::U256;
pub use wad::*;
pub use scaled::*;
pub use interest::*;
