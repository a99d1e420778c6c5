//! Bond screening stages.
//!
//! - coupon percentile filter per issuer group (`coupon`)
//! - the order-sensitive risk/quality filter chain (`quality`)

pub mod coupon;
pub mod quality;

pub use coupon::*;
pub use quality::*;
