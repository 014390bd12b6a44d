//! Payments
//!
//! The hosted-checkout processor sits behind [`PaymentGateway`]; orders only
//! ever see that trait.

mod errors;
mod gateway;
mod signature;
mod stripe;

pub use errors::*;
pub use gateway::*;
pub use stripe::StripeGateway;
