//! Carts

mod errors;
mod handlers;
pub(crate) mod items;

pub(crate) use errors::*;
pub(crate) use handlers::*;
