//! Order Handlers

pub(crate) mod all;
pub(crate) mod checkout;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;
