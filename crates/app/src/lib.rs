//! Emporium domain, persistence and payment modules shared by the binaries.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod money;
pub mod pagination;
pub mod payments;
pub mod settings;
pub mod uuids;

#[cfg(test)]
mod test;
