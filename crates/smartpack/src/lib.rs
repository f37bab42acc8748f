//! Packaging optimization service building blocks.
//!
//! The [`optimization`] module holds the deterministic calculator. Everything
//! around it (catalog import, storage, AI advisor, reports, HTTP routes) is
//! wired together by [`service::PackagingService`].

pub mod advisor;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod optimization;
pub mod reports;
pub mod router;
pub mod service;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod tests;
