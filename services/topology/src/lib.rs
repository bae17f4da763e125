//! Switchyard topology service library crate.
//!
//! # Purpose
//! Exposes the topology catalog, the graph queries over it, the broker binding
//! coordinator and the HTTP API for use by the binary and tests.
//!
//! # Notes
//! `service` holds the domain operations; `api` is a thin HTTP adapter over it.
pub mod api;
pub mod app;
pub mod broker;
pub mod config;
pub mod error;
pub mod graph;
pub mod locks;
pub mod model;
pub mod observability;
pub mod routing;
pub mod schema;
pub mod service;
pub mod store;
