//! Core library for client-side replica routing.
//!
//! This crate provides the fundamental abstractions shared by the router:
//! - Node identity and replica endpoints
//! - Read strategies and their external names
//! - Error types

pub mod error;
pub mod node;
pub mod strategy;

pub use error::{Error, Result};
pub use node::{Endpoint, NodeId};
pub use strategy::ReadStrategy;
