//! Room Service - multi-user room lifecycle management.
//!
//! This crate implements the room/participant state machine: creation,
//! password-gated joining, leaving with host failover, and closing.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
