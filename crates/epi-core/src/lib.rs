//! # epi-core
//!
//! Core domain types and error types for epicast.
//!
//! This crate provides the foundational types shared across all epicast crates:
//! - Entity structs for aggregates, yearly series, and forecast rows
//! - Provenance and forecast method enums with their storage strings
//! - The contiguous historical year window
//! - Cross-cutting error types
//! - The `OutbreakStore` trait the pipeline consumes for persistence
//! - CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;
pub mod store;
pub mod window;
