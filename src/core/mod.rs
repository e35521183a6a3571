//! core
//!
//! Core configuration for ghsecrets.
//!
//! # Modules
//!
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Schemas are strict and self-describing
//! - Missing configuration is never an error; invalid configuration always is

pub mod config;
