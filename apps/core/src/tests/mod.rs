//! Test Module
//!
//! Crate-level test suite for PostLens.
//!
//! ## Test Categories
//! - `engine_tests`: end-to-end classification properties and worked examples
//! - `batch_tests`: parallel batch classification and JSON-lines I/O
//! - `config_tests`: engine configuration files and environment settings
//! - `report_tests`: batch summaries and opportunity discovery

pub mod engine_tests;
