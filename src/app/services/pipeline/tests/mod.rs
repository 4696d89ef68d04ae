//! Tests for full-run orchestration

pub mod pipeline_tests;
