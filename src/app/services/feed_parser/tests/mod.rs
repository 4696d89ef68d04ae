//! Tests for the feed parser
