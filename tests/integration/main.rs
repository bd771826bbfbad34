//! Integration tests for the scraper
//!
//! These tests use wiremock to stand in for the shop and exercise the
//! fetch gate, the paginator and full runs end-to-end.

mod common;
mod paginator_tests;
