//! Shared helpers for integration and end-to-end tests
#![allow(dead_code)]

pub mod fixtures;
pub mod http_server;
pub mod mocks;
