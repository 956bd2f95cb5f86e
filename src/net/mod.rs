//! Networking modules for the recipe backend's HTTP API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` issues requests, `endpoints` names the resources, and `types`
//! defines the JSON wire schema.

pub mod endpoints;
pub mod transport;
pub mod types;

#[cfg(test)]
#[path = "mock_test.rs"]
pub(crate) mod test_helpers;
