//! Test utilities for the MagicPod step expander.
//!
//! This crate provides an in-memory [`FakeSource`](fake_source::FakeSource)
//! for driving the fetch pipeline without a network, a routed HTTP fixture
//! for exercising the real client, and error formatting helpers.

pub mod error;
pub mod fake_source;
pub mod http;

pub use fake_source::{FakeRequest, FakeSource};
pub use http::{ApiServer, RecordedRequest, Route, spawn_api_server};
