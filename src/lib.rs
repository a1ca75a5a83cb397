//! MagicPod shared-step expansion library.
//!
//! This library fetches test cases and shared steps from the MagicPod API
//! and rewrites each test case's `human_readable_steps` so every shared-step
//! reference is followed by the steps it stands for.
//!
//! - [`api`] fetches records through the [`api::RemoteSource`] trait.
//! - [`steps`] holds the pure expansion and counting logic.
//! - [`runner`] ties both together for the command line interface in [`cli`].

pub mod api;
pub mod cli;
pub mod locale;
pub mod model;
pub mod runner;
pub mod steps;
