//! Tests that drive the mirror against a scripted server.
//!
//! - **support**: fake transport and session helpers
//! - **sync_loop_tests**: long-poll ordering, timeout and backoff behaviour
//! - **flow_tests**: bootstrap, watch changes and the page flows
//! - **action_tests**: request shapes of the one-shot actions

pub mod support;

pub mod flow_tests;
