//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod page;

#[allow(unused_imports)]
pub use fixtures::{sample_init_data, BOT_TOKEN};
#[allow(unused_imports)]
pub use page::FakePage;
