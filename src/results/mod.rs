//! Result types for normalized shopping items
//!
//! This module defines the vendor-agnostic result structures used throughout
//! the service, plus the search failure taxonomy.

mod types;

pub use types::*;
