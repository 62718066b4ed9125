//! Search orchestration module
//!
//! Composes the rate limiter, response cache, and vendor adapter into the
//! single entry point a request handler calls.

mod gateway;
mod models;

pub use gateway::{SearchGateway, SearchOutcome};
pub use models::*;
