//! HTTP networking module
//!
//! Provides HTTP client functionality for talking to the vendor API.

mod client;

pub use client::HttpClient;
