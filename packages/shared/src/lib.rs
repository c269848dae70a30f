//! Utilities shared by the watchparty server and client.

pub mod logger;
pub mod time;
