//! インメモリ Repository 実装

pub mod session;

pub use session::InMemorySessionRepository;
