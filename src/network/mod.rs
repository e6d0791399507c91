//! Network layer: TCP listener and per-connection session workers.

pub mod connection;
pub mod gateway;

pub use connection::SessionWorker;
pub use gateway::Gateway;
