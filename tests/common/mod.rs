//! Integration test common infrastructure.
//!
//! Spawns hubbubd as a subprocess and drives it with raw line clients,
//! plus the operator console through the child's stdin.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
