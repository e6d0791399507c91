//! Test server management.
//!
//! Spawns and manages hubbubd instances for integration testing.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;

/// A test hub instance.
pub struct TestServer {
    child: Child,
    stdin: ChildStdin,
    port: u16,
    _data_dir: tempfile::TempDir,
}

impl TestServer {
    /// Spawn a new hub on the given port.
    ///
    /// The child's stdin is piped so tests can drive the operator
    /// console with [`TestServer::admin`].
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        let data_dir = tempfile::TempDir::new()?;

        let config_path = data_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[listen]
address = "127.0.0.1:{port}"
"#
        );
        std::fs::write(&config_path, config_content)?;

        // Path to the hubbubd binary in the workspace target dir.
        let binary_path =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/debug/hubbubd");

        let mut child = Command::new(&binary_path)
            .arg(&config_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()?;
        let stdin = child.stdin.take().expect("piped stdin");

        let server = Self {
            child,
            stdin,
            port,
            _data_dir: data_dir,
        };

        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the hub is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..30 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Hub failed to start within 3 seconds")
    }

    /// The hub's address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Connect a new test client and send its username.
    pub async fn connect(&self, username: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), username).await
    }

    /// Type one line at the operator console.
    pub fn admin(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Wait (bounded) for the hub process to exit; returns whether it did.
    pub async fn wait_for_exit(&mut self) -> bool {
        for _ in 0..30 {
            match self.child.try_wait() {
                Ok(Some(_)) => return true,
                Ok(None) => sleep(Duration::from_millis(100)).await,
                Err(_) => return false,
            }
        }
        false
    }

    /// Whether a fresh connection attempt succeeds.
    pub async fn accepts_connections(&self) -> bool {
        tokio::net::TcpStream::connect(("127.0.0.1", self.port))
            .await
            .is_ok()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
