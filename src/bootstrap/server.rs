use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, info_span, Instrument};

use crate::api::{ApiServer, ApiState};
use crate::classifier::Classifier;
use crate::config::Config;
use crate::telemetry::counters;

use super::shutdown::Shutdown;

/// Main msisdnd server.
///
/// Components:
/// - Prefix directory and classifier, built from config before serving
/// - Lookup API (axum) with graceful shutdown
/// - Signal handling: SIGINT/SIGTERM stop, SIGHUP reloads the directory
pub struct Server {
    /// Configuration
    config: Arc<Config>,

    /// Config file path (for reload)
    config_path: Option<PathBuf>,

    /// Shared API state
    state: Arc<ApiState>,

    /// Shutdown flag
    shutdown: Arc<Shutdown>,
}

impl Server {
    /// Create a new server instance.
    ///
    /// Builds the directory up front so a bad table fails startup.
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Result<Self> {
        let directory = config.build_directory()?;
        let classifier = Classifier::with_limits(Arc::new(directory), config.classifier)
            .context("invalid classifier limits")?;

        counters::init();

        let state = Arc::new(ApiState::new(classifier, config_path.clone()));

        Ok(Self {
            config: Arc::new(config),
            config_path,
            state,
            shutdown: Shutdown::new(),
        })
    }

    /// Shared API state.
    pub fn state(&self) -> Arc<ApiState> {
        self.state.clone()
    }

    /// Shutdown handle.
    pub fn shutdown(&self) -> Arc<Shutdown> {
        self.shutdown.clone()
    }

    /// Bind the configured address and run until shutdown.
    pub async fn run(self) -> Result<()> {
        let address = self.config.server.address;
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("failed to bind {}", address))?;
        self.run_with_listener(listener).await
    }

    /// Run on an already bound listener until shutdown.
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<()> {
        let span = info_span!("msisdnd", version = env!("CARGO_PKG_VERSION"));
        self.serve(listener).instrument(span).await
    }

    async fn serve(self, listener: TcpListener) -> Result<()> {
        let classifier = self.state.classifier().await;
        let limits = classifier.limits();
        info!(
            address = %listener.local_addr()?,
            config = ?self.config_path,
            countries = classifier.directory().country_count(),
            operators = classifier.directory().operator_count(),
            min_length = limits.min_length,
            max_length = limits.max_length,
            "starting msisdnd server"
        );

        let signals = tokio::spawn(self.shutdown.clone().listen_for_signals());
        let reloads = tokio::spawn(reload_on_hangup(self.state.clone(), self.shutdown.clone()));

        let api = ApiServer::new(self.state.clone(), self.shutdown.clone());
        let result = api.serve(listener).await;

        // Server may have stopped on its own (I/O error)
        self.shutdown.trigger();
        signals.abort();
        let _ = reloads.await;

        if let Err(ref e) = result {
            error!(error = %e, "lookup server failed");
        }

        info!("msisdnd server stopped");
        result.context("lookup server failed")
    }
}

/// Reload the directory on SIGHUP until shutdown.
async fn reload_on_hangup(state: Arc<ApiState>, shutdown: Arc<Shutdown>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(sig) => sig,
            Err(e) => {
                error!(error = %e, "failed to install SIGHUP handler");
                return;
            }
        };

        loop {
            tokio::select! {
                received = hangup.recv() => {
                    if received.is_none() {
                        break;
                    }
                    info!("received SIGHUP, reloading directory");
                    // Errors are logged and counted by the state
                    let _ = state.reload_directory().await;
                }
                _ = shutdown.wait() => break,
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = state;
        shutdown.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_directory() {
        let config = Config::from_yaml(
            r#"
directory:
  builtin: false
  countries:
    - country_code: "389"
      country_identifier: MK
"#,
        )
        .unwrap();

        let result = Server::new(config, None);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let config = Config::from_yaml("").unwrap();
        let server = Server::new(config, None).unwrap();
        let shutdown = server.shutdown();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let handle = tokio::spawn(server.run_with_listener(listener));

        shutdown.trigger();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("server should stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hangup_reloads_directory() {
        use std::time::Duration;
        use tokio::signal::unix::{signal, SignalKind};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msisdnd.yaml");
        std::fs::write(
            &path,
            r#"
directory:
  builtin: false
  countries:
    - country_code: "389"
      country_identifier: mk
  operators:
    - country_code: "389"
      prefix: "77"
      mno: A1
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let server = Server::new(config, Some(path.clone())).unwrap();
        let state = server.state();
        let shutdown = server.shutdown();
        assert!(state.lookup("38641123456").await.is_err());

        std::fs::write(
            &path,
            r#"
directory:
  builtin: false
  countries:
    - country_code: "386"
      country_identifier: si
  operators:
    - country_code: "386"
      prefix: "41"
      mno: Telekom Slovenije
"#,
        )
        .unwrap();

        // Installs the process SIGHUP handler before the first raise
        let _guard = signal(SignalKind::hangup()).unwrap();
        let reloads = tokio::spawn(reload_on_hangup(state.clone(), shutdown.clone()));

        // The reload task registers its listener after spawning
        let reloaded = tokio::time::timeout(Duration::from_secs(5), async {
            while state.reload_count() == 0 {
                unsafe {
                    libc::raise(libc::SIGHUP);
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await;
        assert!(reloaded.is_ok(), "SIGHUP did not trigger a reload");

        assert_eq!(state.lookup("38641123456").await.unwrap().mno, "Telekom Slovenije");
        assert!(state.lookup("38977123456").await.is_err());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), reloads)
            .await
            .expect("reload task stops on shutdown")
            .unwrap();
    }
}
