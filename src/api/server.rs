//! Lookup HTTP server.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::bootstrap::Shutdown;
use crate::classifier::{ClassificationError, ClassificationResult, Classifier};
use crate::config::Config;
use crate::directory::{CountryEntry, DirectoryError, OperatorEntry, PrefixDirectory};
use crate::telemetry::counters;

use super::handlers::{
    add_country_handler, add_operator_handler, api_lookup_handler, countries_handler,
    health_handler, live_handler, lookup_handler, metrics_handler, operators_handler,
    ready_handler, reload_handler, remove_country_handler, remove_operator_handler,
    stats_handler,
};

/// Shared API state.
pub struct ApiState {
    /// Server start time
    start_time: Instant,
    /// Is the server healthy
    healthy: AtomicBool,
    /// Is the server ready
    ready: AtomicBool,
    /// Lookups received
    lookups_total: AtomicU64,
    /// Lookups that classified successfully
    lookups_succeeded: AtomicU64,
    /// Lookups that failed classification
    lookups_failed: AtomicU64,
    /// Current classifier snapshot (swapped whole on reload)
    classifier: RwLock<Arc<Classifier>>,
    /// Config file path (for reload)
    config_path: Option<PathBuf>,
    /// Reload count
    reload_count: AtomicU64,
}

impl ApiState {
    /// Create new API state around an initial classifier.
    pub fn new(classifier: Classifier, config_path: Option<PathBuf>) -> Self {
        let directory = classifier.directory();
        counters::directory_size(directory.country_count(), directory.operator_count());

        Self {
            start_time: Instant::now(),
            healthy: AtomicBool::new(true),
            ready: AtomicBool::new(true),
            lookups_total: AtomicU64::new(0),
            lookups_succeeded: AtomicU64::new(0),
            lookups_failed: AtomicU64::new(0),
            classifier: RwLock::new(Arc::new(classifier)),
            config_path,
            reload_count: AtomicU64::new(0),
        }
    }

    /// Get uptime.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Check if healthy.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    /// Set health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Relaxed);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    /// Set ready status.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }

    /// Get lookups received.
    pub fn lookups_total(&self) -> u64 {
        self.lookups_total.load(Ordering::Relaxed)
    }

    /// Get successful lookups.
    pub fn lookups_succeeded(&self) -> u64 {
        self.lookups_succeeded.load(Ordering::Relaxed)
    }

    /// Get failed lookups.
    pub fn lookups_failed(&self) -> u64 {
        self.lookups_failed.load(Ordering::Relaxed)
    }

    /// Get reload count.
    pub fn reload_count(&self) -> u64 {
        self.reload_count.load(Ordering::Relaxed)
    }

    /// Current classifier snapshot.
    pub async fn classifier(&self) -> Arc<Classifier> {
        self.classifier.read().await.clone()
    }

    /// Classify a number and record the outcome.
    pub async fn lookup(&self, raw: &str) -> Result<ClassificationResult, ClassificationError> {
        let classifier = self.classifier().await;

        let started = Instant::now();
        let outcome = classifier.classify(raw);
        let elapsed = started.elapsed().as_secs_f64();

        self.lookups_total.fetch_add(1, Ordering::Relaxed);
        match &outcome {
            Ok(result) => {
                self.lookups_succeeded.fetch_add(1, Ordering::Relaxed);
                counters::lookup_succeeded(elapsed);
                debug!(
                    country_code = %result.country_code,
                    mno = %result.mno,
                    "lookup succeeded"
                );
            }
            Err(e) => {
                self.lookups_failed.fetch_add(1, Ordering::Relaxed);
                counters::lookup_failed(e.kind(), elapsed);
                debug!(kind = %e.kind(), error = %e, "lookup failed");
            }
        }

        outcome
    }

    /// Rebuild the directory from the config file and swap it in.
    ///
    /// On failure the current directory stays active.
    pub async fn reload_directory(&self) -> Result<ReloadResult, String> {
        let result = self.try_reload().await;
        counters::directory_reloaded(result.is_ok());
        if let Err(ref e) = result {
            warn!(error = %e, "directory reload failed, keeping current directory");
        }
        result
    }

    /// Add a country to the active directory.
    pub async fn add_country(&self, entry: CountryEntry) -> Result<DirectoryChange, DirectoryError> {
        let message = format!("Country {} added", entry.country_code);
        self.update_directory("add_country", message, |dir| dir.with_country(entry))
            .await
    }

    /// Remove a country and all of its operator prefixes.
    pub async fn remove_country(&self, country_code: &str) -> Result<DirectoryChange, DirectoryError> {
        let message = format!("Country {} removed", country_code);
        self.update_directory("remove_country", message, |dir| {
            dir.without_country(country_code)
        })
        .await
    }

    /// Add an operator prefix to the active directory.
    pub async fn add_operator(&self, entry: OperatorEntry) -> Result<DirectoryChange, DirectoryError> {
        let message = format!(
            "Operator prefix {} added for country code {}",
            entry.prefix, entry.country_code
        );
        self.update_directory("add_operator", message, |dir| dir.with_operator(entry))
            .await
    }

    /// Remove one operator prefix.
    pub async fn remove_operator(
        &self,
        country_code: &str,
        prefix: &str,
    ) -> Result<DirectoryChange, DirectoryError> {
        let message = format!(
            "Operator prefix {} removed for country code {}",
            prefix, country_code
        );
        self.update_directory("remove_operator", message, |dir| {
            dir.without_operator(country_code, prefix)
        })
        .await
    }

    /// Build an edited copy of the directory and swap it in.
    ///
    /// The write lock is held for the whole edit so concurrent edits
    /// apply one after another. On failure the current directory stays active.
    async fn update_directory<F>(
        &self,
        operation: &str,
        message: String,
        apply: F,
    ) -> Result<DirectoryChange, DirectoryError>
    where
        F: FnOnce(&PrefixDirectory) -> Result<PrefixDirectory, DirectoryError>,
    {
        let mut current = self.classifier.write().await;

        let directory = match apply(current.directory().as_ref()) {
            Ok(directory) => directory,
            Err(e) => {
                counters::directory_changed(operation, false);
                warn!(operation, error = %e, "directory change rejected");
                return Err(e);
            }
        };

        let countries = directory.country_count();
        let operators = directory.operator_count();
        *current = Arc::new(current.with_directory(Arc::new(directory)));
        drop(current);

        counters::directory_changed(operation, true);
        counters::directory_size(countries, operators);
        info!(operation, countries, operators, "prefix directory changed");

        Ok(DirectoryChange {
            success: true,
            message,
            countries,
            operators,
        })
    }

    async fn try_reload(&self) -> Result<ReloadResult, String> {
        let path = self
            .config_path
            .as_ref()
            .ok_or_else(|| "no config file to reload from".to_string())?;

        info!(path = %path.display(), "reloading prefix directory via API");

        let config = Config::load(path).map_err(|e| format!("failed to load config: {:#}", e))?;
        let directory = config
            .build_directory()
            .map_err(|e| format!("failed to build directory: {:#}", e))?;
        let classifier = Classifier::with_limits(Arc::new(directory), config.classifier)
            .map_err(|e| format!("invalid classifier limits: {}", e))?;

        let countries = classifier.directory().country_count();
        let operators = classifier.directory().operator_count();

        {
            let mut current = self.classifier.write().await;
            *current = Arc::new(classifier);
        }

        let count = self.reload_count.fetch_add(1, Ordering::Relaxed) + 1;
        counters::directory_size(countries, operators);

        info!(
            countries,
            operators,
            reload_count = count,
            "prefix directory reloaded successfully"
        );

        Ok(ReloadResult {
            success: true,
            message: "Directory reloaded successfully".to_string(),
            reload_count: count,
            countries,
            operators,
        })
    }
}

/// Outcome of a runtime directory edit.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DirectoryChange {
    pub success: bool,
    pub message: String,
    pub countries: usize,
    pub operators: usize,
}

/// Result of a directory reload operation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReloadResult {
    pub success: bool,
    pub message: String,
    pub reload_count: u64,
    pub countries: usize,
    pub operators: usize,
}

/// Lookup HTTP server.
pub struct ApiServer {
    state: Arc<ApiState>,
    shutdown: Arc<Shutdown>,
}

impl ApiServer {
    /// Create a new API server.
    pub fn new(state: Arc<ApiState>, shutdown: Arc<Shutdown>) -> Self {
        Self { state, shutdown }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        Router::new()
            // Lookup
            .route("/lookup", post(lookup_handler))
            .route("/api/lookup", post(api_lookup_handler))
            // Directory
            .route("/countries", get(countries_handler).post(add_country_handler))
            .route("/countries/:country_code", delete(remove_country_handler))
            .route("/operators", get(operators_handler).post(add_operator_handler))
            .route(
                "/operators/:country_code/:prefix",
                delete(remove_operator_handler),
            )
            .route("/directory/reload", post(reload_handler))
            // Kubernetes-style health endpoints
            .route("/healthz", get(health_handler))
            .route("/livez", get(live_handler))
            .route("/readyz", get(ready_handler))
            // Metrics and stats
            .route("/stats", get(stats_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(self.state.clone())
    }

    /// Serve on an already bound listener until shutdown.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let router = self.router();
        let shutdown = self.shutdown.clone();

        info!(address = %listener.local_addr()?, "starting lookup server");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                info!("lookup server shutting down");
            })
            .await
    }

    /// Bind `address` and serve until shutdown.
    pub async fn run(self, address: std::net::SocketAddr) -> std::io::Result<()> {
        let listener = TcpListener::bind(address).await?;
        self.serve(listener).await
    }
}
