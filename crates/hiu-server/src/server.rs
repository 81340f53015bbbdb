use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use hiu_cache::LocalCache;
use hiu_gateway::{GatewayClient, HttpGatewayClient, Patient, PatientSearchReply};
use hiu_service::{
    ConsentNotificationApplier, PatientLookupSettings, PatientService, PatientStatusHandler,
};
use hiu_storage::{ConsentRepository, InMemoryConsentRepository};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::{config::AppConfig, handlers};

/// Shared state of the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub patients: Arc<PatientService>,
    pub consents: Arc<ConsentNotificationApplier>,
    pub patient_status: Arc<PatientStatusHandler>,
    pub results: Arc<LocalCache<Patient>>,
    pub replies: Arc<LocalCache<PatientSearchReply>>,
}

impl AppState {
    pub fn new(
        cfg: &AppConfig,
        gateway: Arc<dyn GatewayClient>,
        repository: Arc<dyn ConsentRepository>,
    ) -> Self {
        let results: Arc<LocalCache<Patient>> =
            Arc::new(LocalCache::new("patient-result", cfg.cache.result_ttl()));
        let replies: Arc<LocalCache<PatientSearchReply>> = Arc::new(LocalCache::new(
            "patient-correlation",
            cfg.cache.correlation_ttl(),
        ));

        let patients = PatientService::new(
            gateway.clone(),
            results.clone(),
            replies.clone(),
            PatientLookupSettings {
                hiu_id: cfg.hiu.id.clone(),
                timeout: cfg.gateway_timeout(),
            },
        );
        let patient_status =
            PatientStatusHandler::new(gateway, repository.clone(), results.clone());
        let consents = ConsentNotificationApplier::new(repository);

        Self {
            patients: Arc::new(patients),
            consents: Arc::new(consents),
            patient_status: Arc::new(patient_status),
            results,
            replies,
        }
    }
}

pub fn build_app(cfg: &AppConfig, state: AppState) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        .route("/healthz", get(handlers::healthz))
        // Application surface
        .route("/v1/patients/{id}", get(handlers::find_patient))
        // Gateway callbacks
        .route("/v0.5/patients/on-find", post(handlers::on_find_patient))
        .route("/v0.5/consents/hiu/notify", post(handlers::consent_notify))
        .route(
            "/v0.5/patients/status/notify",
            post(handlers::patient_status_notify),
        )
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

/// Periodically drops expired entries from both caches.
pub fn spawn_cache_cleanup(state: &AppState, every: Duration) -> JoinHandle<()> {
    let results = state.results.clone();
    let replies = state.replies.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = results.cleanup_expired() + replies.cleanup_expired();
            if removed > 0 {
                tracing::debug!(removed, "expired cache entries removed");
            }
        }
    })
}

pub struct HiuServer {
    addr: SocketAddr,
    app: Router,
    cleanup: JoinHandle<()>,
}

pub struct ServerBuilder {
    config: AppConfig,
    gateway: Option<Arc<dyn GatewayClient>>,
    repository: Option<Arc<dyn ConsentRepository>>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            gateway: None,
            repository: None,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    pub fn with_gateway(mut self, gateway: Arc<dyn GatewayClient>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_repository(mut self, repository: Arc<dyn ConsentRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Falls back to the HTTP gateway client and the in-memory repository.
    pub fn build(self) -> HiuServer {
        let cfg = self.config;
        let gateway: Arc<dyn GatewayClient> = match self.gateway {
            Some(gateway) => gateway,
            None => {
                let mut client = HttpGatewayClient::new(cfg.gateway.base_url.clone());
                if let Some(token) = &cfg.gateway.bearer_token {
                    client = client.with_bearer_token(token.clone());
                }
                Arc::new(client)
            }
        };
        let repository: Arc<dyn ConsentRepository> = match self.repository {
            Some(repository) => repository,
            None => Arc::new(InMemoryConsentRepository::new()),
        };

        let state = AppState::new(&cfg, gateway, repository);
        let cleanup = spawn_cache_cleanup(&state, cfg.cache.cleanup_interval());

        HiuServer {
            addr: cfg.addr(),
            app: build_app(&cfg, state),
            cleanup,
        }
    }
}

impl HiuServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        let result = axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await;
        self.cleanup.abort();
        result?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
