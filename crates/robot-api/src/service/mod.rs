//! Robot API service: router, handlers and server loop.

pub mod coordinator;

pub use coordinator::WifiCoordinator;

use crate::adapters::{CommandSwitchTrigger, FileWifiConfigStore, SysinfoStatsCollector};
use crate::domain::config::ApiConfig;
use crate::domain::error::{codes, ApiError, ApiResult, ServiceError};
use crate::domain::token::ApiToken;
use crate::domain::types::{StatusResponse, SystemStats, WifiRequest, WifiStatus};
use crate::middleware::{create_cors_layer, AuthLayer, TracingLayer};
use crate::ports::StatsCollector;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<WifiCoordinator>,
    pub stats: Arc<dyn StatsCollector>,
}

/// Robot API service
pub struct ApiService {
    config: ApiConfig,
    token: Arc<ApiToken>,
    state: AppState,
}

impl ApiService {
    /// Create a service from explicit collaborators.
    pub fn new(
        config: ApiConfig,
        token: ApiToken,
        coordinator: Arc<WifiCoordinator>,
        stats: Arc<dyn StatsCollector>,
    ) -> Self {
        Self {
            config,
            token: Arc::new(token),
            state: AppState { coordinator, stats },
        }
    }

    /// Create a service wired to the host: file store, switch command, sysinfo.
    pub fn from_config(config: ApiConfig, token: ApiToken) -> Self {
        let store = Arc::new(FileWifiConfigStore::new(&config.wifi_conf_path));
        let trigger = Arc::new(CommandSwitchTrigger::new(config.switch_command.clone()));
        let coordinator = Arc::new(WifiCoordinator::new(store, trigger));
        let stats = Arc::new(SysinfoStatsCollector::new());
        Self::new(config, token, coordinator, stats)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Build the router with the full middleware stack.
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(TracingLayer::new())
            .layer(AuthLayer::new(Arc::clone(&self.token)));

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/wifi", get(get_wifi).post(set_wifi))
            .route("/wifi/clear", post(clear_wifi))
            .route("/stats", get(get_stats))
            .with_state(self.state.clone())
            .layer(RequestBodyLimitLayer::new(self.config.max_body_bytes))
            .layer(middleware);

        match create_cors_layer(&self.config.allowed_origins) {
            Some(cors) => router.layer(cors),
            None => router,
        }
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServiceError> {
        let addr = self.config.bind_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServiceError::Bind { addr, source })
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServiceError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        if let Ok(addr) = listener.local_addr() {
            info!(addr = %addr, "Starting HTTP server");
        }

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServiceError::Serve)?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Run blocking work (file I/O, child processes, sysinfo) off the reactor.
async fn run_blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!(error = %e, "Blocking task failed");
        ApiError::internal(e)
    })
}

async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

async fn get_wifi(State(state): State<AppState>) -> ApiResult<Json<WifiStatus>> {
    let coordinator = Arc::clone(&state.coordinator);
    let current = run_blocking(move || coordinator.current()).await??;
    Ok(Json(WifiStatus::from(current)))
}

async fn set_wifi(
    State(state): State<AppState>,
    payload: Result<Json<WifiRequest>, JsonRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected wifi request body");
        reject_body(&rejection)
    })?;

    let config = request.into_config().map_err(|reason| {
        warn!(reason = %reason, "Invalid wifi request");
        ApiError::invalid_request(reason)
    })?;

    let coordinator = Arc::clone(&state.coordinator);
    run_blocking(move || coordinator.apply_wifi(&config)).await??;
    Ok(Json(StatusResponse::ok()))
}

async fn clear_wifi(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let coordinator = Arc::clone(&state.coordinator);
    run_blocking(move || coordinator.clear_wifi()).await??;
    Ok(Json(StatusResponse::ok()))
}

async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<SystemStats>> {
    let stats = Arc::clone(&state.stats);
    let snapshot = run_blocking(move || stats.snapshot()).await?;
    Ok(Json(snapshot))
}

/// Body extraction failures keep their status (400, 413, 415, 422) with a JSON body.
fn reject_body(rejection: &JsonRejection) -> ApiError {
    let status = rejection.status();
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        return ApiError::invalid_request(rejection.body_text());
    }
    ApiError::new(
        status.as_u16(),
        codes::INVALID_REQUEST,
        rejection.body_text(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FixedStatsCollector, InMemoryWifiConfigStore, SpySwitchTrigger};

    fn state(trigger: Arc<SpySwitchTrigger>) -> AppState {
        AppState {
            coordinator: Arc::new(WifiCoordinator::new(
                Arc::new(InMemoryWifiConfigStore::new()),
                trigger,
            )),
            stats: Arc::new(FixedStatsCollector::default()),
        }
    }

    #[tokio::test]
    async fn test_health_handler() {
        let Json(body) = health_check().await;
        assert_eq!(body, StatusResponse::ok());
    }

    #[tokio::test]
    async fn test_set_then_get_wifi() {
        let state = state(Arc::new(SpySwitchTrigger::new()));
        let request = WifiRequest {
            ssid: "lab".to_string(),
            psk: "secret123".to_string(),
        };

        set_wifi(State(state.clone()), Ok(Json(request))).await.unwrap();
        let Json(status) = get_wifi(State(state)).await.unwrap();

        assert!(status.configured);
        assert_eq!(status.ssid.as_deref(), Some("lab"));
        assert_eq!(status.psk.as_deref(), Some("secret123"));
    }

    #[tokio::test]
    async fn test_invalid_wifi_is_not_applied() {
        let trigger = Arc::new(SpySwitchTrigger::new());
        let state = state(trigger.clone());
        let request = WifiRequest {
            ssid: String::new(),
            psk: "x".to_string(),
        };

        let err = set_wifi(State(state.clone()), Ok(Json(request)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY.as_u16());
        assert_eq!(trigger.calls(), 0);

        let Json(status) = get_wifi(State(state)).await.unwrap();
        assert!(!status.configured);
    }

    #[tokio::test]
    async fn test_trigger_failure_surfaces_as_500() {
        let state = state(Arc::new(SpySwitchTrigger::failing(4)));

        let err = clear_wifi(State(state)).await.unwrap_err();
        assert_eq!(err.status, 500);
        assert_eq!(err.code, codes::TRIGGER_FAILED);
        assert!(err.detail.starts_with("wifi switch failed:"));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = state(Arc::new(SpySwitchTrigger::new()));
        let Json(stats) = get_stats(State(state)).await.unwrap();
        assert_eq!(stats.cpu_count, 4);
    }

    #[tokio::test]
    async fn test_bind_failure_reports_address() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let config = ApiConfig {
            host: "127.0.0.1".parse().unwrap(),
            port,
            ..ApiConfig::default()
        };
        let service = ApiService::new(
            config,
            ApiToken::new("t"),
            state(Arc::new(SpySwitchTrigger::new())).coordinator,
            Arc::new(FixedStatsCollector::default()),
        );

        let err = service.bind().await.unwrap_err();
        assert!(matches!(err, ServiceError::Bind { .. }));
        assert!(err.to_string().contains(&port.to_string()));
    }
}
