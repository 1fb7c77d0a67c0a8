use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    serve::Serve,
    Json, Router,
};

use color_eyre::eyre::{eyre, Result};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{error::Error, sync::Arc};
use tokio::signal;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::Level;

use domain::{LedgerAPIError, LifecycleError, Member};
pub mod routes;
use crate::utils::tracing::*;
use routes::{
    board, get_state,
    tasks::{approve, complete, create_task, pledge},
};
pub mod app_state;
pub mod domain;
pub mod services;
use app_state::{AppState, LedgerStoreType};
use services::data_stores::{HashmapLedgerStore, PostgresLedgerStore};
pub mod utils;
use utils::constants::{prod, DATABASE_URL, STARTER_MEMBERS};

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for LedgerAPIError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            LedgerAPIError::LifecycleError(lifecycle_error) => {
                log_error_chain(&self, Level::DEBUG);
                lifecycle_response(lifecycle_error)
            }
            LedgerAPIError::ValidationError(message) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, message.as_ref().to_owned())
            }
            LedgerAPIError::MalformedBody(rejection) => {
                log_error_chain(&self, Level::DEBUG);
                (rejection.status(), "Malformed request body".to_string())
            }
            LedgerAPIError::MalformedTaskId(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, "Invalid task".to_string())
            }
            LedgerAPIError::MalformedQuery(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, "Malformed query string".to_string())
            }
            LedgerAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
        });
        (status, body).into_response()
    }
}

fn lifecycle_response(error: &LifecycleError) -> (StatusCode, String) {
    match error {
        LifecycleError::CreatorNotFound(_) => {
            (StatusCode::BAD_REQUEST, "Creator not found".to_string())
        }
        LifecycleError::MemberNotFound(_) => {
            (StatusCode::BAD_REQUEST, "Member not found".to_string())
        }
        LifecycleError::Forbidden => {
            (StatusCode::FORBIDDEN, "Only creator can approve".to_string())
        }
        e => (StatusCode::BAD_REQUEST, e.to_string()),
    }
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

pub struct Application {
    server: Serve<Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(
        app_state: AppState,
        address: &str,
        allowed_origins: &[String],
    ) -> Result<Self> {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_origin(parse_allowed_origins(allowed_origins)?);

        let router = Router::new()
            .route("/", get(board))
            .route("/api/state", get(get_state))
            .route("/api/tasks", post(create_task))
            .route("/api/tasks/:id/pledge", post(pledge))
            .route("/api/tasks/:id/approve", post(approve))
            .route("/api/tasks/:id/complete", post(complete))
            .with_state(app_state)
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            );

        let listener = tokio::net::TcpListener::bind(address).await?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Application { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

/// `*` anywhere in the list allows every origin.
fn parse_allowed_origins(allowed_origins: &[String]) -> Result<AllowOrigin> {
    if allowed_origins.iter().any(|origin| origin == "*") {
        return Ok(AllowOrigin::any());
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AllowOrigin::list(origins))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(prod::MAX_DB_CONNECTIONS)
        .connect(url.expose_secret())
        .await
}

/// PostgreSQL when `DATABASE_URL` is set (migrations are applied first),
/// otherwise an in-memory ledger that lives as long as the process.
pub async fn configure_ledger_store() -> Result<LedgerStoreType> {
    match DATABASE_URL.as_ref() {
        Some(url) => {
            let pool = get_postgres_pool(url).await?;
            sqlx::migrate!().run(&pool).await?;
            tracing::info!("using PostgreSQL ledger store");
            Ok(Arc::new(PostgresLedgerStore::new(pool)))
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set, using in-memory ledger store; state is lost on exit"
            );
            Ok(Arc::new(HashmapLedgerStore::new()))
        }
    }
}

pub fn starter_members() -> Result<Vec<Member>> {
    STARTER_MEMBERS
        .iter()
        .map(|(id, name, credits)| -> Result<Member> {
            Ok(Member::new(
                domain::MemberId::parse(*id)?,
                domain::MemberName::parse((*name).to_owned())?,
                domain::Credits::parse(*credits)?,
            ))
        })
        .collect()
}

pub async fn seed_starter_members(store: &LedgerStoreType) -> Result<()> {
    store
        .seed_members(&starter_members()?)
        .await
        .map_err(|e| eyre!(e))
}
