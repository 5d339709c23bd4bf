//! The dashboard server.
//!
//! Serves the embedded dashboard assets and answers every other GET path as
//! a SQL query against the loaded tables, as JSON the dashboard renders.

use crate::common::{SERVER, sanitise};
use crate::config::rt::RtcServe;
use crate::database::{self, Database};
use crate::sql;
use anyhow::{Context, Result};
use axum::Router;
use axum::http::header::{CONTENT_TYPE, HeaderName};
use axum::http::{HeaderValue, Uri};
use axum::response::{Html, IntoResponse, Json};
use axum::routing::get;
use axum_server::Handle;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const MAIN_JS: &str = include_str!("../../assets/main.js");
const STYLE_CSS: &str = include_str!("../../assets/style.css");

/// A system encapsulating the loaded tables, responsible for serving the
/// dashboard and its query endpoint.
pub struct ServeSystem {
    cfg: Arc<RtcServe>,
    database: Arc<Database>,
    http_addr: String,
    shutdown_tx: broadcast::Sender<()>,
}

impl ServeSystem {
    /// Construct a new instance, loading the tables eagerly so a bad data
    /// directory fails at startup rather than on the first query.
    pub fn new(cfg: Arc<RtcServe>, shutdown: broadcast::Sender<()>) -> Result<Self> {
        let database = Arc::new(database::load_dir(&cfg.core.data_dir)?);
        let http_addr = cfg.http_addr();
        Ok(Self {
            cfg,
            database,
            http_addr,
            shutdown_tx: shutdown,
        })
    }

    /// Run the serve system.
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn run(self) -> Result<()> {
        let server_handle = Self::spawn_server(
            self.cfg.clone(),
            self.database,
            self.shutdown_tx.subscribe(),
        )?;

        // Open the browser.
        if self.cfg.open {
            if let Err(err) = open::that(&self.http_addr) {
                tracing::error!(error = ?err, "error opening browser");
            }
        }
        drop(self.shutdown_tx); // Drop the broadcast channel to ensure it does not keep the system alive.

        match server_handle.await {
            Err(err) => {
                tracing::error!(error = ?err, "error joining server handle");
                Err(err.into())
            }
            Ok(result) => result,
        }
    }

    #[tracing::instrument(level = "trace", skip(cfg, database, shutdown_rx))]
    fn spawn_server(
        cfg: Arc<RtcServe>,
        database: Arc<Database>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<JoinHandle<Result<()>>> {
        let state = Arc::new(State { database });
        let router = router(state, &cfg)?;
        let addr = cfg.socket_addr();

        tracing::info!("{} server listening at {}", SERVER, cfg.http_addr());
        Ok(tokio::spawn(async move {
            match run_server(addr, router, shutdown_rx).await {
                Err(err) => {
                    tracing::error!(error = ?err, "error from server task");
                    Err(err)
                }
                r => r,
            }
        }))
    }
}

async fn run_server(
    addr: std::net::SocketAddr,
    router: Router,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    // Build a shutdown signal for the axum server.
    let shutdown_handle = Handle::new();

    let shutdown = |handle: Handle| async move {
        // Any event on this channel, even a drop, should trigger shutdown.
        let _res = shutdown_rx.recv().await;
        tracing::debug!("server is shutting down");
        handle.graceful_shutdown(Some(Duration::from_secs(0)));
    };

    tokio::spawn(shutdown(shutdown_handle.clone()));

    axum_server::bind(addr)
        .handle(shutdown_handle)
        .serve(router.into_make_service())
        .await
        .context("error running server")
}

/// Server state.
pub struct State {
    /// The loaded tables.
    pub database: Arc<Database>,
}

/// Build the csvql router: the embedded dashboard assets plus the query
/// fallback.
fn router(state: Arc<State>, cfg: &RtcServe) -> Result<Router> {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/main.js", get(script))
        .route("/style.css", get(style))
        .fallback(query)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    for (key, value) in &cfg.headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .with_context(|| format!("invalid header {:?}", key))?;
        let value: HeaderValue = value
            .parse()
            .with_context(|| format!("invalid header value {:?} for header {}", value, name))?;
        router = router.layer(SetResponseHeaderLayer::overriding(name, value));
    }

    Ok(router)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn script() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/javascript; charset=utf-8")],
        MAIN_JS,
    )
}

async fn style() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

/// Any other path is a query. Engine diagnostics ride back in the reply's
/// messages with a `200`, never as HTTP errors.
async fn query(
    state: axum::extract::State<Arc<State>>,
    uri: Uri,
) -> Json<sql::Reply> {
    let query = sanitise(uri.path());
    tracing::debug!(query, "running query");
    Json(sql::run(&query, &state.database))
}
