mod routes;
mod ui;

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde_json::{Map, Value};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    auth::TokenGate,
    content::{articles::ArticleService, themes::ThemeService, ContentError, ErrorKind},
    storage::Store,
};

pub struct CtxBuilder {
    pub store: Store,
    pub app_password: Option<String>,
    pub static_dir: Option<PathBuf>,
}

impl CtxBuilder {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            app_password: None,
            static_dir: None,
        }
    }

    /// Secret that cookie credentials are verified against.
    pub fn app_password(mut self, password: Option<String>) -> Self {
        self.app_password = password;
        self
    }

    /// Directory served under `/static`, holding the client script.
    pub fn static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    pub fn build(self) -> Ctx {
        if self.app_password.is_none() {
            tracing::warn!("no APP_PASSWORD configured, editing is disabled");
        }

        Ctx {
            themes: ThemeService::new(self.store.clone()),
            articles: ArticleService::new(self.store),
            gate: TokenGate::new(self.app_password),
            static_dir: self.static_dir,
        }
    }
}

/// Server context.
#[derive(Clone)]
pub struct Ctx {
    themes: ThemeService<Store>,
    articles: ArticleService<Store>,
    pub(crate) gate: TokenGate,
    static_dir: Option<PathBuf>,
}

impl Ctx {
    pub async fn run_server(self, port: u16) -> Result<(), anyhow::Error> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        run_server(addr, self).await
    }
}

pub const DEFAULT_PORT: u16 = 3333;

/// Client script unlocked for verified callers.
const CLIENT_SCRIPT: &str = "/static/app.js";

fn build_router(ctx: Ctx) -> Router {
    let static_dir = ctx.static_dir.clone();

    let mut router = Router::new()
        .route("/", get(routes::theme_list::handler_theme_list))
        .route(
            routes::theme_create::PATH_THEMES,
            post(routes::theme_create::handler_theme_create),
        )
        .route(
            "/themes/:theme",
            get(routes::theme_page::handler_theme_page)
                .delete(routes::theme_delete::handler_theme_delete),
        )
        .route(
            "/themes/:theme/articles",
            post(routes::article_create::handler_article_create),
        )
        .route(
            "/themes/:theme/articles/:article",
            get(routes::article_page::handler_article_page)
                .put(routes::article_update::handler_article_update)
                .delete(routes::article_delete::handler_article_delete),
        )
        // API
        .route(
            routes::api_themes::PATH_API_THEMES,
            get(routes::api_themes::handler_api_theme_list),
        )
        .route(
            "/api/themes/:theme",
            get(routes::api_themes::handler_api_theme),
        );

    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .with_state(ctx)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .layer(
            // Graceful shutdown will wait for outstanding requests to complete.
            // Add a timeout so requests don't hang forever.
            tower_http::timeout::TimeoutLayer::new(Duration::from_secs(30)),
        )
}

async fn run_server(addr: SocketAddr, ctx: Ctx) -> Result<(), anyhow::Error> {
    tracing::info!("starting server: {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("could not bind port")?;

    let app = build_router(ctx);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
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

    tracing::info!("received shutdown signal");
}

/// Serialize `fields` into a JSON object; non-objects contribute nothing.
fn object_fields(fields: impl serde::Serialize) -> Map<String, Value> {
    match serde_json::to_value(fields) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Successful JSON reply: echoed request fields plus `msg`.
struct ApiReply {
    status: StatusCode,
    data: Map<String, Value>,
}

impl ApiReply {
    fn new(status: StatusCode) -> Self {
        Self {
            status,
            data: Map::new(),
        }
    }

    fn echo(mut self, fields: impl serde::Serialize) -> Self {
        self.data.extend(object_fields(fields));
        self
    }

    fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    fn msg(self, msg: &str) -> Self {
        self.field("msg", msg)
    }
}

impl axum::response::IntoResponse for ApiReply {
    fn into_response(self) -> axum::response::Response<axum::body::Body> {
        (self.status, axum::Json(Value::Object(self.data))).into_response()
    }
}

/// Failed JSON reply: echoed request fields plus `err`.
struct ApiError {
    message: String,
    status: StatusCode,
    source: Option<anyhow::Error>,
    data: Map<String, Value>,
}

impl ApiError {
    pub fn msg(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
            source: None,
            data: Map::new(),
        }
    }

    fn echo(mut self, fields: impl serde::Serialize) -> Self {
        self.data.extend(object_fields(fields));
        self
    }

    fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(source: anyhow::Error) -> Self {
        Self {
            message: source.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            source: Some(source),
            data: Map::new(),
        }
    }
}

/// Mutation semantics: every domain failure is a 400 with `err`.
impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Store(source) => {
                tracing::error!("store failure: {:#}", source);
                ApiError::from(source)
            }
            other => ApiError::msg(other.to_string(), StatusCode::BAD_REQUEST),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response<axum::body::Body> {
        let mut data = self.data;
        data.insert("err".to_string(), Value::String(self.message));
        if let Some(source) = &self.source {
            data.insert("source".to_string(), Value::String(format!("{:#?}", source)));
        }

        (self.status, axum::Json(Value::Object(data))).into_response()
    }
}

struct HtmlError {
    message: String,
    status: StatusCode,
    source: Option<anyhow::Error>,
}

impl HtmlError {
    pub fn msg(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
            source: None,
        }
    }
}

impl From<anyhow::Error> for HtmlError {
    fn from(source: anyhow::Error) -> Self {
        Self {
            message: source.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            source: Some(source),
        }
    }
}

/// Read semantics: a missing document is a 404.
impl From<ContentError> for HtmlError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Store(source) => {
                tracing::error!("store failure: {:#}", source);
                HtmlError::from(source)
            }
            other if other.kind() == ErrorKind::NotFound => {
                HtmlError::msg("Not found", StatusCode::NOT_FOUND)
            }
            other => HtmlError::msg(other.to_string(), StatusCode::BAD_REQUEST),
        }
    }
}

struct HtmlErrorPage(HtmlError);

impl From<ContentError> for HtmlErrorPage {
    fn from(err: ContentError) -> Self {
        Self(HtmlError::from(err))
    }
}

impl axum::response::IntoResponse for HtmlErrorPage {
    fn into_response(self) -> axum::response::Response<axum::body::Body> {
        let body = crate::server::ui::render_html_error_page(&self.0);

        (
            self.0.status,
            [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

fn theme_page_uri(theme_slug: &str) -> String {
    format!("/themes/{}", theme_slug)
}

fn article_create_uri(theme_slug: &str) -> String {
    format!("/themes/{}/articles", theme_slug)
}

fn article_page_uri(theme_slug: &str, article_slug: &str) -> String {
    format!("/themes/{}/articles/{}", theme_slug, article_slug)
}

#[cfg(test)]
async fn test_client_with_ctx(ctx: Ctx) -> axum_test_helper::TestClient {
    let app = build_router(ctx);
    axum_test_helper::TestClient::new(app).await
}

#[cfg(test)]
const TEST_PASSWORD: &str = "test-password";

#[cfg(test)]
async fn test_client() -> (axum_test_helper::TestClient, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("could not create tmp dir for storage");
    let fs =
        crate::storage::fs::FsStore::new(dir.path().to_owned()).expect("could not create FsStore");

    let ctx = CtxBuilder::new(Store::Fs(fs))
        .app_password(Some(TEST_PASSWORD.to_string()))
        .build();

    let client = test_client_with_ctx(ctx).await;
    (client, dir)
}

/// A `Cookie` header value carrying a valid credential for [`TEST_PASSWORD`].
#[cfg(test)]
fn test_credential_cookie() -> String {
    let credential = TokenGate::new(Some(TEST_PASSWORD.to_string()))
        .issue()
        .expect("could not issue credential");
    format!("{}={}", crate::auth::CREDENTIAL_COOKIE, credential)
}

/// How cercis writes `value` into rendered markup.
#[cfg(test)]
fn escaped(value: &str) -> String {
    value.replace('/', "&#x2F;")
}
