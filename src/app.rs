use std::net::SocketAddr;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{ui, users};

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(users::router())
                .route("/health", get(|| async { "ok" })),
        )
        .merge(ui::router())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(error = %e, origin, "invalid CORS_ORIGIN; allowing any origin");
            CorsLayer::permissive()
        }
    }
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

/// Waits for `signal`. If the handler cannot be installed the error is
/// logged and the future never resolves, so shutdown only follows a real signal.
async fn park_on_error<E: std::fmt::Display>(
    signal: impl std::future::Future<Output = Result<(), E>>,
    name: &str,
) {
    if let Err(e) = signal.await {
        tracing::error!(error = %e, signal = name, "failed to listen for signal");
        std::future::pending::<()>().await;
    }
}

async fn shutdown_signal() {
    let ctrl_c = park_on_error(tokio::signal::ctrl_c(), "ctrl-c");

    #[cfg(unix)]
    let terminate = park_on_error(
        async {
            let mut sig =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
            sig.recv().await;
            Ok::<(), std::io::Error>(())
        },
        "SIGTERM",
    );
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
