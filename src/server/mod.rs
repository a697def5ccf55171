//! Badge HTTP server.
//!
//! One tokio task per connection, HTTP/1 only. Every badge request runs the
//! shared [`BadgePipeline`] and answers `200` whether the badge was proxied
//! or rendered locally.

pub mod routes;

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::core::count::NumberFormatter;
use crate::core::http::BadgeFetcher;
use crate::core::params::RequestParams;
use crate::core::pipeline::BadgePipeline;
use crate::core::resolver::DownloadCountResolver;
use crate::error::{BadgeError, Result};

pub use routes::Route;

/// Bind the listening socket.
///
/// # Errors
///
/// Returns error if the address cannot be bound.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| BadgeError::Config(format!("cannot listen on {addr}: {e}")))
}

/// Pause after a failed accept so a persistent error such as fd
/// exhaustion does not spin the loop.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` completes.
///
/// A failed accept is logged and skipped. Connections already accepted are
/// left to finish on their own.
pub async fn serve<F, R, N, S>(listener: TcpListener, pipeline: Arc<BadgePipeline<F, R, N>>, shutdown: S)
where
    F: BadgeFetcher + Send + Sync + 'static,
    R: DownloadCountResolver + Send + Sync + 'static,
    N: NumberFormatter + Send + Sync + 'static,
    S: Future<Output = ()>,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, badge_url = pipeline.badge_base_url(), "Badge server listening");
    }
    tokio::pin!(shutdown);

    loop {
        let accepted = tokio::select! {
            () = &mut shutdown => {
                tracing::info!("Shutdown requested, no longer accepting connections");
                return;
            }
            accepted = listener.accept() => accepted,
        };
        let Some((stream, peer)) = accepted_connection(accepted) else {
            tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            continue;
        };

        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            let service = service_fn(move |req| handle(req, Arc::clone(&pipeline)));
            if let Err(err) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                tracing::debug!(%peer, error = %err, "Connection closed with error");
            }
        });
    }
}

fn accepted_connection<T>(accepted: std::io::Result<T>) -> Option<T> {
    match accepted {
        Ok(conn) => Some(conn),
        Err(err) => {
            tracing::warn!(error = %err, "Accept failed");
            None
        }
    }
}

async fn handle<F, R, N>(
    req: Request<Incoming>,
    pipeline: Arc<BadgePipeline<F, R, N>>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible>
where
    F: BadgeFetcher,
    R: DownloadCountResolver,
    N: NumberFormatter,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = if routes::is_supported_method(&method) {
        match Route::from_path(&path) {
            Route::Health => routes::text(StatusCode::OK, "ok\n"),
            Route::Downloads { gem, version } => {
                let params = RequestParams::parse(req.uri().query());
                let mut body = Vec::new();
                match pipeline
                    .render_gem(&gem, version.as_deref(), params, &mut body)
                    .await
                {
                    Ok(outcome) => routes::badge(&outcome, body, method == Method::HEAD),
                    Err(err) => {
                        tracing::error!(error = %err, "Badge rendering failed");
                        routes::text(StatusCode::INTERNAL_SERVER_ERROR, "internal error\n")
                    }
                }
            }
            Route::NotFound => routes::text(StatusCode::NOT_FOUND, "not found\n"),
        }
    } else {
        routes::method_not_allowed()
    };

    tracing::info!(%method, %path, status = response.status().as_u16(), "Request handled");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn accept_error_is_logged_and_skipped() {
        let failed: io::Result<u8> = Err(io::Error::other("too many open files"));
        assert!(accepted_connection(failed).is_none());
        assert!(logs_contain("Accept failed"));
        assert!(logs_contain("too many open files"));
    }

    #[test]
    fn accepted_connection_passes_through() {
        assert_eq!(accepted_connection(Ok::<_, io::Error>(7)), Some(7));
    }
}
