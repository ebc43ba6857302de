use crate::context::ServerContext;
use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    routing::{get, post},
};
use hyper::{Request, body::Incoming};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server,
};
use log::{error, info};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_service::Service;

mod admin;
mod fixtures;
mod websocket;

fn cors(origin: Option<HeaderValue>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match origin {
        Some(origin) => cors.allow_origin(origin),
        None => cors.allow_origin(Any),
    }
}

pub(crate) fn router(context: ServerContext, cors_origin: Option<HeaderValue>) -> Router {
    Router::new()
        .route(
            "/",
            get(|| async { "XMPP mock server, connect on the XMPP port or upgrade at /xmpp" }),
        )
        .route("/xmpp", get(websocket::upgrade))
        .route("/admin/sessions", get(admin::sessions))
        .route("/admin/{user}/{action}", post(admin::bulk_command))
        .route("/admin/{user}/{contact}/{action}", post(admin::friend_command))
        .route("/fixtures/set", post(fixtures::set))
        .route("/fixtures/reset", post(fixtures::reset))
        .route("/canned/{*key}", get(fixtures::canned))
        .layer(cors(cors_origin))
        .with_state(context)
}

/// Serves the admin side channel with hyper so headers can be served with title case
pub async fn listen(
    listener: TcpListener,
    context: ServerContext,
    cors_origin: Option<HeaderValue>,
) {
    let app = router(context, cors_origin);

    if let Ok(address) = listener.local_addr() {
        info!("HTTP server listening on {address}");
    }

    loop {
        let (socket, _remote_addr) = match listener.accept().await {
            Ok(connection) => connection,
            Err(error) => {
                error!("Could not get socket from accepted HTTP connection: {error}");
                continue;
            }
        };

        let tower_service = app.clone();
        tokio::spawn(async move {
            let socket = TokioIo::new(socket);
            let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                tower_service.clone().call(request)
            });

            let mut builder = server::conn::auto::Builder::new(TokioExecutor::new());
            builder.http1().title_case_headers(true);

            if let Err(err) = builder
                .serve_connection_with_upgrades(socket, hyper_service)
                .await
            {
                error!("Failed to serve connection: {err:#}");
            }
        });
    }
}
