mod config;

mod app;
mod ctx;
mod errors;
mod health;
mod notes;
mod openapi;
mod shared;
mod state;
mod store;

use std::net::SocketAddr;

use aide::axum::ApiRouter;
use app::AppParams;
pub use config::config;
pub use errors::{Error, Result};
pub use store::{init_store, Store};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = config::init()?;

    shared::tracing::setup_tracing(config);

    let store = init_store();

    let (app, api) = app::create(AppParams {
        store,
        router: |state| ApiRouter::new().merge(notes::router(state)),
    });
    tracing::debug!(
        paths = api.paths.as_ref().map_or(0, |p| p.paths.len()),
        "openapi document ready at /__docs__"
    );

    let app = shared::tracing::add_tracing_layer(app);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to listen for SIGTERM: {err}");
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

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
pub mod tests {
    use crate::{
        app::{create, AppParams},
        config::config_override,
        errors::{Error, Result},
        state::AppState,
        Store,
    };
    use aide::axum::ApiRouter;
    use axum_test::TestServer;

    pub async fn test_server<R>(store: Store, router: R) -> Result<TestServer>
    where
        R: FnOnce(AppState) -> ApiRouter,
    {
        config_override(|mut config| {
            config.version = "test".into();
            config
        });

        let (app, _) = create(AppParams { store, router });

        TestServer::new(app).map_err(|e| Error::Unexpected(e.to_string()))
    }
}
