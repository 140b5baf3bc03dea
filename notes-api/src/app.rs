use aide::{openapi::Tag, scalar::Scalar};
use axum::{
    middleware::{self},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::config;

use serde_json::json;

use crate::{
    ctx::with_ctx,
    errors::{on_error, ErrorResponseDocs},
    health,
    openapi::{self, aide::axum::ApiRouter, OpenApi},
    state::AppState,
    store::Store,
};

const TITLE: &str = "Simple Notes API";

pub struct AppParams<Router>
where
    Router: FnOnce(AppState) -> ApiRouter,
{
    pub store: Store,
    pub router: Router,
}

pub fn create<R>(AppParams { store, router }: AppParams<R>) -> (Router, OpenApi)
where
    R: FnOnce(AppState) -> ApiRouter,
{
    let mut api = OpenApi::default();

    let state = AppState { store: store.clone() };

    let docs_router = axum::Router::new()
        .route(
            "/__docs__",
            get(Scalar::new("/__docs__/spec.json").with_title(TITLE).axum_handler()),
        )
        .route("/__docs__/spec.json", get(serve_docs));

    let app = ApiRouter::new()
        .route("/__version__", get(version))
        .merge(docs_router)
        .merge(health::router())
        .merge(router(state))
        .finish_api_with(&mut api, |t| {
            t.title(TITLE)
                .description("A minimal backend that supports creating, viewing, editing, and deleting notes.")
                .version(env!("CARGO_PKG_VERSION"))
                .tag(Tag {
                    name: "Health".into(),
                    description: Some("Health and diagnostics endpoints".into()),
                    ..Default::default()
                })
                .tag(Tag {
                    name: "Notes".into(),
                    description: Some("CRUD operations for managing notes".into()),
                    ..Default::default()
                })
                .default_response::<openapi::Json<ErrorResponseDocs>>()
        })
        .layer(
            ServiceBuilder::new()
                .layer(cors())
                .layer(Extension(store))
                .layer(Extension(Arc::new(api.clone())))
                .layer(middleware::from_fn(with_ctx))
                .layer(middleware::from_fn(on_error)),
        );

    (app, api)
}

// any origin, fine for previews, narrow before exposing publicly
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn version() -> impl IntoResponse {
    let config = &config();
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> Response {
    Json(api.as_ref()).into_response()
}

#[cfg(test)]
mod tests {
    use aide::axum::ApiRouter;
    use axum::http::{HeaderName, HeaderValue};
    use serde_json::Value;

    use crate::{errors::Result, Store};

    #[tokio::test]
    async fn version() -> Result<()> {
        let server = crate::tests::test_server(Store::default(), |_| ApiRouter::new()).await?;

        let response = server.get("/__version__").await;

        assert_eq!(response.status_code(), 200);
        let body = response.json::<Value>();
        assert!(body.get("version").is_some());
        assert!(body.get("commit").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn cors_allows_any_origin() -> Result<()> {
        let server = crate::tests::test_server(Store::default(), |_| ApiRouter::new()).await?;

        let response = server
            .get("/health")
            .add_header(HeaderName::from_static("origin"), HeaderValue::from_static("http://example.com"))
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.header("access-control-allow-origin"), "*");
        Ok(())
    }

    #[test]
    fn openapi_documents_note_routes() {
        let (_, api) = crate::app::create(crate::app::AppParams {
            store: Store::default(),
            router: crate::notes::router,
        });

        let paths = api.paths.expect("paths");
        assert!(paths.paths.contains_key("/notes"));
        assert!(paths.paths.contains_key("/notes/{note_id}"));
        assert!(paths.paths.contains_key("/health"));
    }
}
