use axum::{
    extract::{Extension, FromRequestParts, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::Store;

#[derive(Clone, Debug, FromRequestParts)]
pub struct BaseParams {
    #[from_request(via(Extension))]
    pub store: Store,
}

impl BaseParams {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Clone, Debug)]
pub struct ReqCtx {
    pub request_id: Option<String>,
}

tokio::task_local! {
    pub static REQ_CTX: ReqCtx;
}

pub async fn with_ctx(headers: HeaderMap, request: Request, next: Next) -> Response {
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    REQ_CTX.scope(ReqCtx { request_id }, next.run(request)).await
}

/// Request id of the request being served, if any.
pub fn request_id() -> Option<String> {
    REQ_CTX.try_with(|ctx| ctx.request_id.clone()).ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_id_is_scoped() {
        assert_eq!(request_id(), None);

        let scoped = REQ_CTX
            .scope(
                ReqCtx {
                    request_id: Some("abc".into()),
                },
                async { request_id() },
            )
            .await;

        assert_eq!(scoped.as_deref(), Some("abc"));
    }
}
