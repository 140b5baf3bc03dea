use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::openapi::{
    aide::axum::{routing::get_with, ApiRouter, IntoApiResponse},
    Json,
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Health {
    pub message: String,
}

pub fn router() -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/",
            get_with(health_check, |t| {
                t.summary("Health Check")
                    .description("Verify the API is running.")
                    .tag("Health")
            }),
        )
        .api_route(
            "/health",
            get_with(health_check, |t| {
                t.summary("Health Check (alias)")
                    .description("Readiness and liveness probe.")
                    .tag("Health")
            }),
        )
}

async fn health_check() -> impl IntoApiResponse {
    Json(Health {
        message: "Healthy".into(),
    })
}

#[cfg(test)]
mod tests {
    use aide::axum::ApiRouter;

    use super::Health;
    use crate::{errors::Result, Store};

    #[tokio::test]
    async fn health_check() -> Result<()> {
        let server = crate::tests::test_server(Store::default(), |_| ApiRouter::new()).await?;

        for path in ["/", "/health"] {
            let response = server.get(path).await;

            assert_eq!(response.status_code(), 200);
            assert_eq!(response.json::<Health>().message, "Healthy");
        }
        Ok(())
    }
}
