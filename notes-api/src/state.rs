use axum::extract::FromRef;

use crate::store::Store;

#[derive(FromRef, Clone)]
pub struct AppState {
    pub store: Store,
}
