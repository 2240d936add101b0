use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::main_lib::AppState;
use crate::models::{ProviderInfo, ProvidersResponse};

/// Get the list of available providers.
async fn get_providers(State(state): State<Arc<AppState>>) -> Json<ProvidersResponse> {
    let providers: BTreeMap<String, ProviderInfo> = state
        .registry
        .descriptors()
        .into_iter()
        .map(|descriptor| {
            (
                descriptor.id.to_string(),
                ProviderInfo {
                    name: descriptor.display_name.to_string(),
                    requires_key: descriptor.requires_credential,
                    supports_historical: descriptor.supports_historical,
                },
            )
        })
        .collect();

    Json(ProvidersResponse {
        providers,
        default_provider: state.registry.default_id().to_string(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/providers", get(get_providers))
}
