//! Integration tests for Etar.
//!
//! The tests in `tests/` drive the full storefront router in-process via
//! `tower::ServiceExt::oneshot`. The backend URL points at an unroutable
//! address, so any test that passes is also evidence the covered path
//! makes no backend call (a real call would hang or error).

use std::net::{IpAddr, Ipv4Addr};

use secrecy::SecretString;

use etar_storefront::config::{StorefrontConfig, SupabaseConfig};
use etar_storefront::state::AppState;

/// Build a router over an unreachable backend.
#[must_use]
pub fn test_router() -> axum::Router {
    let config = StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        supabase: SupabaseConfig {
            url: "http://127.0.0.1:9".to_string(),
            anon_key: "test-anon-key-test-anon-key".to_string(),
            service_role_key: SecretString::from("test-service-key-test-service-key"),
        },
        sentry_dsn: None,
    };

    etar_storefront::build_router(AppState::new(config))
}
