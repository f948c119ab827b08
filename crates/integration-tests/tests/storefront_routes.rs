//! Route-level tests for the storefront: health, auth gating, language
//! switching, and pages that must render without a reachable backend.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use etar_integration_tests::test_router;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let response = test_router().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_fails_without_backend() {
    let response = test_router().oneshot(get("/health/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn home_renders_without_backend() {
    // The trending strip degrades to empty; the page itself must render.
    let response = test_router().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn account_redirects_anonymous_visitors_to_login() {
    let response = test_router().oneshot(get("/account")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login"
    );
}

#[tokio::test]
async fn checkout_post_requires_login_before_any_validation() {
    let request = Request::builder()
        .method("POST")
        .uri("/checkout")
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(
            "governorate=Cairo&city=Nasr+City&street=5+Makram+Ebeid",
        ))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login"
    );
}

#[tokio::test]
async fn customize_post_requires_login() {
    let request = Request::builder()
        .method("POST")
        .uri("/customize")
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=XBOUNDARY",
        )
        .body(Body::from("--XBOUNDARY--\r\n"))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login"
    );
}

#[tokio::test]
async fn customize_preview_requires_login() {
    let request = Request::builder()
        .method("POST")
        .uri("/customize/preview")
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=XBOUNDARY",
        )
        .body(Body::from("--XBOUNDARY--\r\n"))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login"
    );
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let response = test_router()
        .oneshot(get("/category/furniture"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_page_shows_fee_for_selected_governorate() {
    let response = test_router()
        .oneshot(get("/checkout?governorate=Alexandria"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("60 EGP"), "fee line missing: {html}");
}

#[tokio::test]
async fn checkout_page_defaults_unknown_governorate_fee() {
    let response = test_router()
        .oneshot(get("/checkout?governorate=Aswan"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("80 EGP"), "default fee missing: {html}");
}

#[tokio::test]
async fn lang_switch_sets_session_cookie_and_redirects_back() {
    let response = test_router().oneshot(get("/lang/en")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    assert!(
        response.headers().contains_key(header::SET_COOKIE),
        "locale change must persist in the session"
    );
}

#[tokio::test]
async fn lang_switch_ignores_offsite_referer() {
    // An attacker-supplied Referer must not turn the switch into an
    // off-site redirect.
    let request = Request::builder()
        .uri("/lang/en")
        .header(header::REFERER, "https://evil.example/phishing")
        .body(Body::empty())
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn lang_switch_keeps_local_referer_path() {
    let request = Request::builder()
        .uri("/lang/en")
        .header(header::REFERER, "/explore")
        .body(Body::empty())
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/explore"
    );
}

#[tokio::test]
async fn default_page_renders_arabic_rtl() {
    let response = test_router().oneshot(get("/cart")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains(r#"lang="ar""#));
    assert!(html.contains(r#"dir="rtl""#));
}

#[tokio::test]
async fn register_rejects_bad_phone_before_contacting_backend() {
    // Backend is unroutable; an immediate redirect proves the phone check
    // ran first.
    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(
            "name=Nour&email=nour%40example.com&password=secret123&phone1=12345",
        ))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/register?error=phone1_invalid"
    );
}

#[tokio::test]
async fn register_rejects_bad_second_phone_before_contacting_backend() {
    // phone1 is valid; the optional phone2 must still pass the same shape
    // check before any backend call.
    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(
            "name=Nour&email=nour%40example.com&password=secret123&phone1=01012345678&phone2=12345",
        ))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/register?error=phone2_invalid"
    );
}

#[tokio::test]
async fn login_page_renders_flash_from_query() {
    let response = test_router()
        .oneshot(get("/auth/login?error=invalid_credentials"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("flash-error"));
}
