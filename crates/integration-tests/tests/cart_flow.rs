//! End-to-end: guarded cart access, login, cart rendering.

#![allow(clippy::unwrap_used)]

use agrizen_integration_tests::{FARMER_EMAIL, PASSWORD, TestContext};
use reqwest::StatusCode;

#[tokio::test]
async fn cart_requires_login_then_renders_the_users_items() {
    let ctx = TestContext::new().await;

    // Without a session, /cart bounces to the login page.
    let response = ctx.client.get(ctx.url("/cart")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        "/login"
    );

    // Login stores the session and lands the farmer on the home page.
    let response = ctx.login(FARMER_EMAIL, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        "/"
    );

    // /cart now fetches user_id=7 and renders the returned items.
    let response = ctx.client.get(ctx.url("/cart")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();

    assert!(body.contains("Organic Wheat Seed"));
    assert!(body.contains("Drip Irrigation Kit"));
    // Subtotal is the sum of the server-supplied line totals.
    assert!(body.contains("$139.48"));
}

#[tokio::test]
async fn cart_badge_reflects_the_snapshot_count() {
    let ctx = TestContext::new().await;
    ctx.login(FARMER_EMAIL, PASSWORD).await;

    // Visiting the cart mirrors the fetch into the session.
    ctx.client.get(ctx.url("/cart")).send().await.unwrap();

    // Any public page rendered afterwards shows the badge from the
    // snapshot, without re-fetching the cart.
    let response = ctx
        .client
        .get(ctx.url("/marketplace"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains(">2</span>"));
}

#[tokio::test]
async fn order_history_renders_with_parse_guarded_address() {
    let ctx = TestContext::new().await;
    ctx.login(FARMER_EMAIL, PASSWORD).await;

    let response = ctx.client.get(ctx.url("/orders")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();

    assert!(body.contains("Order #31"));
    assert!(body.contains("$139.48"));
    // The serialized shipping address was parsed for display.
    assert!(body.contains("Dhanya Kumar"));
}
