//! Session and role guard behavior over real HTTP.

#![allow(clippy::unwrap_used)]

use agrizen_integration_tests::{ADMIN_EMAIL, FARMER_EMAIL, PASSWORD, SUPPLIER_EMAIL, TestContext};
use reqwest::StatusCode;

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn unauthenticated_visitors_are_redirected_to_login() {
    let ctx = TestContext::new().await;

    for path in ["/cart", "/checkout", "/orders", "/profile"] {
        let response = ctx.client.get(ctx.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path: {path}");
        assert_eq!(location(&response), "/login", "path: {path}");
    }

    for path in ["/admin/dashboard", "/admin/users", "/supplier/products"] {
        let response = ctx.client.get(ctx.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path: {path}");
        assert_eq!(location(&response), "/login", "path: {path}");
    }
}

#[tokio::test]
async fn wrong_role_is_redirected_home() {
    let ctx = TestContext::new().await;
    let response = ctx.login(FARMER_EMAIL, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // A farmer holds a valid session but is turned away from both
    // dashboards to "/" rather than to the login page.
    for path in ["/admin/dashboard", "/admin/orders", "/supplier/dashboard"] {
        let response = ctx.client.get(ctx.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path: {path}");
        assert_eq!(location(&response), "/", "path: {path}");
    }
}

#[tokio::test]
async fn admin_and_supplier_do_not_cross_over() {
    let ctx = TestContext::new().await;
    let response = ctx.login(ADMIN_EMAIL, PASSWORD).await;
    assert_eq!(location(&response), "/admin/dashboard");

    let response = ctx
        .client
        .get(ctx.url("/supplier/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let ctx = TestContext::new().await;
    let response = ctx.login(SUPPLIER_EMAIL, PASSWORD).await;
    assert_eq!(location(&response), "/supplier/dashboard");

    let response = ctx
        .client
        .get(ctx.url("/admin/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn rejected_login_stays_on_the_page_with_the_server_message() {
    let ctx = TestContext::new().await;
    let response = ctx.login(FARMER_EMAIL, "wrong-password").await;

    // No redirect: the login page re-renders with the backend's message.
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Invalid credentials"));
}

#[tokio::test]
async fn logout_clears_the_session() {
    let ctx = TestContext::new().await;
    ctx.login(FARMER_EMAIL, PASSWORD).await;

    let response = ctx
        .client
        .post(ctx.url("/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = ctx.client.get(ctx.url("/cart")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}
