//! Supplier product scoping: the panel shows only records whose owning
//! user matches the session, even though the raw backend response
//! includes another supplier's products.

#![allow(clippy::unwrap_used)]

use agrizen_integration_tests::{PASSWORD, SUPPLIER_EMAIL, TestContext};
use reqwest::StatusCode;

#[tokio::test]
async fn supplier_sees_only_their_own_products() {
    let ctx = TestContext::new().await;
    ctx.login(SUPPLIER_EMAIL, PASSWORD).await;

    let response = ctx
        .client
        .get(ctx.url("/supplier/products"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();

    // The stub returns three products, one owned by user 99.
    assert!(body.contains("My Seeds"));
    assert!(body.contains("My Fertilizer"));
    assert!(!body.contains("Someone Else"));
}

#[tokio::test]
async fn supplier_dashboard_counts_scoped_products() {
    let ctx = TestContext::new().await;
    ctx.login(SUPPLIER_EMAIL, PASSWORD).await;

    let response = ctx
        .client
        .get(ctx.url("/supplier/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();

    // Two owned products, one of them active.
    assert!(body.contains("My Products"));
    assert!(body.contains("Active Listings"));
}
