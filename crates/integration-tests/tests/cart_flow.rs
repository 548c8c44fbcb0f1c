//! End-to-end cart page flows over HTTP.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use reqwest::header::{LOCATION, REFERER};
use serde_json::json;

use tote_core::{CartItem, CartOwner};
use tote_integration_tests::{TestContext, email, line, row_ids};
use tote_storefront::cart::CartStore;

const KIM: &str = "kim@shop.kr";

fn kim_lines(n: i64) -> Vec<CartItem> {
    (1..=n).map(|id| line(id, "tea", KIM, 1_000, 1)).collect()
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::spawn(Vec::new()).await;
    let resp = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_empty_cart_shows_empty_state() {
    let ctx = TestContext::spawn(vec![line(1, "tea", KIM, 1_000, 1)]).await;
    let (status, body) = ctx.get_json("/cart").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["owner"], "guest");
    assert_eq!(body["page"]["isEmpty"], true);
    assert_eq!(body["page"]["totalPages"], 0);
    assert_eq!(body["page"]["pageButtons"], json!([]));
    assert_eq!(body["page"]["totalPriceDisplay"], "0 원");
}

#[tokio::test]
async fn test_projection_dedupes_and_totals_every_page() {
    let mut items = vec![
        line(1, "tea", "guest", 1_000, 1),
        line(2, "tea", "guest", 2_000, 1),
        line(1, "tea", "guest", 1_000, 3),
        line(9, "tea", KIM, 50_000, 1),
    ];
    items.extend((3..=6).map(|id| line(id, "cup", "guest", 500, 2)));
    let ctx = TestContext::spawn(items).await;

    let (_, body) = ctx.get_json("/cart").await;
    assert_eq!(row_ids(&body), vec![1, 2, 3, 4]);
    assert_eq!(body["page"]["rows"][0]["count"], 3);
    assert_eq!(body["page"]["itemCount"], 6);
    assert_eq!(body["page"]["totalPages"], 2);
    // 3 * 1,000 + 2,000 + 4 * (2 * 500)
    assert_eq!(body["page"]["totalPriceDisplay"], "9,000 원");
}

#[tokio::test]
async fn test_page_navigation_and_scroll_effects() {
    let ctx = TestContext::spawn(kim_lines(5)).await;
    ctx.login(KIM).await;

    let body = ctx.post_json("/cart/page/2", &[]).await;
    assert_eq!(row_ids(&body), vec![5]);
    assert_eq!(body["effects"], json!([{"type": "scrollToTop"}]));
    assert_eq!(body["page"]["nextDisabled"], true);
    assert_eq!(body["page"]["prevDisabled"], false);

    let body = ctx.post_json("/cart/next", &[]).await;
    assert_eq!(body["page"]["currentPage"], 2);
    assert_eq!(body["effects"], json!([]));

    let body = ctx.post_json("/cart/prev", &[]).await;
    assert_eq!(body["page"]["currentPage"], 1);

    let (status, _) = ctx.post("/cart/page/3", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_select_all_only_covers_current_page() {
    let ctx = TestContext::spawn(kim_lines(6)).await;
    ctx.login(KIM).await;

    let body = ctx.post_json("/cart/select-all", &[]).await;
    assert_eq!(body["page"]["selectAllChecked"], true);
    assert_eq!(body["page"]["selectedCount"], 4);

    let body = ctx.post_json("/cart/next", &[]).await;
    assert_eq!(body["page"]["selectAllChecked"], false);
    assert_eq!(body["page"]["rows"][0]["selected"], false);

    let body = ctx.post_json("/cart/prev", &[]).await;
    assert_eq!(body["page"]["selectAllChecked"], true);
    let body = ctx.post_json("/cart/select-all", &[]).await;
    assert_eq!(body["page"]["selectedCount"], 0);
}

#[tokio::test]
async fn test_bulk_delete_clamps_current_page() {
    let ctx = TestContext::spawn(kim_lines(5)).await;
    ctx.login(KIM).await;

    ctx.post_json("/cart/select", &[("id", "1"), ("category", "tea")])
        .await;
    ctx.post_json("/cart/select", &[("id", "2"), ("category", "tea")])
        .await;
    ctx.post_json("/cart/page/2", &[]).await;

    let body = ctx.post_json("/cart/bulk-delete", &[]).await;
    assert_eq!(body["page"]["modal"]["kind"], "confirmBulkDelete");
    assert_eq!(body["page"]["modal"]["items"].as_array().unwrap().len(), 2);

    let body = ctx.post_json("/cart/bulk-delete/confirm", &[]).await;
    assert_eq!(row_ids(&body), vec![3, 4, 5]);
    assert_eq!(body["page"]["currentPage"], 1);
    assert_eq!(body["page"]["totalPages"], 1);
    assert_eq!(body["page"]["selectedCount"], 0);
    assert_eq!(body["page"]["modal"], serde_json::Value::Null);
    assert_eq!(ctx.store.items().unwrap().len(), 3);
}

#[tokio::test]
async fn test_single_delete_flow() {
    let ctx = TestContext::spawn(kim_lines(2)).await;
    ctx.login(KIM).await;

    let body = ctx
        .post_json("/cart/delete", &[("id", "2"), ("category", "tea")])
        .await;
    assert_eq!(body["page"]["modal"]["kind"], "confirmDelete");
    assert_eq!(body["page"]["modal"]["item"]["id"], 2);

    let body = ctx.post_json("/cart/delete/confirm", &[]).await;
    assert_eq!(row_ids(&body), vec![1]);

    let (status, _) = ctx.post("/cart/delete/confirm", &[]).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancel_keeps_item() {
    let ctx = TestContext::spawn(kim_lines(1)).await;
    ctx.login(KIM).await;

    ctx.post_json("/cart/delete", &[("id", "1"), ("category", "tea")])
        .await;
    let body = ctx.post_json("/cart/modal/close", &[]).await;
    assert_eq!(body["page"]["modal"], serde_json::Value::Null);
    assert_eq!(row_ids(&body), vec![1]);
}

#[tokio::test]
async fn test_detail_dialog() {
    let ctx = TestContext::spawn(kim_lines(1)).await;
    ctx.login(KIM).await;

    let body = ctx
        .post_json("/cart/detail", &[("id", "1"), ("category", "tea")])
        .await;
    assert_eq!(body["page"]["modal"]["kind"], "detail");
    assert_eq!(body["page"]["modal"]["item"]["title"], "tea 1");
}

#[tokio::test]
async fn test_foreign_item_is_not_found() {
    let ctx = TestContext::spawn(vec![line(1, "tea", "lee@shop.kr", 100, 1)]).await;
    ctx.login(KIM).await;

    let (status, _) = ctx
        .post("/cart/select", &[("id", "1"), ("category", "tea")])
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = ctx
        .post("/cart/delete", &[("id", "1"), ("category", "tea")])
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_migrates_guest_cart() {
    let ctx = TestContext::spawn(vec![
        line(1, "tea", "guest", 1_000, 2),
        line(2, "cup", "guest", 3_000, 1),
    ])
    .await;

    let (_, body) = ctx.get_json("/cart").await;
    assert_eq!(row_ids(&body), vec![1, 2]);

    ctx.login(KIM).await;
    let (_, body) = ctx.get_json("/cart").await;
    assert_eq!(body["page"]["owner"], KIM);
    assert_eq!(row_ids(&body), vec![1, 2]);

    let items = ctx.store.items().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.owner == CartOwner::User(email(KIM))));
}

#[tokio::test]
async fn test_guest_carts_are_private_to_each_session() {
    const LEE: &str = "lee@shop.kr";
    let a = TestContext::spawn(vec![
        line(1, "tea", "guest", 1_000, 1),
        line(2, "cup", "guest", 3_000, 1),
    ])
    .await;
    let b = a.new_visitor();

    a.post_json("/cart/delete", &[("id", "1"), ("category", "tea")])
        .await;
    let body = a.post_json("/cart/delete/confirm", &[]).await;
    assert_eq!(row_ids(&body), vec![2]);

    let (_, body) = b.get_json("/cart").await;
    assert_eq!(row_ids(&body), vec![1, 2]);

    b.login(LEE).await;
    let (_, body) = b.get_json("/cart").await;
    assert_eq!(body["page"]["owner"], LEE);
    assert_eq!(row_ids(&body), vec![1, 2]);

    let (_, body) = a.get_json("/cart").await;
    assert_eq!(body["page"]["owner"], "guest");
    assert_eq!(row_ids(&body), vec![2]);

    a.login(KIM).await;
    let (_, body) = a.get_json("/cart").await;
    assert_eq!(row_ids(&body), vec![2]);

    let owners: Vec<CartOwner> = a.store.items().unwrap().into_iter().map(|item| item.owner).collect();
    assert_eq!(
        owners,
        vec![
            CartOwner::User(email(LEE)),
            CartOwner::User(email(LEE)),
            CartOwner::User(email(KIM)),
        ]
    );
}

#[tokio::test]
async fn test_login_rejects_invalid_email() {
    let ctx = TestContext::spawn(Vec::new()).await;
    let (status, _) = ctx.post("/auth/session", &[("email", "not-an-email")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_returns_to_guest_cart() {
    let ctx = TestContext::spawn(vec![
        line(1, "tea", KIM, 1_000, 1),
        line(2, "tea", "guest", 1_000, 1),
    ])
    .await;
    ctx.login(KIM).await;
    ctx.post("/auth/session/logout", &[]).await;

    let (_, body) = ctx.get_json("/cart").await;
    assert_eq!(body["page"]["owner"], "guest");
    assert_eq!(row_ids(&body), vec![2]);
}

#[tokio::test]
async fn test_checkout_redirects_to_payment() {
    let ctx = TestContext::spawn(kim_lines(1)).await;
    let resp = ctx.client.get(ctx.url("/checkout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/order/payment");
}

#[tokio::test]
async fn test_back_redirects_to_same_site_referrer() {
    let ctx = TestContext::spawn(Vec::new()).await;

    let resp = ctx
        .client
        .get(ctx.url("/cart/back"))
        .header(REFERER, ctx.url("/products/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/products/7");

    let resp = ctx
        .client
        .get(ctx.url("/cart/back"))
        .header(REFERER, "https://elsewhere.example/")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()[LOCATION], "/");
}
