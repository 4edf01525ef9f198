mod common;

use reqwest::{Method, StatusCode};
use serde_json::json;

use common::{TestServer, purchase};

async fn buy(client: &reqwest::Client, srv: &TestServer, body: &serde_json::Value) -> serde_json::Value {
    let res = client
        .post(srv.url("/buy/product"))
        .json(body)
        .send()
        .await
        .unwrap();
    if res.status() != StatusCode::OK {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        panic!("expected 200 OK from buy, got {status} body={body}");
    }
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn purchase_lifecycle_buy_lookup_update_list() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Buy
    let bought = buy(
        &client,
        &srv,
        &purchase("amara@example.com", &[("Kettle", 1, 3_500), ("Mug", 4, 600)]),
    )
    .await;
    assert_eq!(bought["status"], "OK");
    assert_eq!(bought["statusCode"], 200);
    let customer_id = bought["data"]["customer"]["id"].as_str().unwrap().to_string();
    let invoice_id = bought["data"]["invoice"]["id"].as_str().unwrap().to_string();
    assert_eq!(bought["data"]["invoice"]["totalAmount"], 3_500 + 4 * 600);
    assert_eq!(bought["data"]["invoice"]["status"], "open");

    // Lookup by id
    let res = client
        .get(srv.url(&format!("/getCustomerInvoiceId/{customer_id}")))
        .header("Authorization", "Bearer token-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let by_id: serde_json::Value = res.json().await.unwrap();
    assert_eq!(by_id["data"]["customer"]["email"], "amara@example.com");
    assert_eq!(by_id["data"]["invoices"][0]["id"], invoice_id.as_str());

    // Update (revises the latest invoice)
    let res = client
        .put(srv.url(&format!("/updateCustomerAndByproduct/{customer_id}")))
        .json(&purchase("amara@example.com", &[("Teapot", 2, 2_000)]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["data"]["invoice"]["id"], invoice_id.as_str());
    assert_eq!(updated["data"]["invoice"]["status"], "revised");
    assert_eq!(updated["data"]["invoice"]["totalAmount"], 4_000);

    // Lookup by email (case-insensitive)
    let res = client
        .get(srv.url("/getCustomerInvoiceEmail/AMARA@example.com"))
        .header("Authorization", "Bearer token-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let by_email: serde_json::Value = res.json().await.unwrap();
    assert_eq!(by_email["data"]["customer"]["id"], customer_id.as_str());
    assert_eq!(by_email["data"]["invoices"][0]["lines"][0]["productName"], "Teapot");

    // List all
    buy(&client, &srv, &purchase("bo@example.com", &[("Spoon", 6, 150)])).await;
    let res = client
        .get(srv.url("/getAllCustomerInvoice"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let all: serde_json::Value = res.json().await.unwrap();
    let entries = all["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["customer"]["id"], customer_id.as_str());
    assert_eq!(entries[1]["customer"]["email"], "bo@example.com");
}

#[tokio::test]
async fn invalid_purchase_is_rejected_before_envelope() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/buy/product"))
        .json(&purchase("not-an-email", &[("Kettle", 1, 3_500)]))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn update_with_malformed_id_is_400() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .put(srv.url("/updateCustomerAndByproduct/not-a-uuid"))
        .json(&purchase("amara@example.com", &[("Kettle", 1, 3_500)]))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn update_of_unknown_customer_is_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .put(srv.url("/updateCustomerAndByproduct/0191d2a4-3c5e-7b6a-9f00-000000000001"))
        .json(&purchase("amara@example.com", &[("Kettle", 1, 3_500)]))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_cannot_steal_another_customers_email() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let amara = buy(&client, &srv, &purchase("amara@example.com", &[("Kettle", 1, 1)])).await;
    buy(&client, &srv, &purchase("bo@example.com", &[("Spoon", 1, 1)])).await;
    let amara_id = amara["data"]["customer"]["id"].as_str().unwrap();

    let res = client
        .put(srv.url(&format!("/updateCustomerAndByproduct/{amara_id}")))
        .json(&purchase("bo@example.com", &[("Kettle", 1, 1)]))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn lookups_require_authorization_header() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in [
        "/getCustomerInvoiceId/0191d2a4-3c5e-7b6a-9f00-000000000001",
        "/getCustomerInvoiceEmail/amara@example.com",
    ] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "path {path}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "missing_header");
    }
}

#[tokio::test]
async fn lookup_of_unknown_customer_is_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/getCustomerInvoiceEmail/ghost@example.com"))
        .header("Authorization", "Bearer token-1")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn transaction_id_is_taken_from_request_headers() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/getAllCustomerInvoice"))
        .header("X-Correlation-Id", "corr-123")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-transaction-id"], "corr-123");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["transactionId"], "corr-123");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .request(Method::OPTIONS, srv.url("/buy/product"))
        .header("Origin", "https://shop.example.org")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.headers()["access-control-max-age"], "3600");
}

#[tokio::test]
async fn repeat_purchase_keeps_stored_customer_details() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let first = buy(&client, &srv, &purchase("amara@example.com", &[("Kettle", 1, 3_500)])).await;
    let customer_id = first["data"]["customer"]["id"].as_str().unwrap().to_string();

    let mut repeat = purchase("Amara@Example.com", &[("Mug", 2, 600)]);
    repeat["name"] = json!("Somebody Else");
    repeat["phone"] = json!("+1-555-0199");
    repeat["address"] = json!("1 Elsewhere Rd");
    let second = buy(&client, &srv, &repeat).await;

    let customer = &second["data"]["customer"];
    assert_eq!(customer["id"], customer_id.as_str());
    assert_eq!(customer["name"], "Amara Okafor");
    assert_eq!(customer["phone"], "+234-555-0101");
    assert!(customer["address"].is_null());

    let res = client
        .get(srv.url(&format!("/getCustomerInvoiceId/{customer_id}")))
        .header("Authorization", "Bearer token-1")
        .send()
        .await
        .unwrap();
    let stored: serde_json::Value = res.json().await.unwrap();
    assert_eq!(stored["data"]["customer"]["name"], "Amara Okafor");
    assert_eq!(stored["data"]["invoices"].as_array().unwrap().len(), 2);
}
