use std::sync::Arc;
use std::time::Duration;

use dashboard_api::app::{build_app, AppServices};
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use serde_json::Value;

const INVOICES: &str = "/dashboard/invoices";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over the in-memory store, bound to an ephemeral port.
        let services = Arc::new(AppServices::in_memory(INVOICES));
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Redirects are asserted on, not followed.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn list(client: &reqwest::Client, server: &TestServer) -> Vec<Value> {
    let res = client.get(server.url(INVOICES)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    body["items"].as_array().cloned().unwrap_or_default()
}

async fn create(
    client: &reqwest::Client,
    server: &TestServer,
    customer: &str,
    amount: &str,
    status: &str,
) -> reqwest::Response {
    client
        .post(server.url(INVOICES))
        .form(&[("customerId", customer), ("amount", amount), ("status", status)])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;
    let res = client().get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_redirects_and_listing_reflects_new_row() {
    let server = TestServer::spawn().await;
    let client = client();

    // Prime the cached listing so the create has something to invalidate.
    assert!(list(&client, &server).await.is_empty());

    let res = create(&client, &server, "c1", "42.50", "pending").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[LOCATION], INVOICES);

    let items = list(&client, &server).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["customerId"], "c1");
    assert_eq!(items[0]["amount"], 4250);
    assert_eq!(items[0]["status"], "pending");
    assert_eq!(
        items[0]["date"],
        chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
    );
}

#[tokio::test]
async fn update_changes_fields_and_keeps_date() {
    let server = TestServer::spawn().await;
    let client = client();

    create(&client, &server, "c1", "5", "pending").await;
    let before = list(&client, &server).await.remove(0);
    let id = before["id"].as_str().unwrap().to_string();

    let res = client
        .post(server.url(&format!("{INVOICES}/{id}")))
        .form(&[("customerId", "c7"), ("amount", "0.29"), ("status", "paid")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let after: Value = client
        .get(server.url(&format!("{INVOICES}/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after["customerId"], "c7");
    assert_eq!(after["amount"], 29);
    assert_eq!(after["status"], "paid");
    assert_eq!(after["date"], before["date"]);

    // The cached listing was invalidated too.
    assert_eq!(list(&client, &server).await[0]["status"], "paid");
}

#[tokio::test]
async fn delete_nonexistent_is_ok_and_removes_nothing() {
    let server = TestServer::spawn().await;
    let client = client();
    create(&client, &server, "c1", "1", "paid").await;

    let res = client
        .delete(server.url(&format!("{INVOICES}/nonexistent-id")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"status": "ok"}));

    assert_eq!(list(&client, &server).await.len(), 1);
}

#[tokio::test]
async fn post_delete_removes_row() {
    let server = TestServer::spawn().await;
    let client = client();
    create(&client, &server, "c1", "1", "paid").await;
    let id = list(&client, &server).await[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let res = client
        .post(server.url(&format!("{INVOICES}/{id}/delete")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    assert!(list(&client, &server).await.is_empty());
    let missing = client
        .get(server.url(&format!("{INVOICES}/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_status_is_rejected_without_writing() {
    let server = TestServer::spawn().await;
    let client = client();

    let res = create(&client, &server, "c1", "12", "unpaid").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["fields"][0]["field"], "status");

    assert!(list(&client, &server).await.is_empty());
}

#[tokio::test]
async fn update_with_invalid_status_leaves_row_unchanged() {
    let server = TestServer::spawn().await;
    let client = client();
    create(&client, &server, "c1", "5", "pending").await;
    let before = list(&client, &server).await.remove(0);
    let id = before["id"].as_str().unwrap().to_string();

    let res = client
        .post(server.url(&format!("{INVOICES}/{id}")))
        .form(&[("customerId", "c9"), ("amount", "99"), ("status", "unpaid")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["fields"][0]["field"], "status");

    let after: Value = client
        .get(server.url(&format!("{INVOICES}/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after, before);
    assert_eq!(list(&client, &server).await, vec![before]);
}

#[tokio::test]
async fn non_numeric_amount_is_rejected() {
    let server = TestServer::spawn().await;
    let client = client();

    let res = create(&client, &server, "c1", "abc", "paid").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["fields"][0]["field"], "amount");
}

#[tokio::test]
async fn event_stream_announces_invalidations() {
    let server = TestServer::spawn().await;
    let client = client();

    let mut stream = client
        .get(server.url("/dashboard/events"))
        .send()
        .await
        .unwrap();
    assert_eq!(stream.status(), StatusCode::OK);

    create(&client, &server, "c1", "1", "paid").await;

    let mut seen = String::new();
    let read = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(chunk) = stream.chunk().await.unwrap() {
            seen.push_str(&String::from_utf8_lossy(&chunk));
            if seen.contains(INVOICES) {
                break;
            }
        }
    })
    .await;

    assert!(read.is_ok(), "no invalidation event within timeout");
    assert!(seen.contains("event: view.invalidated"));
}
