#![allow(dead_code)]

use std::sync::Arc;

use shopdesk_api::app::{self, services::AppServices};
use shopdesk_api::config::ApiConfig;

pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Default collaborators (in-memory invoice book).
    pub async fn spawn() -> Self {
        Self::spawn_with(AppServices::in_memory()).await
    }

    /// Same router as prod, but bound to an ephemeral port.
    pub async fn spawn_with(services: AppServices) -> Self {
        let app = app::build_app_with(Arc::new(services), &ApiConfig::default());
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

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/invoice{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn purchase(email: &str, products: &[(&str, u32, u64)]) -> serde_json::Value {
    serde_json::json!({
        "name": "Amara Okafor",
        "email": email,
        "phone": "+234-555-0101",
        "products": products
            .iter()
            .map(|(name, quantity, unit_price)| serde_json::json!({
                "productName": name,
                "quantity": quantity,
                "unitPrice": unit_price,
            }))
            .collect::<Vec<_>>(),
    })
}
