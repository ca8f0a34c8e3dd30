use async_trait::async_trait;
use serde_json::Value;

use super::types::StockSnapshot;
use crate::error::FetchError;

/// Source of stock snapshots polled by the monitor.
#[async_trait]
pub trait StockSource: Send + Sync {
    async fn fetch(&self) -> Result<StockSnapshot, FetchError>;
}

/// Plain GET against a fixed endpoint. No parameters, headers or retries.
pub struct HttpStockSource {
    client: reqwest::Client,
    url: String,
}

impl HttpStockSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl StockSource for HttpStockSource {
    async fn fetch(&self) -> Result<StockSnapshot, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body: Value = response.json().await.map_err(FetchError::Parse)?;
        Ok(StockSnapshot::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    #[tokio::test]
    async fn parses_json_body_on_success() {
        let (url, request) = serve_once(
            "200 OK",
            r#"{"normal_stock":{"items":[{"name":"Dragon Fruit"}]}}"#,
        )
        .await;
        let source = HttpStockSource::new(reqwest::Client::new(), url);

        let snapshot = source.fetch().await.unwrap();
        let items = snapshot.section_items("normal_stock").unwrap();
        assert_eq!(items[0].name(), "Dragon Fruit");

        let raw = request.await.unwrap();
        assert!(raw.starts_with("GET / HTTP/1.1"), "{raw}");
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure() {
        let (url, _request) = serve_once("503 Service Unavailable", r#"{"error":"down"}"#).await;
        let source = HttpStockSource::new(reqwest::Client::new(), url);

        let err = source.fetch().await.unwrap_err();
        assert!(
            matches!(err, FetchError::Status(status) if status.as_u16() == 503),
            "{err}"
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_failure() {
        let (url, _request) = serve_once("200 OK", "<html>not json</html>").await;
        let source = HttpStockSource::new(reqwest::Client::new(), url);

        assert!(matches!(source.fetch().await, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        // Bind then drop so the port is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpStockSource::new(reqwest::Client::new(), format!("http://{addr}/"));
        assert!(matches!(source.fetch().await, Err(FetchError::Transport(_))));
    }
}
