// src/fetch/mod.rs
//! Client for the external forecasting/recommendation service.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

pub mod types;

use types::Reply;
pub use types::{Forecast, ForecastRequest, Metrics, Recommendation, Recommendations};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The service answered with `{"error": ...}`.
    #[error("analytics service: {0}")]
    Service(String),
    #[error("analytics service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request to analytics service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed analytics reply: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid analytics URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    client: Client,
    base: Url,
}

impl AnalyticsClient {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, AnalyticsError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base))
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    /// `POST /forecast` for the next `days` days.
    #[instrument(level = "info", skip(self), fields(base = %self.base))]
    pub async fn forecast(&self, days: u32) -> Result<Forecast, AnalyticsError> {
        let url = self.base.join("forecast")?;
        debug!(%url, "requesting forecast");
        let resp = self
            .client
            .post(url)
            .json(&ForecastRequest { days })
            .send()
            .await?;
        read_reply(resp).await
    }

    /// `GET /recommendations`.
    #[instrument(level = "info", skip(self), fields(base = %self.base))]
    pub async fn recommendations(&self) -> Result<Vec<Recommendation>, AnalyticsError> {
        let url = self.base.join("recommendations")?;
        debug!(%url, "requesting recommendations");
        let resp = self.client.get(url).send().await?;
        let recs: Recommendations = read_reply(resp).await?;
        Ok(recs.recommendations)
    }
}

async fn read_reply<T: DeserializeOwned>(resp: Response) -> Result<T, AnalyticsError> {
    let status = resp.status();
    let body = resp.text().await?;
    match (serde_json::from_str::<Reply<T>>(&body), status.is_success()) {
        // the service reports "No dataset loaded" and model failures this way, with 4xx/5xx
        (Ok(Reply::Failure { error }), _) => {
            warn!(status = status.as_u16(), %error, "analytics service reported an error");
            Err(AnalyticsError::Service(error))
        }
        (Ok(Reply::Success(value)), true) => Ok(value),
        (_, false) => Err(AnalyticsError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        }),
        // re-parse as the bare payload for an error that names the bad field
        (Err(_), true) => Err(match serde_json::from_str::<T>(&body) {
            Err(e) => AnalyticsError::Decode(e),
            Ok(_) => AnalyticsError::Service("unrecognised reply".into()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };

    /// Serve exactly one HTTP response on a random local port and hand back
    /// the raw request that was received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let request = read_request(&mut sock).await;
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            let _ = sock.shutdown().await;
            request
        });
        (Url::parse(&format!("http://{}/", addr)).unwrap(), handle)
    }

    async fn read_request(sock: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client(base: Url) -> AnalyticsClient {
        AnalyticsClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn forecast_success() {
        let body = r#"{"history":{"2024-03-02":4.5,"2024-03-01":4.0},"forecast":{"2024-03-03":5.1},"metrics":{"MAE":0.4,"RMSE":0.5,"MAPE (%)":8.25},"message":"Forecast generated for next 1 days."}"#;
        let (base, server) = serve_once("200 OK", body).await;

        let fc = client(base).forecast(1).await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /forecast "));
        assert!(request.contains(r#"{"days":1}"#));

        let history: Vec<_> = fc.history.keys().cloned().collect();
        assert_eq!(history, vec!["2024-03-02", "2024-03-01"]);
        assert_eq!(fc.forecast["2024-03-03"], 5.1);
        assert_eq!(fc.metrics.mape_pct, Some(8.25));
        assert_eq!(fc.message, "Forecast generated for next 1 days.");
    }

    #[tokio::test]
    async fn forecast_without_metrics() {
        let body = r#"{"history":{},"forecast":{"2024-03-03":5.1},"metrics":{},"message":"ok"}"#;
        let (base, _server) = serve_once("200 OK", body).await;
        let fc = client(base).forecast(7).await.unwrap();
        assert!(fc.metrics.is_empty());
    }

    #[tokio::test]
    async fn error_reply_with_failure_status() {
        let (base, server) = serve_once("400 Bad Request", r#"{"error":"No dataset loaded"}"#).await;
        let err = client(base).recommendations().await.unwrap_err();
        assert!(server.await.unwrap().starts_with("GET /recommendations "));
        match err {
            AnalyticsError::Service(msg) => assert_eq!(msg, "No dataset loaded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn recommendations_success() {
        let body = r#"{"recommendations":[{"appliance":"Fan","avg_usage":9.5,"avg_units":null,"recommendation":"High usage of Fan (~9.5 hrs/day)."}]}"#;
        let (base, _server) = serve_once("200 OK", body).await;
        let recs = client(base).recommendations().await.unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].appliance, "Fan");
        assert_eq!(recs[0].avg_usage, Some(9.5));
        assert_eq!(recs[0].avg_units, None);
    }

    #[tokio::test]
    async fn non_json_failure_keeps_status() {
        let (base, _server) = serve_once("500 Internal Server Error", "boom").await;
        let err = client(base).forecast(7).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn malformed_success_is_decode_error() {
        let (base, _server) = serve_once("200 OK", r#"{"history":[]}"#).await;
        let err = client(base).forecast(7).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::Decode(_)));
    }
}
