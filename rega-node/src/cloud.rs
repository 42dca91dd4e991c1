use std::sync::Arc;

use async_trait::async_trait;
use rega_core::{
    DecisionResponse, DeviceSerial, RegisterBody, RemoteFailure, RemoteOutcome, SensorSnapshot,
    TelemetryBody,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::CloudConfig;
use crate::link::Link;

/// The three typed operations against the decision service.
///
/// The sync engine only talks to this trait, so tests can script
/// outcomes without a server.
#[async_trait]
pub trait Cloud: Send + Sync {
    async fn register(&self) -> RemoteOutcome<()>;
    async fn push_telemetry(&self, snapshot: &SensorSnapshot) -> RemoteOutcome<()>;
    async fn fetch_decision(&self, snapshot: &SensorSnapshot) -> RemoteOutcome<DecisionResponse>;
}

#[derive(Debug, thiserror::Error)]
pub enum CloudClientError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the decision service.
///
/// Holds no cross-call state beyond the immutable endpoint URLs and the
/// device serial. Every call checks the link first and classifies the
/// result into a `RemoteOutcome`; nothing here raises on a non-2xx
/// status, that is the sync engine's call to make.
pub struct CloudClient {
    http: reqwest::Client,
    link: Arc<dyn Link>,
    serial: DeviceSerial,
    register_url: String,
    telemetry_url: String,
    decision_url: String,
}

impl CloudClient {
    pub fn new(
        config: &CloudConfig,
        serial: DeviceSerial,
        link: Arc<dyn Link>,
    ) -> Result<Self, CloudClientError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            link,
            serial,
            register_url: join_url(&config.base_url, &config.register_path),
            telemetry_url: join_url(&config.base_url, &config.telemetry_path),
            decision_url: join_url(&config.base_url, &config.decision_path),
        })
    }

    /// POST a JSON body and classify the response, without decoding a
    /// payload.
    async fn post<B: Serialize>(&self, url: &str, body: &B) -> RemoteOutcome<()> {
        if !self.link.is_connected().await {
            return RemoteOutcome::Failed(RemoteFailure::NotConnected);
        }

        match self.http.post(url).json(body).send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                debug!(url, status, "Remote call completed");
                RemoteOutcome::Ok {
                    status,
                    payload: None,
                }
            }
            Err(e) => RemoteOutcome::Failed(classify_transport(&e)),
        }
    }

    /// POST a JSON body and decode the expected payload on 2xx. A 2xx
    /// response with a missing or malformed payload is a decode
    /// failure, never a guessed default.
    async fn post_expect<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> RemoteOutcome<T> {
        if !self.link.is_connected().await {
            return RemoteOutcome::Failed(RemoteFailure::NotConnected);
        }

        match self.http.post(url).json(body).send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                debug!(url, status, "Remote call completed");
                if !(200..300).contains(&status) {
                    return RemoteOutcome::Ok {
                        status,
                        payload: None,
                    };
                }
                match resp.json::<T>().await {
                    Ok(payload) => RemoteOutcome::Ok {
                        status,
                        payload: Some(payload),
                    },
                    Err(_) => RemoteOutcome::Failed(RemoteFailure::DecodeError),
                }
            }
            Err(e) => RemoteOutcome::Failed(classify_transport(&e)),
        }
    }
}

#[async_trait]
impl Cloud for CloudClient {
    async fn register(&self) -> RemoteOutcome<()> {
        let body = RegisterBody {
            serial: self.serial,
        };
        self.post(&self.register_url, &body).await
    }

    async fn push_telemetry(&self, snapshot: &SensorSnapshot) -> RemoteOutcome<()> {
        let body = TelemetryBody::from_snapshot(self.serial, snapshot);
        self.post(&self.telemetry_url, &body).await
    }

    async fn fetch_decision(&self, snapshot: &SensorSnapshot) -> RemoteOutcome<DecisionResponse> {
        let body = TelemetryBody::from_snapshot(self.serial, snapshot);
        self.post_expect(&self.decision_url, &body).await
    }
}

fn classify_transport(e: &reqwest::Error) -> RemoteFailure {
    if e.is_timeout() {
        RemoteFailure::Timeout
    } else {
        RemoteFailure::Transport
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("http://x", "/init/"), "http://x/init/");
        assert_eq!(join_url("http://x/", "init/"), "http://x/init/");
        assert_eq!(join_url("http://x/", "/init/"), "http://x/init/");
    }
}
