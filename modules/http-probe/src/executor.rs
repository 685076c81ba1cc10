use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no response within {0:?}")]
    TimedOut(Duration),
}

/// A single reachability check. Any completed exchange counts as reachable.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    /// Returns the response status on success.
    async fn probe(&self, url: &str) -> Result<u16, ProbeError>;
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    /// Applies to reads only; reqwest has no separate write deadline; slow writes
    /// are bounded by the supervisor's deadline instead.
    pub read_timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(1),
            user_agent: None,
        }
    }
}

/// Probe executor backed by one shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(opts: &ClientOptions) -> Result<Self> {
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(Policy::none())
            .http1_only()
            .pool_max_idle_per_host(0)
            .connect_timeout(opts.connect_timeout)
            .read_timeout(opts.read_timeout);
        if let Some(ua) = &opts.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        Ok(HttpProber { client: builder.build()? })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> Result<u16, ProbeError> {
        let resp = self
            .client
            .get(url)
            .header(header::CONNECTION, "close")
            .send()
            .await?;
        // Body is never read; dropping the response closes the connection.
        Ok(resp.status().as_u16())
    }
}
