//! Data feeds: where raw ticker payloads come from.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

#[async_trait]
pub trait DataFeed: Send + Sync {
    /// Name or URL used to resolve the quote adapter.
    fn identity(&self) -> &str;

    async fn fetch(&self, params: &HashMap<String, String>) -> Result<Value>;
}

/// Plain HTTP GET against a URL template. No retry, no auth.
#[derive(Clone)]
pub struct HttpTickerFeed {
    http: Client,
    name: String,
    url_template: String,
}

impl HttpTickerFeed {
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .context("build http client")?;

        Ok(Self {
            http,
            name: name.into(),
            url_template: url_template.into(),
        })
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn url_for(&self, params: &HashMap<String, String>) -> String {
        render_url(&self.url_template, params)
    }
}

#[async_trait]
impl DataFeed for HttpTickerFeed {
    fn identity(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, params), fields(feed = %self.name), level = "debug")]
    async fn fetch(&self, params: &HashMap<String, String>) -> Result<Value> {
        let url = self.url_for(params);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;

        let payload: Value = resp
            .json()
            .await
            .with_context(|| format!("{url} did not return JSON"))?;

        debug!(url = %url, "ticker payload fetched");
        Ok(payload)
    }
}

/// Replace every `{key}` in `template` with its value from `params`.
///
/// The template is scanned once, left to right, so substituted values are
/// never expanded again. Unknown placeholders are left as they are.
pub fn render_url(template: &str, params: &HashMap<String, String>) -> String {
    let mut url = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        url.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match params.get(key) {
                    Some(v) => url.push_str(v),
                    None => {
                        url.push('{');
                        url.push_str(key);
                        url.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                url.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    url.push_str(rest);
    url
}
