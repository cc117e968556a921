use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::Config;
use crate::models::RawBlock;
use crate::parsing::call_blocks;
use crate::parsing::html::CALL_BOX_CLASS;
use crate::source::CallSource;

const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);
const SHOW_MORE_TEXT: &str = "show more";

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    url: &'a str,
    user_agent: &'a str,
    wait_for: String,
    click_selector_text: &'a str,
    clicks: u32,
    timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    html: String,
    #[serde(default)]
    has_more: bool,
}

/// Live caller pages through a headless rendering service.
///
/// The service is stateless: every request loads the page fresh, presses
/// "show more" `clicks` times and returns the resulting markup. Revealing
/// more records therefore means rendering again with one more click.
pub struct RemoteRenderSource {
    client: Client,
    render_url: String,
    user_agent: String,
    page_url: Option<String>,
    clicks: u32,
    html: String,
    has_more: bool,
    timeout: Duration,
    last_request: Option<Instant>,
    base_url: String,
}

impl RemoteRenderSource {
    pub fn new(cfg: &Config) -> Result<Self> {
        let timeout = cfg.navigate_timeout();
        let client = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(timeout + Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            render_url: cfg.render_url.clone(),
            user_agent: cfg.user_agent.clone(),
            page_url: None,
            clicks: 0,
            html: String::new(),
            has_more: false,
            timeout,
            last_request: None,
            base_url: cfg.caller_base_url.clone(),
        })
    }

    async fn rate_limit(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    async fn render(&mut self, clicks: u32) -> Result<RenderResponse> {
        let url = self
            .page_url
            .clone()
            .context("render requested before navigate")?;

        self.rate_limit().await;

        let req = RenderRequest {
            url: &url,
            user_agent: &self.user_agent,
            wait_for: format!(".{}", CALL_BOX_CLASS),
            click_selector_text: SHOW_MORE_TEXT,
            clicks,
            timeout_ms: self.timeout.as_millis() as u64,
        };

        debug!("Rendering {} with {} clicks", url, clicks);

        let resp = self
            .client
            .post(&self.render_url)
            .json(&req)
            .send()
            .await
            .context("Failed to reach render service")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Render service error {}: {}", status, body);
        }

        resp.json::<RenderResponse>()
            .await
            .context("Failed to parse render response")
    }
}

#[async_trait]
impl CallSource for RemoteRenderSource {
    async fn navigate(&mut self, caller: &str) -> Result<()> {
        self.page_url = Some(format!("{}/{}", self.base_url.trim_end_matches('/'), caller));
        self.clicks = 0;

        let page = self.render(0).await?;
        if call_blocks(&page.html).is_empty() {
            anyhow::bail!("no {} element appeared on the page", CALL_BOX_CLASS);
        }

        self.html = page.html;
        self.has_more = page.has_more;
        Ok(())
    }

    async fn materialized_blocks(&mut self) -> Result<Vec<RawBlock>> {
        Ok(call_blocks(&self.html))
    }

    async fn reveal_more(&mut self) -> Result<bool> {
        if !self.has_more {
            return Ok(false);
        }

        let page = self.render(self.clicks + 1).await?;
        self.clicks += 1;
        self.html = page.html;
        self.has_more = page.has_more;
        Ok(true)
    }
}
