#[cfg(test)]
#[path = "clompanion_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::domain::models::Assistant;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::RemoteMessage;
use crate::domain::models::SessionId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct HistoryResponse {
    session_id: SessionId,
    messages: Vec<RemoteMessage>,
}

/// HTTP client for the Clompanion assistant service.
pub struct Clompanion {
    url: Url,
    health_check_timeout: Duration,
    client: reqwest::Client,
}

impl Clompanion {
    pub fn new(config: &Config) -> Result<Clompanion> {
        let url = Url::parse(&config.service_url)
            .map_err(|err| return anyhow!("Invalid service URL {}: {err}", config.service_url))?;
        if url.cannot_be_a_base() {
            bail!(
                "Invalid service URL {}: expected an address such as http://localhost:5000",
                config.service_url
            );
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        return Ok(Clompanion {
            url,
            health_check_timeout: config.health_check_timeout,
            client,
        });
    }

    /// Appends path segments to the service URL, keeping any path prefix it
    /// already has.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| return anyhow!("{} cannot be used as a base URL", self.url))?
            .pop_if_empty()
            .extend(segments);

        return Ok(url);
    }
}

#[async_trait]
impl Assistant for Clompanion {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        let res = self
            .client
            .get(self.url.clone())
            .timeout(self.health_check_timeout)
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Clompanion is not reachable");
                bail!("Clompanion is not reachable at {}", self.url);
            }
        };

        let status = res.status().as_u16();
        if status >= 400 {
            tracing::error!(status = status, "Clompanion health check failed");
            bail!("Clompanion health check failed with status {status}");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn send(&self, request: ChatRequest) -> Result<ChatReply> {
        let res = self
            .client
            .post(self.endpoint(&["api", "chat"])?)
            .json(&request)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to send chat message to Clompanion"
            );
            bail!("Clompanion responded with status {}", res.status().as_u16());
        }

        let reply = res.json::<ChatReply>().await?;
        tracing::debug!(
            session_id = reply.session_id.as_str(),
            message_id = reply.message_id.as_str(),
            "Chat reply"
        );

        return Ok(reply);
    }

    #[allow(clippy::implicit_return)]
    async fn delete_session(&self, session_id: &SessionId) -> Result<()> {
        let res = self
            .client
            .delete(self.endpoint(&["api", "chat", session_id.as_str()])?)
            .send()
            .await?;

        tracing::debug!(
            status = res.status().as_u16(),
            session_id = session_id.as_str(),
            "Deleted remote session"
        );

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn history(&self, session_id: &SessionId) -> Result<Vec<RemoteMessage>> {
        let res = self
            .client
            .get(self.endpoint(&["api", "chat", session_id.as_str(), "history"])?)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                session_id = session_id.as_str(),
                "Failed to fetch session history from Clompanion"
            );
            bail!("Clompanion responded with status {}", res.status().as_u16());
        }

        let history = res.json::<HistoryResponse>().await?;
        tracing::debug!(
            session_id = history.session_id.as_str(),
            messages = history.messages.len(),
            "Session history"
        );

        return Ok(history.messages);
    }
}
