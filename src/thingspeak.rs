/// ThingSpeak forwarder: pushes numbered-field views to the channel update
/// endpoint, with the channel credentials injected from the device registry.
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::handler::DashboardSink;
use crate::models::NumberedFieldView;
use crate::registry::ThingSpeakTarget;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("update rejected with HTTP {0}")]
    Rejected(StatusCode),
}

/// Channel update body: the numbered fields flattened next to the channel
/// credentials, exactly as the update endpoint expects them.
#[derive(Serialize)]
struct ChannelUpdate<'a> {
    channel_id: u64,
    api_key: &'a str,
    #[serde(flatten)]
    fields: &'a NumberedFieldView,
}

pub struct ThingSpeakClient {
    url: String,
    client: Client,
}

impl ThingSpeakClient {
    pub fn new(url: impl Into<String>) -> Result<Self, ForwardError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(ThingSpeakClient {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl DashboardSink for ThingSpeakClient {
    async fn push(
        &self,
        target: &ThingSpeakTarget,
        view: &NumberedFieldView,
    ) -> Result<(), ForwardError> {
        let update = ChannelUpdate {
            channel_id: target.channel_id,
            api_key: &target.api_key,
            fields: view,
        };
        let response = self.client.post(&self.url).json(&update).send().await?;
        if !response.status().is_success() {
            return Err(ForwardError::Rejected(response.status()));
        }
        debug!("Channel {} accepted the update", target.channel_id);
        Ok(())
    }
}
