use anyhow::{bail, Context};
use async_trait::async_trait;
use log::info;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};

use crate::custom_resource::OutcomeReport;

#[async_trait]
pub trait SendReport {
    async fn send_report(&self, url: &str, report: &OutcomeReport) -> anyhow::Result<()>;
}

pub struct CallbackClient {
    client: reqwest::Client,
}

#[async_trait]
impl SendReport for CallbackClient {
    async fn send_report(&self, url: &str, report: &OutcomeReport) -> anyhow::Result<()> {
        let body = response_body(report)?;
        info!("Response body: {}", body);

        info!("Sending response...");
        // The pre-signed URL is signed without a content type.
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "")
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .send()
            .await
            .context("Failed to send response")?;

        info!("Status: {}", response.status());
        info!("Headers: {:?}", response.headers());
        if !response.status().is_success() {
            bail!("Response was rejected with status {}", response.status());
        }
        Ok(())
    }
}

impl Default for CallbackClient {
    fn default() -> Self {
        CallbackClient::new()
    }
}

impl CallbackClient {
    pub fn new() -> Self {
        CallbackClient::new_with_client(reqwest::Client::new())
    }

    pub fn new_with_client(client: reqwest::Client) -> Self {
        CallbackClient { client }
    }
}

fn response_body(report: &OutcomeReport) -> anyhow::Result<String> {
    serde_json::to_string(report).context("Failed to serialize response body")
}
