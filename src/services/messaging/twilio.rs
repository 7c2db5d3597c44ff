use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use super::MessagingProvider;
use crate::config::AppConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const TWILIO_API: &str = "https://api.twilio.com";

pub struct TwilioSmsProvider {
    account_sid: String,
    auth_token: String,
    from_number: String,
    api_base: String,
    client: reqwest::Client,
}

impl TwilioSmsProvider {
    pub fn new(
        account_sid: String,
        auth_token: String,
        from_number: String,
    ) -> anyhow::Result<Self> {
        Self::with_timeout(account_sid, auth_token, from_number, REQUEST_TIMEOUT)
    }

    /// A stalled Twilio request fails after `timeout` instead of pinning its task.
    fn with_timeout(
        account_sid: String,
        auth_token: String,
        from_number: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .context("failed to build Twilio HTTP client")?;

        Ok(Self {
            account_sid,
            auth_token,
            from_number,
            api_base: TWILIO_API.to_string(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::new(
            config.twilio_account_sid.clone(),
            config.twilio_auth_token.clone(),
            config.twilio_phone_number.clone(),
        )
    }
}

#[async_trait]
impl MessagingProvider for TwilioSmsProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        );

        self.client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .context("failed to send Twilio SMS")?
            .error_for_status()
            .context("Twilio API returned error")?;

        tracing::info!(to = %to, "SMS sent");
        Ok(())
    }
}
