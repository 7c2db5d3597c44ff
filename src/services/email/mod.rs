pub mod smtp;

use async_trait::async_trait;

/// A fully rendered message, ready to hand to a provider.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub recipients: Vec<String>,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()>;
}
