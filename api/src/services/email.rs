//! Email notifier for critical alerts.
//!
//! Sends a plain-text message through Gmail SMTP using the `lettre` crate.
//! Dispatch is best-effort: when no SMTP credentials are configured, sending
//! is silently skipped, and transport failures are logged but never surfaced
//! to the ingestion path that triggered them.
//!
//! # Environment Variables
//! - `GMAIL_USERNAME`: Gmail address to send alert emails from
//! - `GMAIL_APP_PASSWORD`: Gmail app password for authentication
//! - `EMAIL_FROM_NAME`: Display name for the sender

use lettre::{
    AsyncTransport, Tokio1Executor,
    message::{Message, header},
    transport::smtp::{AsyncSmtpTransport, authentication::Credentials},
};
use util::config;

/// Service for sending alert emails.
pub struct EmailService;

impl EmailService {
    /// Sends a critical-alert email to the configured recipient.
    ///
    /// Returns `Ok(())` without sending when SMTP credentials are absent, so
    /// deployments without email configured behave as if the feature is off.
    pub async fn send_alert_email(
        to_email: &str,
        hostname: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let username = config::gmail_username();
        let password = config::gmail_app_password();
        if username.is_empty() || password.is_empty() {
            tracing::debug!("SMTP credentials not configured; skipping alert email");
            return Ok(());
        }
        let from_name = config::email_from_name();

        let email = Message::builder()
            .from(format!("{from_name} <{username}>").parse()?)
            .to(to_email.parse()?)
            .subject(format!("[{from_name}] Critical alert on {hostname}"))
            .header(header::ContentType::TEXT_PLAIN)
            .body(format!(
                "A critical alert was raised for {hostname}:\n\n\
                {message}\n\n\
                Log in to the dashboard to acknowledge it."
            ))?;

        let transport: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay("smtp.gmail.com")?
                .credentials(Credentials::new(username, password))
                .build();

        transport.send(email).await?;
        Ok(())
    }
}
