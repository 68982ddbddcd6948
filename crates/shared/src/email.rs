//! Email service for approval notifications.
//!
//! Uses `lettre` for SMTP transport. When email is disabled in config the
//! notice is written to the log instead of being sent.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Summary of a forecast submission awaiting approval.
#[derive(Debug, Clone)]
pub struct ForecastSubmissionNotice {
    /// Snapshot id, used in the approval link.
    pub snapshot_id: String,
    /// Submitted version name.
    pub version_name: String,
    /// Forecast year.
    pub forecast_year: i32,
    /// Submitting user.
    pub submitted_by: String,
    /// Net profit of the final forecast month.
    pub final_net_profit: Decimal,
    /// Closing cash of the final forecast month.
    pub final_closing_cash: Decimal,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build()
            .pipe(Ok)
    }

    /// Builds the subject and body of a submission notice.
    #[must_use]
    pub fn submission_message(&self, notice: &ForecastSubmissionNotice) -> (String, String) {
        let approval_url = format!(
            "{}/forecast/snapshots/{}",
            self.config.frontend_url, notice.snapshot_id
        );

        let subject = format!(
            "ACTION REQUIRED: Forecast Budget Submission - {}",
            notice.version_name
        );
        let body = format!(
            r"A new forecast budget version has been submitted for your approval.

Version: {version}
Forecast Year: {year}
Submitted By: {submitted_by}
Net Profit (Forecast): {net_profit:.2}
Closing Cash (Forecast): {closing_cash:.2}

Please review and approve here: {approval_url}",
            version = notice.version_name,
            year = notice.forecast_year,
            submitted_by = notice.submitted_by,
            net_profit = notice.final_net_profit.round_dp(2),
            closing_cash = notice.final_closing_cash.round_dp(2),
        );

        (subject, body)
    }

    /// Notifies the approver that a forecast snapshot awaits a decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_submission_notice(
        &self,
        notice: &ForecastSubmissionNotice,
    ) -> Result<(), EmailError> {
        let (subject, body) = self.submission_message(notice);

        if !self.config.enabled {
            info!(
                to = %self.config.approver_email,
                subject = %subject,
                "Email disabled, submission notice logged only"
            );
            return Ok(());
        }

        let to = self.config.approver_email.clone();
        self.send_email(&to, &subject, &body).await
    }

    /// Sends a generic email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

/// Pipe trait for fluent API.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
