use super::*;
use crate::config::EmailConfig;
use rust_decimal_macros::dec;

fn notice() -> ForecastSubmissionNotice {
    ForecastSubmissionNotice {
        snapshot_id: "0190a5f0-0000-7000-8000-000000000001".to_string(),
        version_name: "FY26 Base Case".to_string(),
        forecast_year: 2026,
        submitted_by: "budget.officer".to_string(),
        final_net_profit: dec!(1234567.891),
        final_closing_cash: dec!(987654321),
    }
}

#[test]
fn test_email_config_default() {
    let config = EmailConfig::default();
    assert_eq!(config.smtp_host, "localhost");
    assert_eq!(config.smtp_port, 1025);
    assert!(!config.enabled);
}

#[test]
fn test_submission_message_contents() {
    let service = EmailService::new(EmailConfig::default());
    let (subject, body) = service.submission_message(&notice());

    assert_eq!(
        subject,
        "ACTION REQUIRED: Forecast Budget Submission - FY26 Base Case"
    );
    assert!(body.contains("Forecast Year: 2026"));
    assert!(body.contains("Net Profit (Forecast): 1234567.89"));
    assert!(body.contains("Closing Cash (Forecast): 987654321.00"));
    assert!(body.contains(
        "http://localhost:3000/forecast/snapshots/0190a5f0-0000-7000-8000-000000000001"
    ));
}

#[tokio::test]
async fn test_disabled_email_logs_instead_of_sending() {
    let service = EmailService::new(EmailConfig::default());
    assert!(service.send_submission_notice(&notice()).await.is_ok());
}

#[tokio::test]
async fn test_create_transport() {
    let config = EmailConfig {
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: "user".to_string(),
        smtp_password: "password".to_string(),
        ..EmailConfig::default()
    };

    let service = EmailService::new(config);
    assert!(service.create_transport().is_ok());
}

#[test]
fn test_email_error_display() {
    assert_eq!(
        format!("{}", EmailError::BuildError("msg".into())),
        "Failed to build email: msg"
    );
    assert_eq!(
        format!("{}", EmailError::SendError("msg".into())),
        "Failed to send email: msg"
    );
    assert_eq!(
        format!("{}", EmailError::InvalidAddress("msg".into())),
        "Invalid email address: msg"
    );
}
