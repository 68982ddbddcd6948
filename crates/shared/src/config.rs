//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Forecast policy and seed configuration.
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Ledger reference accounts used for snapshot staging.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Fund directory used by the AUM roll-forward.
    #[serde(default)]
    pub funds: FundsConfig,
    /// Email configuration for approval notifications.
    #[serde(default)]
    pub email: EmailConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Forecast policy constants and opening seeds.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Flat tax rate applied to profit before tax.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
    /// Opening AUM for month 0.
    #[serde(default = "default_initial_aum")]
    pub initial_aum: Decimal,
    /// Opening cash for month 0.
    #[serde(default = "default_initial_cash")]
    pub initial_cash: Decimal,
    /// Liabilities carried unchanged through the year.
    #[serde(default = "default_initial_liabilities")]
    pub initial_liabilities: Decimal,
    /// Balance sheet treatment of AUM: `aum_as_memo` or `as_observed`.
    #[serde(default = "default_balance_treatment")]
    pub balance_treatment: String,
    /// Maximum number of cached forecast runs.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Time-to-live of a cached run in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_tax_rate() -> Decimal {
    Decimal::new(30, 2)
}

fn default_initial_aum() -> Decimal {
    Decimal::from(5_000_000_000_i64)
}

fn default_initial_cash() -> Decimal {
    Decimal::from(1_000_000_000_i64)
}

fn default_initial_liabilities() -> Decimal {
    Decimal::from(1_000_000_000_i64)
}

fn default_balance_treatment() -> String {
    "aum_as_memo".to_string()
}

fn default_cache_capacity() -> u64 {
    100
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            initial_aum: default_initial_aum(),
            initial_cash: default_initial_cash(),
            initial_liabilities: default_initial_liabilities(),
            balance_treatment: default_balance_treatment(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

/// Ledger accounts known to the staging area.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// GL account codes that exist in the chart of accounts.
    #[serde(default = "default_known_accounts")]
    pub known_accounts: Vec<String>,
    /// Account receiving the monthly revenue staging rows.
    #[serde(default = "default_revenue_account")]
    pub revenue_account: String,
    /// Account receiving the monthly expense staging rows.
    #[serde(default = "default_expense_account")]
    pub expense_account: String,
}

fn default_known_accounts() -> Vec<String> {
    vec![default_revenue_account(), default_expense_account()]
}

fn default_revenue_account() -> String {
    "4000".to_string()
}

fn default_expense_account() -> String {
    "6000".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            known_accounts: default_known_accounts(),
            revenue_account: default_revenue_account(),
            expense_account: default_expense_account(),
        }
    }
}

/// A fund entry in the directory.
#[derive(Debug, Clone, Deserialize)]
pub struct FundEntry {
    /// Numeric fund id within its fund type.
    pub id: u32,
    /// Display name.
    pub name: String,
}

/// Fund directory, grouped by fund type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FundsConfig {
    /// RSA (retirement savings account) funds.
    #[serde(default)]
    pub rsa: Vec<FundEntry>,
    /// Managed funds.
    #[serde(default)]
    pub managed: Vec<FundEntry>,
}

/// Email configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// When false, notifications are logged instead of sent.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Recipient of forecast approval requests.
    #[serde(default = "default_approver_email")]
    pub approver_email: String,
    /// Base URL used to build approval links.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "noreply@zynbudget.local".to_string()
}

fn default_from_name() -> String {
    "ZynBudget".to_string()
}

fn default_approver_email() -> String {
    "executive.director@zynbudget.local".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            approver_email: default_approver_email(),
            frontend_url: default_frontend_url(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("ZYNBUDGET")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("ledger.known_accounts")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
