
pub const DEFAULT_IDENTITY_INSIGHTS_URL: &str = "https://api-eu.vonage.com/v0.1/identity-insights";
pub const DEFAULT_NUMBER_INSIGHT_URL: &str = "https://api.nexmo.com/ni/standard/json";

/// Account-level credentials. Their presence switches the service from mock to live mode.
#[derive(Clone)]
pub struct AccountCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Application credentials used to sign bearer tokens for the identity insights API.
#[derive(Clone)]
pub struct ApplicationCredentials {
    pub application_id: String,
    pub private_key: String,
}

impl std::fmt::Debug for ApplicationCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationCredentials")
            .field("application_id", &self.application_id)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Allowed CORS origin, `*` allows any.
    pub frontend_url: String,
    pub account: Option<AccountCredentials>,
    pub application: Option<ApplicationCredentials>,
    /// Deployment host name, only used for logging the public URL.
    pub instance_service_name: Option<String>,
    pub identity_insights_url: String,
    pub number_insight_url: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Blank values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let account = match (var("API_ACCOUNT_ID"), var("API_ACCOUNT_SECRET")) {
            (Some(api_key), Some(api_secret)) => Some(AccountCredentials {
                api_key,
                api_secret,
            }),
            _ => None,
        };

        let application = match (var("VCR_API_APPLICATION_ID"), var("PRIVATE_KEY")) {
            (Some(application_id), Some(private_key)) => Some(ApplicationCredentials {
                application_id,
                // Platform-injected keys often arrive with literal "\n" sequences
                private_key: private_key.replace("\\n", "\n"),
            }),
            _ => None,
        };

        let config = Self {
            port: var("VCR_PORT")
                .or_else(|| var("PORT"))
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            frontend_url: var("FRONTEND_URL").unwrap_or_else(|| "*".to_string()),
            account,
            application,
            instance_service_name: var("INSTANCE_SERVICE_NAME"),
            identity_insights_url: var("IDENTITY_INSIGHTS_URL")
                .map(|u| validate_http_url("IDENTITY_INSIGHTS_URL", u))
                .transpose()?
                .unwrap_or_else(|| DEFAULT_IDENTITY_INSIGHTS_URL.to_string()),
            number_insight_url: var("NUMBER_INSIGHT_URL")
                .map(|u| validate_http_url("NUMBER_INSIGHT_URL", u))
                .transpose()?
                .unwrap_or_else(|| DEFAULT_NUMBER_INSIGHT_URL.to_string()),
            static_dir: var("STATIC_DIR").unwrap_or_else(|| "public".to_string()),
        };

        // Log presence only, never values
        tracing::info!("Configuration loaded successfully");
        tracing::info!("API key available: {}", config.account.is_some());
        tracing::info!("Application credentials available: {}", config.application.is_some());
        match config.public_url() {
            Some(url) => tracing::info!("Public URL: {}", url),
            None => tracing::info!("INSTANCE_SERVICE_NAME not set in environment"),
        }
        tracing::debug!("Identity Insights URL: {}", config.identity_insights_url);
        tracing::debug!("Number Insight URL: {}", config.number_insight_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Public runtime URL derived from the deployment host name.
    pub fn public_url(&self) -> Option<String> {
        self.instance_service_name
            .as_ref()
            .map(|name| format!("https://{}.use1.runtime.vonage.cloud", name))
    }
}

fn validate_http_url(key: &str, value: String) -> anyhow::Result<String> {
    let parsed = url::Url::parse(&value)
        .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", key, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("{} must start with http:// or https://", key);
    }
    Ok(value)
}
