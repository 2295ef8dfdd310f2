use crate::config::{AccountCredentials, Config};
use crate::errors::{AppError, ResultExt};
use crate::insights::{compose_request, normalize};
use crate::mock_data;
use crate::models::*;
use crate::token::TokenIssuer;
use crate::upstream_models::{InsightsResponse, NumberInsightResponse, UpstreamErrorBody};
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Identity API client, selected once at startup from the available credentials.
#[derive(Debug, Clone)]
pub enum IdentityClient {
    /// Account credentials present: calls go to the real upstream APIs.
    Live(LiveClient),
    /// No credentials: every call returns labeled mock data without network access.
    Mock,
}

impl IdentityClient {
    /// Builds the client variant the configuration allows.
    ///
    /// Fails only when a private key is configured but cannot be parsed.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let Some(account) = config.account.clone() else {
            tracing::warn!(
                "❌ API credentials not found. Identity Insights features will return mock data."
            );
            return Ok(IdentityClient::Mock);
        };

        let token_issuer = match &config.application {
            Some(application) => {
                tracing::info!(
                    "✅ Identity client initialized with application credentials (JWT enabled)"
                );
                Some(TokenIssuer::new(application)?)
            }
            None => {
                tracing::warn!(
                    "⚠️  Identity client initialized (API Key/Secret only - JWT APIs not available)"
                );
                None
            }
        };

        Ok(IdentityClient::Live(LiveClient::new(
            account,
            token_issuer,
            config.identity_insights_url.clone(),
            config.number_insight_url.clone(),
        )?))
    }

    pub fn is_live(&self) -> bool {
        matches!(self, IdentityClient::Live(_))
    }

    pub async fn phone_match(
        &self,
        phone_number: &str,
        req: &VerificationRequest,
    ) -> Result<ApiResponse<PhoneMatchData>, AppError> {
        match self {
            IdentityClient::Live(client) => {
                let (request_id, result) = client.phone_match(phone_number, req).await?;
                Ok(ApiResponse::new(
                    "Identity Insights verification result",
                    PhoneMatchData::Verified(result),
                )
                .with_request_id(request_id))
            }
            IdentityClient::Mock => {
                let data = mock_data::phone_match(phone_number, req, &mut rand::thread_rng());
                Ok(ApiResponse::new(MOCK_MESSAGE, PhoneMatchData::Mock(data)))
            }
        }
    }

    pub async fn number_verify(
        &self,
        phone_number: &str,
    ) -> Result<ApiResponse<NumberVerifyData>, AppError> {
        match self {
            IdentityClient::Live(client) => {
                let result = client.number_verify(phone_number).await?;
                Ok(ApiResponse::new(
                    "Number Verification result",
                    NumberVerifyData::Verified(result),
                ))
            }
            IdentityClient::Mock => {
                let data = mock_data::number_verify(phone_number, &mut rand::thread_rng());
                Ok(ApiResponse::new(MOCK_MESSAGE, NumberVerifyData::Mock(data)))
            }
        }
    }
}

/// Client for the identity insights API (bearer token) and the legacy
/// number insight API (query-string key/secret).
#[derive(Debug, Clone)]
pub struct LiveClient {
    client: reqwest::Client,
    account: AccountCredentials,
    token_issuer: Option<TokenIssuer>,
    identity_insights_url: String,
    number_insight_url: String,
}

impl LiveClient {
    pub fn new(
        account: AccountCredentials,
        token_issuer: Option<TokenIssuer>,
        identity_insights_url: String,
        number_insight_url: String,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            account,
            token_issuer,
            identity_insights_url,
            number_insight_url,
        })
    }

    /// Calls the identity insights API once and normalizes the result.
    ///
    /// Returns the upstream request id alongside the flattened insights.
    pub async fn phone_match(
        &self,
        phone_number: &str,
        req: &VerificationRequest,
    ) -> Result<(Option<String>, NormalizedInsightResult), AppError> {
        let issuer = self.token_issuer.as_ref().ok_or_else(|| {
            AppError::Configuration(
                "Application credentials (VCR_API_APPLICATION_ID, PRIVATE_KEY) are required for Identity Insights"
                    .to_string(),
            )
        })?;
        let token = issuer
            .issue()
            .context("Failed to sign Identity Insights token")?;

        let body = compose_request(phone_number, req);
        tracing::info!("Calling Identity Insights API for: {}", phone_number);
        if let Ok(pretty) = serde_json::to_string_pretty(&body) {
            tracing::debug!("Request body: {}", pretty);
        }

        let response = self
            .client
            .post(&self.identity_insights_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, true))?;

        if !response.status().is_success() {
            return Err(upstream_error(response, true).await);
        }

        let insights: InsightsResponse = response
            .json()
            .await
            .map_err(|e| transport_error(e, true))?;
        tracing::info!(
            "Identity Insights response received (request_id: {:?})",
            insights.request_id
        );

        let request_id = insights.request_id.clone();
        Ok((request_id, normalize(insights, phone_number)))
    }

    /// Looks the number up in the legacy number insight API.
    pub async fn number_verify(&self, phone_number: &str) -> Result<NumberVerifyResult, AppError> {
        let url = reqwest::Url::parse_with_params(
            &self.number_insight_url,
            &[
                ("api_key", self.account.api_key.as_str()),
                ("api_secret", self.account.api_secret.as_str()),
                ("number", phone_number),
            ],
        )
        .map_err(|e| AppError::InternalError(format!("Failed to build URL: {}", e)))?;

        tracing::info!("Fetching number insight for: {}", phone_number);
        // Redact credentials from logs
        tracing::debug!(
            "Number Insight URL: {}?api_key=[REDACTED]&api_secret=[REDACTED]&number={}",
            self.number_insight_url,
            phone_number
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(e, false))?;

        if !response.status().is_success() {
            return Err(upstream_error(response, false).await);
        }

        let insight: NumberInsightResponse = response
            .json()
            .await
            .map_err(|e| transport_error(e, false))?;

        Ok(NumberVerifyResult {
            phone_number: phone_number.to_string(),
            status: insight.status_message,
            country_code: insight.country_code,
            country_name: insight.country_name,
            carrier: insight
                .current_carrier
                .as_ref()
                .and_then(|c| c.name.clone()),
            line_type: insight.current_carrier.and_then(|c| c.network_type),
            valid_number: insight.status == Some(0),
            reachable: insight.reachable,
            ported: insight.ported,
            roaming: insight.roaming,
        })
    }
}

/// Errors raised before a usable response arrived.
///
/// The identity insights API always reports an error type, defaulting to "unknown".
fn transport_error(err: reqwest::Error, with_type: bool) -> AppError {
    match AppError::from(err) {
        AppError::Upstream {
            status, message, ..
        } => AppError::Upstream {
            status,
            message,
            error_type: with_type.then(|| "unknown".to_string()),
        },
        other => other,
    }
}

/// Converts a non-2xx upstream response into an error carrying its status and text.
async fn upstream_error(response: Response, with_type: bool) -> AppError {
    let status = response.status();
    let raw = response.text().await.unwrap_or_default();
    tracing::error!("Upstream returned {}: {}", status, raw);

    let body: UpstreamErrorBody = serde_json::from_str(&raw).unwrap_or_default();
    let message = body
        .error_text
        .filter(|t| !t.is_empty())
        .or_else(|| {
            if with_type {
                body.detail.clone().filter(|d| !d.is_empty())
            } else {
                None
            }
        })
        .unwrap_or_else(|| default_status_message(status));

    AppError::Upstream {
        status: Some(status.as_u16()),
        message,
        error_type: with_type.then(|| body.error_type.unwrap_or_else(|| "unknown".to_string())),
    }
}

fn default_status_message(status: StatusCode) -> String {
    format!("Request failed with status code {}", status.as_u16())
}
