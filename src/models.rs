use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============ Request Models ============

/// Body of `POST /api/identity/phone-match`.
///
/// The web form submits every value as a string, so all fields are parsed
/// leniently: empty strings and unparsable numbers count as "not supplied".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    #[serde(default, deserialize_with = "lenient::truthy_string")]
    pub phone_number: Option<String>,
    /// Legacy single-field email, folded into the subscriber match block.
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    /// Legacy single-field full name, folded into given/family name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    /// SIM swap lookback period in hours.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub sim_swap_period: Option<i64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub longitude: Option<f64>,
    /// Geofence radius in meters. A numeric zero counts as missing.
    #[serde(default, deserialize_with = "lenient::truthy_integer")]
    pub radius: Option<i64>,
    #[serde(flatten)]
    pub subscriber: SubscriberDetails,
}

/// Structured know-your-customer attributes compared against carrier records.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberDetails {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id_document: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub given_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub family_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub street_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub street_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub locality: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub house_number_extension: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub birthdate: Option<String>,
}

impl SubscriberDetails {
    pub fn is_empty(&self) -> bool {
        [
            &self.id_document,
            &self.given_name,
            &self.family_name,
            &self.street_name,
            &self.street_number,
            &self.postal_code,
            &self.locality,
            &self.region,
            &self.country,
            &self.house_number_extension,
            &self.birthdate,
        ]
        .iter()
        .all(|field| field.is_none())
    }
}

/// Body of `POST /api/identity/number-verify`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberVerifyRequest {
    #[serde(default, deserialize_with = "lenient::truthy_string")]
    pub phone_number: Option<String>,
}

// ============ Response Models ============

/// Success envelope shared by every API endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            request_id: None,
            data,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PhoneMatchData {
    Verified(NormalizedInsightResult),
    Mock(MockPhoneMatch),
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum NumberVerifyData {
    Verified(NumberVerifyResult),
    Mock(MockNumberVerify),
}

/// Flattened identity insights result consumed by the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInsightResult {
    pub phone_number: String,
    pub match_score: u32,
    pub format: FormatSummary,
    pub sim_swap: SimSwapSummary,
    pub current_carrier: CarrierSummary,
    pub original_carrier: CarrierSummary,
    pub roaming: RoamingSummary,
    pub reachability: ReachabilitySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_verification: Option<LocationVerificationSummary>,
    /// Upstream subscriber match outcome, passed through unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_match: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_prefix: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline_location: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zones: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimSwapSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_swapped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_swap_at: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_code: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoamingSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_roaming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_status_at: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_codes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachabilitySummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_reachable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_status_at: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connectivity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationVerificationSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_location_at: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_rate: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

/// Flattened legacy number insight result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberVerifyResult {
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_type: Option<String>,
    pub valid_number: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reachable: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ported: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roaming: Option<Value>,
}

// ============ Mock Models ============

pub const MOCK_STATUS: &str = "mock";
pub const MOCK_MESSAGE: &str = "Mock response (API credentials not configured)";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockPhoneMatch {
    pub phone_number: String,
    pub match_score: u32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<MockAttributeMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<MockAttributeMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MockAttributeMatch {
    #[serde(rename = "match")]
    pub is_match: bool,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockNumberVerify {
    pub phone_number: String,
    pub verified: bool,
    pub carrier: String,
    pub line_type: String,
    pub status: String,
}

/// Deserializers for loosely typed input.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings pass through (empty means absent); numbers and booleans are stringified.
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        })
    }

    /// Like [`string`], but a JSON `false` or numeric zero counts as absent.
    pub fn truthy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Some(Value::Bool(true)) => Some(true.to_string()),
            _ => None,
        })
    }

    pub fn float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|f| f.is_finite()))
    }

    /// Fractional input is truncated toward zero.
    pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(truncate))
            }
            _ => None,
        })
    }

    /// Like [`integer`], but a JSON numeric zero counts as absent. A string `"0"` is kept.
    pub fn truthy_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(truncate))
            }
            _ => None,
        })
    }

    fn truncate(f: f64) -> Option<i64> {
        f.is_finite().then(|| f.trunc() as i64)
    }
}
