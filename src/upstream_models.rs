//! Wire formats of the two upstream APIs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============ Identity Insights: request ============

pub const FRAUD_PREVENTION_PURPOSE: &str = "FraudPreventionAndDetection";

#[derive(Debug, Clone, Serialize)]
pub struct InsightsRequest {
    pub phone_number: String,
    pub purpose: String,
    pub insights: RequestedInsights,
}

/// Insight toggles. The always-on insights are empty objects; the two
/// conditional blocks are omitted entirely when not requested.
#[derive(Debug, Clone, Serialize)]
pub struct RequestedInsights {
    pub format: EnabledInsight,
    pub sim_swap: SimSwapParams,
    pub current_carrier: EnabledInsight,
    pub original_carrier: EnabledInsight,
    pub roaming: EnabledInsight,
    pub reachability: EnabledInsight,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_verification: Option<LocationVerificationParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_match: Option<SubscriberMatchParams>,
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EnabledInsight {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimSwapParams {
    /// Lookback period in hours.
    pub period: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationVerificationParams {
    pub location: LocationArea,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationArea {
    #[serde(rename = "type")]
    pub kind: AreaKind,
    pub radius: i64,
    pub center: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaKind {
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubscriberMatchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number_extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ============ Identity Insights: response ============

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightsResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub insights: Option<InsightsPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InsightsPayload {
    pub format: Option<FormatInsight>,
    pub sim_swap: Option<SimSwapInsight>,
    pub current_carrier: Option<CarrierInsight>,
    pub original_carrier: Option<CarrierInsight>,
    pub roaming: Option<RoamingInsight>,
    pub reachability: Option<ReachabilityInsight>,
    pub location_verification: Option<LocationVerificationInsight>,
    pub subscriber_match: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormatInsight {
    pub country_code: Option<Value>,
    pub country_name: Option<Value>,
    pub country_prefix: Option<Value>,
    pub offline_location: Option<Value>,
    pub time_zones: Option<Value>,
    #[serde(deserialize_with = "crate::models::lenient::string")]
    pub number_international: Option<String>,
    pub number_national: Option<Value>,
    pub is_format_valid: Option<bool>,
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimSwapInsight {
    pub latest_sim_swap_at: Option<Value>,
    pub is_swapped: Option<bool>,
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CarrierInsight {
    #[serde(deserialize_with = "crate::models::lenient::string")]
    pub name: Option<String>,
    pub network_type: Option<Value>,
    pub country_code: Option<Value>,
    pub network_code: Option<Value>,
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoamingInsight {
    pub latest_status_at: Option<Value>,
    pub is_roaming: Option<bool>,
    pub country_codes: Option<Value>,
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReachabilityInsight {
    pub latest_status_at: Option<Value>,
    pub is_reachable: Option<bool>,
    pub connectivity: Option<Value>,
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocationVerificationInsight {
    pub is_verified: Option<Value>,
    pub latest_location_at: Option<Value>,
    pub match_rate: Option<Value>,
    pub status: Option<Value>,
}

impl LocationVerificationInsight {
    pub fn is_empty(&self) -> bool {
        self.is_verified.is_none()
            && self.latest_location_at.is_none()
            && self.match_rate.is_none()
            && self.status.is_none()
    }
}

// ============ Legacy Number Insight ============

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NumberInsightResponse {
    /// Zero on success.
    pub status: Option<i64>,
    pub status_message: Option<String>,
    pub error_text: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub current_carrier: Option<LegacyCarrier>,
    pub reachable: Option<Value>,
    pub ported: Option<Value>,
    pub roaming: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyCarrier {
    pub name: Option<String>,
    pub network_type: Option<String>,
}

/// Error body fields either upstream may send on a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamErrorBody {
    pub error_text: Option<String>,
    pub detail: Option<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}
