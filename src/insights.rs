/// Request composition and response normalization for the identity insights API
///
/// The composer turns a sparse form submission into the nested upstream schema:
/// 1. Always-on insights (format, carriers, roaming, reachability, SIM swap)
/// 2. A location block, only when latitude, longitude and radius are all present
/// 3. A subscriber match block, only when any identity attribute is present
///
/// The normalizer flattens the upstream response and derives the match score.
use crate::models::{
    CarrierSummary, FormatSummary, LocationVerificationSummary, NormalizedInsightResult,
    ReachabilitySummary, RoamingSummary, SimSwapSummary, VerificationRequest,
};
use crate::upstream_models::*;

/// SIM swap lookback used when the request does not set one (10 days).
pub const DEFAULT_SIM_SWAP_PERIOD_HOURS: i64 = 240;

pub const BASE_MATCH_SCORE: u32 = 50;
const VALID_FORMAT_BONUS: u32 = 20;
const KNOWN_CARRIER_BONUS: u32 = 10;
const NO_SIM_SWAP_BONUS: u32 = 10;
const GIVEN_NAME_EXACT_BONUS: u32 = 10;

/// Builds the upstream request body for a validated phone number.
pub fn compose_request(phone_number: &str, req: &VerificationRequest) -> InsightsRequest {
    InsightsRequest {
        phone_number: phone_number.to_string(),
        purpose: FRAUD_PREVENTION_PURPOSE.to_string(),
        insights: RequestedInsights {
            format: EnabledInsight {},
            sim_swap: SimSwapParams {
                period: req
                    .sim_swap_period
                    .unwrap_or(DEFAULT_SIM_SWAP_PERIOD_HOURS),
            },
            current_carrier: EnabledInsight {},
            original_carrier: EnabledInsight {},
            roaming: EnabledInsight {},
            reachability: EnabledInsight {},
            location_verification: location_block(req),
            subscriber_match: subscriber_match_block(req),
        },
    }
}

/// Circular geofence. All three inputs are required.
pub fn location_block(req: &VerificationRequest) -> Option<LocationVerificationParams> {
    let latitude = req.latitude?;
    let longitude = req.longitude?;
    let radius = req.radius?;

    Some(LocationVerificationParams {
        location: LocationArea {
            kind: AreaKind::Circle,
            radius,
            center: Coordinates {
                latitude,
                longitude,
            },
        },
    })
}

/// Subscriber match attributes, including the legacy `email`/`name` fields.
///
/// Legacy folding rules:
/// - `email` is sent only when `givenName` is absent.
/// - `name` is split into given/family name only when both detailed name
///   fields are absent; otherwise it is ignored.
pub fn subscriber_match_block(req: &VerificationRequest) -> Option<SubscriberMatchParams> {
    let details = &req.subscriber;
    if req.email.is_none() && req.name.is_none() && details.is_empty() {
        return None;
    }

    let mut block = SubscriberMatchParams {
        id_document: details.id_document.clone(),
        given_name: details.given_name.clone(),
        family_name: details.family_name.clone(),
        street_name: details.street_name.clone(),
        street_number: details.street_number.clone(),
        postal_code: details.postal_code.clone(),
        locality: details.locality.clone(),
        region: details.region.clone(),
        country: details.country.clone(),
        house_number_extension: details.house_number_extension.clone(),
        birthdate: details.birthdate.clone(),
        email: None,
    };

    if details.given_name.is_none() {
        block.email = req.email.clone();
    }

    if let (Some(name), None, None) = (&req.name, &details.given_name, &details.family_name) {
        let (given, family) = split_full_name(name);
        block.given_name = Some(given);
        block.family_name = family;
    }

    Some(block)
}

/// Splits a full name on whitespace into the first token and the remainder.
///
/// A single token is returned untouched as the given name.
pub fn split_full_name(name: &str) -> (String, Option<String>) {
    let mut parts = name.split_whitespace();
    let first = parts.next();
    let rest: Vec<&str> = parts.collect();

    match first {
        Some(first) if !rest.is_empty() => (first.to_string(), Some(rest.join(" "))),
        _ => (name.to_string(), None),
    }
}

/// Additive heuristic over the strongest positive signals.
pub fn match_score(insights: &InsightsPayload) -> u32 {
    let mut score = BASE_MATCH_SCORE;

    if insights
        .format
        .as_ref()
        .and_then(|f| f.is_format_valid)
        .unwrap_or(false)
    {
        score += VALID_FORMAT_BONUS;
    }

    if insights
        .current_carrier
        .as_ref()
        .and_then(|c| c.name.as_deref())
        .is_some_and(|name| !name.is_empty())
    {
        score += KNOWN_CARRIER_BONUS;
    }

    if insights.sim_swap.as_ref().and_then(|s| s.is_swapped) == Some(false) {
        score += NO_SIM_SWAP_BONUS;
    }

    if insights
        .subscriber_match
        .as_ref()
        .and_then(|m| m.get("given_name_match"))
        .and_then(|v| v.as_str())
        == Some("EXACT")
    {
        score += GIVEN_NAME_EXACT_BONUS;
    }

    score
}

/// Flattens an upstream response into the shape the UI renders.
///
/// `submitted_phone` is reported when the format insight carries no
/// international representation.
pub fn normalize(response: InsightsResponse, submitted_phone: &str) -> NormalizedInsightResult {
    let insights = response.insights.unwrap_or_default();
    let match_score = match_score(&insights);

    let format = insights.format.unwrap_or_default();
    let sim_swap = insights.sim_swap.unwrap_or_default();
    let roaming = insights.roaming.unwrap_or_default();
    let reachability = insights.reachability.unwrap_or_default();

    NormalizedInsightResult {
        phone_number: format
            .number_international
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| submitted_phone.to_string()),
        match_score,
        format: FormatSummary {
            is_valid: format.is_format_valid,
            country_code: format.country_code,
            country_name: format.country_name,
            country_prefix: format.country_prefix,
            offline_location: format.offline_location,
            time_zones: format.time_zones,
            international: format.number_international,
            national: format.number_national,
            status: format.status,
        },
        sim_swap: SimSwapSummary {
            is_swapped: sim_swap.is_swapped,
            latest_swap_at: sim_swap.latest_sim_swap_at,
            status: sim_swap.status,
        },
        current_carrier: carrier_summary(insights.current_carrier.unwrap_or_default()),
        original_carrier: carrier_summary(insights.original_carrier.unwrap_or_default()),
        roaming: RoamingSummary {
            is_roaming: roaming.is_roaming,
            latest_status_at: roaming.latest_status_at,
            country_codes: roaming.country_codes,
            status: roaming.status,
        },
        reachability: ReachabilitySummary {
            is_reachable: reachability.is_reachable,
            latest_status_at: reachability.latest_status_at,
            connectivity: reachability.connectivity,
            status: reachability.status,
        },
        location_verification: insights
            .location_verification
            .filter(|l| !l.is_empty())
            .map(|l| LocationVerificationSummary {
                is_verified: l.is_verified,
                latest_location_at: l.latest_location_at,
                match_rate: l.match_rate,
                status: l.status,
            }),
        subscriber_match: insights.subscriber_match.filter(|m| !m.is_empty()),
    }
}

fn carrier_summary(carrier: CarrierInsight) -> CarrierSummary {
    CarrierSummary {
        name: carrier.name,
        network_type: carrier.network_type,
        country_code: carrier.country_code,
        network_code: carrier.network_code,
        status: carrier.status,
    }
}
