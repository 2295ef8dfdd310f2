//! Randomized payloads returned while no account credentials are configured.

use crate::models::{
    MockAttributeMatch, MockNumberVerify, MockPhoneMatch, VerificationRequest, MOCK_STATUS,
};
use rand::seq::SliceRandom;
use rand::Rng;

pub const MOCK_CARRIER: &str = "Mock Carrier";
pub const MOCK_LINE_TYPES: [&str; 3] = ["mobile", "landline", "voip"];

pub fn phone_match<R: Rng + ?Sized>(
    phone_number: &str,
    req: &VerificationRequest,
    rng: &mut R,
) -> MockPhoneMatch {
    MockPhoneMatch {
        phone_number: phone_number.to_string(),
        match_score: rng.gen_range(0..100),
        status: MOCK_STATUS.to_string(),
        email: req.email.as_ref().map(|_| attribute_match(rng)),
        name: req.name.as_ref().map(|_| attribute_match(rng)),
    }
}

pub fn number_verify<R: Rng + ?Sized>(phone_number: &str, rng: &mut R) -> MockNumberVerify {
    MockNumberVerify {
        phone_number: phone_number.to_string(),
        verified: rng.gen_bool(0.7),
        carrier: MOCK_CARRIER.to_string(),
        line_type: MOCK_LINE_TYPES
            .choose(rng)
            .copied()
            .unwrap_or("mobile")
            .to_string(),
        status: MOCK_STATUS.to_string(),
    }
}

fn attribute_match<R: Rng + ?Sized>(rng: &mut R) -> MockAttributeMatch {
    MockAttributeMatch {
        is_match: rng.gen_bool(0.5),
        score: rng.gen_range(0..100),
    }
}
