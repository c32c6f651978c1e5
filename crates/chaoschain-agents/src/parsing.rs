//! Lenient parsing of Oracle responses.
//!
//! Reference: spec.md Section 4.5, step 2b: "Parse leniently: if parsing
//! fails, default the utterance `Type = "question"`; if the string
//! contains SUPPORT / OPPOSE uppercase tokens, use those." Section 4.5,
//! step 3: final-vote parsing defaults to `oppose` on parse failure. This
//! module never errors: adversarial LLM output must never crash the
//! validator (spec.md Section 7, `OracleMalformed`).

use chaoschain_telemetry::metrics::ORACLE_MALFORMED_RESPONSES;
use chaoschain_types::DiscussionType;
use serde::Deserialize;

fn note_malformed_oracle_response() {
    ORACLE_MALFORMED_RESPONSES.inc();
}

#[derive(Debug, Deserialize)]
struct OracleResponse {
    stance: String,
    #[serde(default)]
    reason: String,
}

/// Parses one round's oracle response into a `(DiscussionType, message)`
/// pair. Tries strict JSON first, then falls back to scanning for an
/// uppercase SUPPORT/OPPOSE token, then defaults to `Question` with the raw
/// text as the message.
#[must_use]
pub fn parse_round_response(text: &str) -> (DiscussionType, String) {
    if let Ok(parsed) = serde_json::from_str::<OracleResponse>(text) {
        if let Some(stance) = DiscussionType::from_stance_token(&parsed.stance) {
            return (stance, parsed.reason);
        }
        if parsed.stance.to_uppercase().contains("QUESTION") {
            return (DiscussionType::Question, parsed.reason);
        }
    }

    if let Some(stance) = DiscussionType::from_stance_token(text) {
        return (stance, text.to_string());
    }

    note_malformed_oracle_response();
    (DiscussionType::Question, text.to_string())
}

/// Parses the final-round oracle response into `(DiscussionType, message)`,
/// restricted to `Support`/`Oppose`; defaults to `Oppose` on parse failure.
#[must_use]
pub fn parse_final_vote(text: &str) -> (DiscussionType, String) {
    if let Ok(parsed) = serde_json::from_str::<OracleResponse>(text) {
        if let Some(stance @ (DiscussionType::Support | DiscussionType::Oppose)) =
            DiscussionType::from_stance_token(&parsed.stance)
        {
            return (stance, parsed.reason);
        }
    }

    if let Some(stance @ (DiscussionType::Support | DiscussionType::Oppose)) =
        DiscussionType::from_stance_token(text)
    {
        return (stance, text.to_string());
    }

    note_malformed_oracle_response();
    (DiscussionType::Oppose, text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_json_support_parses_directly() {
        let (stance, reason) = parse_round_response(r#"{"stance":"SUPPORT","reason":"looks good"}"#);
        assert_eq!(stance, DiscussionType::Support);
        assert_eq!(reason, "looks good");
    }

    #[test]
    fn garbage_defaults_to_question_in_round() {
        let (stance, _) = parse_round_response("garbage");
        assert_eq!(stance, DiscussionType::Question);
    }

    #[test]
    fn garbage_defaults_to_oppose_in_final_vote() {
        let (stance, _) = parse_final_vote("garbage");
        assert_eq!(stance, DiscussionType::Oppose);
    }

    #[test]
    fn bare_uppercase_token_without_json_still_parses() {
        let (stance, _) = parse_round_response("I think we should OPPOSE this one");
        assert_eq!(stance, DiscussionType::Oppose);
    }

    #[test]
    fn final_vote_ignores_question_stance_and_falls_back_to_oppose() {
        let (stance, _) = parse_final_vote(r#"{"stance":"QUESTION","reason":"unsure"}"#);
        assert_eq!(stance, DiscussionType::Oppose);
    }
}
