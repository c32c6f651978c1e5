//! Prompt construction for the Oracle.
//!
//! Reference: spec.md Section 4.5, step 2a — embeds the genesis prompt, the
//! validator's own identity and traits, the block's transaction contents,
//! the formatted transcript of prior rounds (mentions rendered in the
//! canonical `|@Name|` form), and the current round index.

use crate::domain::identity::ValidatorProfile;
use chaoschain_types::{Block, Discussion};

/// Renders one validator's canonical mention form.
#[must_use]
pub fn mention(name: &str) -> String {
    format!("|@{name}|")
}

/// Renders the transcript-so-far as lines of `|@Name| [round R/type]: message`.
#[must_use]
pub fn format_transcript(discussions: &[Discussion]) -> String {
    if discussions.is_empty() {
        return "(no discussion yet)".to_string();
    }
    discussions
        .iter()
        .map(|d| {
            format!(
                "{} [round {}/{}]: {}",
                mention(&d.validator_name),
                d.round,
                d.discussion_type,
                d.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summarizes a block's transaction contents for the prompt.
#[must_use]
pub fn format_transactions(block: &Block) -> String {
    if block.txs.is_empty() {
        return "(no transactions)".to_string();
    }
    block
        .txs
        .iter()
        .enumerate()
        .map(|(i, tx)| {
            format!(
                "{i}. {:?} from={} to={} amount={} content={}",
                tx.tx_type, tx.from, tx.to, tx.amount, tx.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the prompt for one deliberation round (rounds `1..=R`).
#[must_use]
pub fn build_round_prompt(
    profile: &ValidatorProfile,
    block: &Block,
    transcript: &[Discussion],
    round: u32,
) -> String {
    format!(
        "Genesis prompt: {genesis}\n\
         You are {mention}, a validator with traits [{traits}] and style \"{style}\".\n\
         Influences: {influences}.\n\
         Current mood-independent policy applies; relationships with other validators are \
         advisory context only and never decide your vote.\n\
         Proposed block transactions:\n{txs}\n\n\
         Discussion so far:\n{transcript}\n\n\
         This is round {round}. Respond as a JSON object with fields \
         `stance` (SUPPORT, OPPOSE, or QUESTION) and `reason` (a short explanation).",
        genesis = profile.genesis_prompt,
        mention = mention(&profile.name),
        traits = profile.traits.iter().cloned().collect::<Vec<_>>().join(", "),
        style = profile.style,
        influences = profile.influences.join(", "),
        txs = format_transactions(block),
        transcript = format_transcript(transcript),
        round = round,
    )
}

/// Builds the final-vote prompt (round `R+1`): SUPPORT or OPPOSE only.
#[must_use]
pub fn build_final_vote_prompt(
    profile: &ValidatorProfile,
    block: &Block,
    transcript: &[Discussion],
) -> String {
    format!(
        "Genesis prompt: {genesis}\n\
         You are {mention}, a validator with traits [{traits}] and style \"{style}\".\n\
         Proposed block transactions:\n{txs}\n\n\
         Full discussion transcript:\n{transcript}\n\n\
         Cast your final vote. Respond as a JSON object with fields `stance` \
         (SUPPORT or OPPOSE only) and `reason`.",
        genesis = profile.genesis_prompt,
        mention = mention(&profile.name),
        traits = profile.traits.iter().cloned().collect::<Vec<_>>().join(", "),
        style = profile.style,
        txs = format_transactions(block),
        transcript = format_transcript(transcript),
    )
}
