//! Immutable validator identity, set at registration.
//!
//! Reference: spec.md Section 3, **Validator**.

use chaoschain_types::ValidatorId;
use std::collections::HashSet;

/// The fixed identity a validator is registered with. Never mutated after
/// creation; contrast with [`super::state::ValidatorState`], which the
/// validator's own task is free to update.
#[derive(Debug, Clone)]
pub struct ValidatorProfile {
    pub id: ValidatorId,
    pub name: String,
    pub traits: HashSet<String>,
    pub style: String,
    pub influences: Vec<String>,
    pub genesis_prompt: String,
}

impl ValidatorProfile {
    #[must_use]
    pub fn new(
        id: impl Into<ValidatorId>,
        name: impl Into<String>,
        traits: impl IntoIterator<Item = impl Into<String>>,
        style: impl Into<String>,
        influences: impl IntoIterator<Item = impl Into<String>>,
        genesis_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            traits: traits.into_iter().map(Into::into).collect(),
            style: style.into(),
            influences: influences.into_iter().map(Into::into).collect(),
            genesis_prompt: genesis_prompt.into(),
        }
    }
}
