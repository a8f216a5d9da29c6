use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Conflict rule applied when registering over an existing entry.
///
/// The check is made against the identifier's single entry, whether it is still a
/// pending factory or an already resolved instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RegisterPolicy {
    /// Fail with `AlreadyRegistered` if an entry exists.
    #[default]
    None,
    /// Fail with `NotRegistered` if no entry exists, overwrite otherwise.
    Replace,
    /// Keep the existing entry and report success.
    SkipIfRegistered,
    /// Insert or overwrite unconditionally.
    AddOrReplace,
}

impl RegisterPolicy {
    /// All recognized policies.
    pub const ALL: [RegisterPolicy; 4] = [
        RegisterPolicy::None,
        RegisterPolicy::Replace,
        RegisterPolicy::SkipIfRegistered,
        RegisterPolicy::AddOrReplace,
    ];

    /// The snake_case name used by `Display`, `FromStr` and serde.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegisterPolicy::None => "none",
            RegisterPolicy::Replace => "replace",
            RegisterPolicy::SkipIfRegistered => "skip_if_registered",
            RegisterPolicy::AddOrReplace => "add_or_replace",
        }
    }
}

impl fmt::Display for RegisterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`RegisterPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown register policy: {input:?}")]
pub struct ParsePolicyError {
    input: String,
}

impl ParsePolicyError {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for RegisterPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        RegisterPolicy::ALL
            .into_iter()
            .find(|policy| policy.as_str() == normalized)
            .ok_or_else(|| ParsePolicyError {
                input: s.to_string(),
            })
    }
}
