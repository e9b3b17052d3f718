//! Domain types for the consumption gate.

use serde::{Deserialize, Serialize};

use tabeeb_shared::types::CreditKind;

/// The kind of one-shot resource a grant can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A research article or clinical write-up.
    Article,
    /// A video course.
    Course,
}

impl ResourceKind {
    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Course => "course",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(Self::Article),
            "course" => Ok(Self::Course),
            other => Err(UnknownResourceKind(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown resource kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource kind: {0}")]
pub struct UnknownResourceKind(pub String);

/// What a one-shot unlock costs: the credit kind it draws from and the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Credit kind the purchase debits.
    pub kind: CreditKind,
    /// Amount debited, always positive.
    pub amount: i64,
}

/// Outcome of an access check for a (user, resource) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    /// Whether the user already holds a grant.
    pub granted: bool,
    /// The price to unlock, present only when not yet granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

impl AccessDecision {
    /// Decision for a user who already holds the grant.
    #[must_use]
    pub const fn granted() -> Self {
        Self {
            granted: true,
            price: None,
        }
    }

    /// Decision for a user who must pay the given price.
    #[must_use]
    pub const fn priced(price: Price) -> Self {
        Self {
            granted: false,
            price: Some(price),
        }
    }
}
