//! CMS publication states.

use serde::{Deserialize, Serialize};

/// Which revision of CMS content to request.
///
/// `Live` returns only published entries; `Preview` includes drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublicationState {
    #[default]
    Live,
    Preview,
}

impl PublicationState {
    /// Query-string value understood by the CMS.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Preview => "preview",
        }
    }
}

impl std::fmt::Display for PublicationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PublicationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live" => Ok(Self::Live),
            "preview" => Ok(Self::Preview),
            _ => Err(format!("invalid publication state: {s}")),
        }
    }
}
