use serde::{Deserialize, Serialize};
use std::fmt;

/// Markets the service operates in. The set is closed: everything else is
/// rejected at the API boundary before any query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryCode {
    CA,
    SG,
    MY,
    ID,
    TH,
}

impl CountryCode {
    pub const ALL: [Self; 5] = [Self::CA, Self::SG, Self::MY, Self::ID, Self::TH];

    /// Parse a country code, normalizing case first so that `sg`, `Sg` and
    /// `SG` all resolve to the same market.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "CA" => Some(Self::CA),
            "SG" => Some(Self::SG),
            "MY" => Some(Self::MY),
            "ID" => Some(Self::ID),
            "TH" => Some(Self::TH),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CA => "CA",
            Self::SG => "SG",
            Self::MY => "MY",
            Self::ID => "ID",
            Self::TH => "TH",
        }
    }

    /// ISO 4217 currency listings in this market are priced in.
    #[must_use]
    pub const fn currency(self) -> &'static str {
        match self {
            Self::CA => "CAD",
            Self::SG => "SGD",
            Self::MY => "MYR",
            Self::ID => "IDR",
            Self::TH => "THB",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CA => "Canada",
            Self::SG => "Singapore",
            Self::MY => "Malaysia",
            Self::ID => "Indonesia",
            Self::TH => "Thailand",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
