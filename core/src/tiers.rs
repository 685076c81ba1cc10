//! Named port tiers used to fan a host out into many candidates.

use std::fmt;
use std::str::FromStr;

use crate::spec::SpecError;

const MEDIUM: &[u16] = &[8000, 8080, 8443];

const LARGE: &[u16] = &[
    81, 591, 2082, 2087, 2095, 2096, 3000, 8000, 8001, 8008, 8080, 8083, 8443, 8834, 8888,
];

const XLARGE: &[u16] = &[
    81, 300, 591, 593, 832, 981, 1010, 1311, 2082, 2087, 2095, 2096, 2480, 3000, 3128, 3333, 4243,
    4567, 4711, 4712, 4993, 5000, 5104, 5108, 5800, 6543, 7000, 7396, 7474, 8000, 8001, 8008,
    8014, 8042, 8069, 8080, 8081, 8088, 8090, 8091, 8118, 8123, 8172, 8222, 8243, 8280, 8281,
    8333, 8443, 8500, 8834, 8880, 8888, 8983, 9000, 9043, 9060, 9080, 9090, 9091, 9200, 9443,
    9800, 9981, 12443, 16080, 18091, 18092, 20720, 28017,
];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Tier {
    Medium,
    Large,
    Xlarge,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Medium, Tier::Large, Tier::Xlarge];

    /// Ports in this tier, in probe order.
    pub fn ports(self) -> &'static [u16] {
        match self {
            Tier::Medium => MEDIUM,
            Tier::Large => LARGE,
            Tier::Xlarge => XLARGE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Medium => "medium",
            Tier::Large => "large",
            Tier::Xlarge => "xlarge",
        }
    }
}

impl FromStr for Tier {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medium" => Ok(Tier::Medium),
            "large" => Ok(Tier::Large),
            "xlarge" => Ok(Tier::Xlarge),
            other => Err(SpecError::UnknownTier(other.to_string())),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
