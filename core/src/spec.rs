use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::tiers::Tier;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("unknown port tier: {0}")]
    UnknownTier(String),
    #[error("probe spec must be a tier name or scheme:port, got {0:?}")]
    Malformed(String),
}

/// An additional probe requested on top of (or instead of) the default http/https pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeSpec {
    /// Every port of the tier, on both http and https.
    Tier(Tier),
    /// A single `scheme://host:port`. The port is kept as written.
    Explicit { scheme: String, port: String },
}

impl FromStr for ProbeSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(tier) = s.parse::<Tier>() {
            return Ok(ProbeSpec::Tier(tier));
        }
        match s.split_once(':') {
            Some((scheme, port)) => Ok(ProbeSpec::Explicit {
                scheme: scheme.to_string(),
                port: port.to_string(),
            }),
            None => Err(SpecError::Malformed(s.to_string())),
        }
    }
}

impl fmt::Display for ProbeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeSpec::Tier(t) => write!(f, "{}", t),
            ProbeSpec::Explicit { scheme, port } => write!(f, "{}:{}", scheme, port),
        }
    }
}

/// Process-wide probing settings. Built once before probing starts and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub concurrency: usize,
    pub timeout: Duration,
    pub probes: Vec<ProbeSpec>,
    pub skip_default: bool,
    pub same_line_ports: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            concurrency: 50,
            timeout: Duration::from_secs(9),
            probes: Vec::new(),
            skip_default: false,
            same_line_ports: false,
        }
    }
}

impl ProbeConfig {
    /// Resolve raw probe tokens, returning the rejected ones alongside the config.
    pub fn with_probe_tokens<I, S>(mut self, tokens: I) -> (Self, Vec<SpecError>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rejected = Vec::new();
        for tok in tokens {
            match tok.as_ref().parse::<ProbeSpec>() {
                Ok(spec) => self.probes.push(spec),
                Err(e) => rejected.push(e),
            }
        }
        (self, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_tokens_resolve_to_tiers() {
        assert_eq!("large".parse::<ProbeSpec>().unwrap(), ProbeSpec::Tier(Tier::Large));
    }

    #[test]
    fn explicit_splits_on_first_colon() {
        let s: ProbeSpec = "http:8080:extra".parse().unwrap();
        assert_eq!(s, ProbeSpec::Explicit { scheme: "http".into(), port: "8080:extra".into() });
    }

    #[test]
    fn token_without_colon_is_malformed() {
        assert_eq!("foo".parse::<ProbeSpec>(), Err(SpecError::Malformed("foo".into())));
        assert!("".parse::<ProbeSpec>().is_err());
    }

    #[test]
    fn display_matches_input_form() {
        assert_eq!(ProbeSpec::Tier(Tier::Xlarge).to_string(), "xlarge");
        let s: ProbeSpec = "https:8443".parse().unwrap();
        assert_eq!(s.to_string(), "https:8443");
    }

    #[test]
    fn probe_tokens_keep_good_and_report_bad() {
        let (cfg, rejected) = ProbeConfig::default().with_probe_tokens(["medium", "bogus", "ftp:21"]);
        assert_eq!(cfg.probes.len(), 2);
        assert_eq!(rejected, vec![SpecError::Malformed("bogus".into())]);
    }

    #[test]
    fn defaults() {
        let cfg = ProbeConfig::default();
        assert_eq!(cfg.concurrency, 50);
        assert_eq!(cfg.timeout, Duration::from_secs(9));
        assert!(!cfg.skip_default);
        assert!(!cfg.same_line_ports);
    }
}
