//! Expansion of one target into the candidate URLs to probe.
//!
//! Candidates are not deduplicated: a host:port reachable through two enabled
//! sources (say the defaults and `-p http:80`) is probed twice.

use crate::spec::{ProbeConfig, ProbeSpec};
use crate::Target;

const SCHEMES: [&str; 2] = ["http", "https"];

fn push_both(out: &mut Vec<String>, host: &str, port: impl std::fmt::Display) {
    for scheme in SCHEMES {
        out.push(format!("{}://{}:{}", scheme, host, port));
    }
}

/// Every candidate URL implied by `cfg` for this target.
pub fn expand(target: &Target, cfg: &ProbeConfig) -> Vec<String> {
    let host = target.host.as_str();
    let mut out = Vec::new();

    if let Some(ports) = &target.ports {
        for port in ports {
            push_both(&mut out, host, port);
        }
        return out;
    }

    if !cfg.skip_default {
        for scheme in SCHEMES {
            out.push(format!("{}://{}", scheme, host));
        }
    }

    for spec in &cfg.probes {
        match spec {
            ProbeSpec::Tier(tier) => {
                for port in tier.ports() {
                    push_both(&mut out, host, port);
                }
            }
            ProbeSpec::Explicit { scheme, port } => {
                out.push(format!("{}://{}:{}", scheme, host, port));
            }
        }
    }
    out
}

impl ProbeConfig {
    /// Parse a raw input line under this config and expand it.
    pub fn candidates(&self, line: &str) -> Vec<String> {
        match Target::parse(line, self.same_line_ports) {
            Some(t) => expand(&t, self),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiers::Tier;
    use std::collections::HashSet;

    fn set(v: Vec<String>) -> HashSet<String> {
        v.into_iter().collect()
    }

    fn strs(v: &[&str]) -> HashSet<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_only() {
        let cfg = ProbeConfig::default();
        assert_eq!(
            set(cfg.candidates("example.com")),
            strs(&["http://example.com", "https://example.com"])
        );
    }

    #[test]
    fn same_line_ports() {
        let cfg = ProbeConfig { same_line_ports: true, ..Default::default() };
        assert_eq!(
            set(cfg.candidates("example.com,80,443")),
            strs(&[
                "http://example.com:80",
                "https://example.com:80",
                "http://example.com:443",
                "https://example.com:443",
            ])
        );
    }

    #[test]
    fn same_line_ignores_other_rules() {
        let cfg = ProbeConfig {
            same_line_ports: true,
            probes: vec![ProbeSpec::Tier(Tier::Medium)],
            ..Default::default()
        };
        assert_eq!(cfg.candidates("example.com,8081").len(), 2);
        assert!(cfg.candidates("example.com").is_empty());
    }

    #[test]
    fn skip_default_with_medium() {
        let (cfg, _) = ProbeConfig { skip_default: true, ..Default::default() }
            .with_probe_tokens(["medium"]);
        assert_eq!(
            set(cfg.candidates("example.com")),
            strs(&[
                "http://example.com:8000",
                "https://example.com:8000",
                "http://example.com:8080",
                "https://example.com:8080",
                "http://example.com:8443",
                "https://example.com:8443",
            ])
        );
    }

    #[test]
    fn explicit_probe_yields_one_url() {
        let (cfg, _) = ProbeConfig { skip_default: true, ..Default::default() }
            .with_probe_tokens(["ftp:2121"]);
        assert_eq!(cfg.candidates("example.com"), vec!["ftp://example.com:2121".to_string()]);
    }

    #[test]
    fn malformed_token_does_not_affect_others() {
        let (cfg, rejected) = ProbeConfig::default().with_probe_tokens(["foo", "http:8081"]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(
            set(cfg.candidates("example.com")),
            strs(&["http://example.com", "https://example.com", "http://example.com:8081"])
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let (cfg, _) = ProbeConfig::default().with_probe_tokens(["medium", "large"]);
        let urls = cfg.candidates("h");
        assert_eq!(urls.len(), 2 + 2 * 3 + 2 * 15);
        assert_eq!(urls.iter().filter(|u| *u == "http://h:8080").count(), 2);
    }

    #[test]
    fn expansion_is_stable() {
        let (cfg, _) = ProbeConfig::default().with_probe_tokens(["xlarge", "https:9999"]);
        assert_eq!(cfg.candidates("a.example"), cfg.candidates("a.example"));
        assert_eq!(cfg.candidates("a.example").len(), 2 + 140 + 1);
    }
}
