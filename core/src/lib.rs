//! Core types for the liveprobe engine: port tiers, probe specs, and candidate expansion.

pub mod candidates;
pub mod spec;
pub mod tiers;

pub use candidates::expand;
pub use spec::{ProbeConfig, ProbeSpec, SpecError};
pub use tiers::Tier;

pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// One input line, resolved into a host and, in same-line mode, its own port list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub ports: Option<Vec<String>>,
}

impl Target {
    /// Parse a raw input line. Blank lines yield `None`, as do same-line records
    /// with fewer than two comma-separated fields.
    ///
    /// In same-line mode the host field is trimmed like the port fields, so
    /// `" example.com ,80"` yields host `example.com`, not `" example.com "`.
    pub fn parse(line: &str, same_line_ports: bool) -> Option<Target> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if !same_line_ports {
            return Some(Target::from(line));
        }
        let mut fields = line.split(',');
        let host = fields.next()?.trim();
        let rest: Vec<&str> = fields.collect();
        if rest.is_empty() {
            return None;
        }
        let ports = rest
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Some(Target { host: host.to_string(), ports: Some(ports) })
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Target { host: s.to_string(), ports: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!version().is_empty());
    }

    #[test]
    fn blank_lines_are_dropped() {
        assert_eq!(Target::parse("   ", false), None);
        assert_eq!(Target::parse("", true), None);
    }

    #[test]
    fn plain_line_is_trimmed() {
        let t = Target::parse("  example.com \t", false).unwrap();
        assert_eq!(t, Target { host: "example.com".into(), ports: None });
    }

    #[test]
    fn same_line_record_splits_ports() {
        let t = Target::parse("example.com, 80 ,,443", true).unwrap();
        assert_eq!(t.host, "example.com");
        assert_eq!(t.ports, Some(vec!["80".to_string(), "443".to_string()]));
    }

    #[test]
    fn same_line_host_field_is_trimmed() {
        let t = Target::parse("example.com\t ,80", true).unwrap();
        assert_eq!(t.host, "example.com");
        assert_eq!(t.ports, Some(vec!["80".to_string()]));
    }

    #[test]
    fn same_line_record_needs_two_fields() {
        assert_eq!(Target::parse("example.com", true), None);
    }

    #[test]
    fn commas_are_literal_outside_same_line_mode() {
        let t = Target::parse("example.com,80", false).unwrap();
        assert_eq!(t.host, "example.com,80");
        assert_eq!(t.ports, None);
    }
}
