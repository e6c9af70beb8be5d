use super::DomainEntry;
use crate::domain_name::{is_wildcard, normalize_domain, wildcard_suffix};
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// A domain table line or section that was left out of the table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("line {line}: section [{pattern}] has no 'ip' key")]
    MissingIp { pattern: String, line: usize },

    #[error("line {line}: section [{pattern}] has invalid IPv4 address '{value}'")]
    InvalidAddress {
        pattern: String,
        value: String,
        line: usize,
    },

    #[error("line {line}: invalid domain pattern '{section}'")]
    InvalidPattern { section: String, line: usize },

    #[error("line {line}: duplicate domain pattern '{pattern}'")]
    DuplicatePattern { pattern: String, line: usize },

    #[error("line {line}: key/value outside of any section")]
    OrphanLine { line: usize },

    #[error("line {line}: unrecognized syntax")]
    MalformedLine { line: usize },
}

impl TableError {
    pub fn line(&self) -> usize {
        match self {
            Self::MissingIp { line, .. }
            | Self::InvalidAddress { line, .. }
            | Self::InvalidPattern { line, .. }
            | Self::DuplicatePattern { line, .. }
            | Self::OrphanLine { line }
            | Self::MalformedLine { line } => *line,
        }
    }
}

struct PendingSection {
    name: String,
    line: usize,
    ip: Option<String>,
}

impl PendingSection {
    fn finish(self) -> Result<DomainEntry, TableError> {
        let pattern = normalize_domain(&self.name);
        if !is_valid_pattern(&pattern) {
            return Err(TableError::InvalidPattern {
                section: self.name,
                line: self.line,
            });
        }

        let value = self.ip.ok_or_else(|| TableError::MissingIp {
            pattern: pattern.clone(),
            line: self.line,
        })?;

        let address = Ipv4Addr::from_str(&value).map_err(|_| TableError::InvalidAddress {
            pattern: pattern.clone(),
            value: value.clone(),
            line: self.line,
        })?;

        Ok(DomainEntry { pattern, address })
    }
}

/// Splits the file into `(section line, entry)` pairs plus whatever had to be skipped.
///
/// Syntax: `#`/`;` comment lines, `[pattern]` headers, `key = value` or
/// `key: value` assignments. Keys are case-insensitive; only `ip` is used.
pub(super) fn parse_sections(contents: &str) -> (Vec<(usize, DomainEntry)>, Vec<TableError>) {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    let mut current: Option<PendingSection> = None;

    for (index, raw) in contents.lines().enumerate() {
        let line_num = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            flush_section(current.take(), &mut entries, &mut skipped);
            current = Some(PendingSection {
                name: name.trim().to_string(),
                line: line_num,
                ip: None,
            });
            continue;
        }

        let Some((key, value)) = split_assignment(line) else {
            skipped.push(TableError::MalformedLine { line: line_num });
            continue;
        };

        match current.as_mut() {
            Some(section) if key.eq_ignore_ascii_case("ip") => {
                section.ip = Some(value.to_string());
            }
            Some(section) => {
                debug!(section = %section.name, key = %key, "Ignoring unknown key");
            }
            None => skipped.push(TableError::OrphanLine { line: line_num }),
        }
    }
    flush_section(current.take(), &mut entries, &mut skipped);

    (entries, skipped)
}

fn flush_section(
    section: Option<PendingSection>,
    entries: &mut Vec<(usize, DomainEntry)>,
    skipped: &mut Vec<TableError>,
) {
    if let Some(section) = section {
        let line = section.line;
        match section.finish() {
            Ok(entry) => entries.push((line, entry)),
            Err(e) => skipped.push(e),
        }
    }
}

fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let split_at = line.find(['=', ':'])?;
    let key = line[..split_at].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[split_at + 1..].trim()))
}

fn is_valid_pattern(pattern: &str) -> bool {
    let literal = if is_wildcard(pattern) {
        wildcard_suffix(pattern).unwrap_or_default()
    } else {
        pattern
    };

    !literal.is_empty()
        && !literal.contains('*')
        && !literal.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_assignment_accepts_both_separators() {
        assert_eq!(split_assignment("ip = 1.2.3.4"), Some(("ip", "1.2.3.4")));
        assert_eq!(split_assignment("IP: 1.2.3.4"), Some(("IP", "1.2.3.4")));
        assert_eq!(split_assignment("= 1.2.3.4"), None);
        assert_eq!(split_assignment("garbage"), None);
    }

    #[test]
    fn test_pattern_validation() {
        assert!(is_valid_pattern("viper.capcom.co.jp"));
        assert!(is_valid_pattern("*.kddi-mmbb.jp"));
        assert!(!is_valid_pattern("*."));
        assert!(!is_valid_pattern(""));
        assert!(!is_valid_pattern("a.*.example"));
        assert!(!is_valid_pattern("two words"));
    }
}
