mod defaults;
mod parser;

pub use defaults::DEFAULT_ENTRIES;
pub use parser::TableError;

use crate::domain_name::{is_wildcard, normalize_domain, wildcard_suffix};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::Path;
use tracing::{debug, info, warn};

/// One configured pattern and the address it answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub pattern: String,
    pub address: Ipv4Addr,
}

impl DomainEntry {
    /// Builds an entry, normalizing the pattern the same way queried names are.
    pub fn new(pattern: &str, address: Ipv4Addr) -> Self {
        Self {
            pattern: normalize_domain(pattern),
            address,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        is_wildcard(&self.pattern)
    }
}

/// Where a loaded table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    File,
    Defaults,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub source: TableSource,
    pub loaded: usize,
    pub skipped: Vec<TableError>,
}

/// Pattern → IPv4 mapping consulted before the system resolver.
///
/// Built once and never mutated afterwards. Exact patterns are looked up by
/// key; wildcard patterns (`*.suffix`) are scanned in insertion order and the
/// first one whose suffix ends the queried name wins.
#[derive(Debug, Clone, Default)]
pub struct DomainTable {
    entries: Vec<DomainEntry>,
    exact: HashMap<String, Ipv4Addr>,
    wildcards: Vec<(String, Ipv4Addr)>,
}

impl DomainTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from already-validated entries. A pattern that repeats
    /// an earlier one is ignored.
    pub fn from_entries(entries: impl IntoIterator<Item = DomainEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            if !table.insert(entry.clone()) {
                warn!(pattern = %entry.pattern, "Duplicate domain pattern ignored");
            }
        }
        table
    }

    /// Built-in table used when no configuration file is present.
    pub fn defaults() -> Self {
        Self::from_entries(
            DEFAULT_ENTRIES
                .iter()
                .map(|(pattern, address)| DomainEntry::new(pattern, *address)),
        )
    }

    /// Loads the table from an INI-style file.
    ///
    /// A missing or unreadable file selects [`DomainTable::defaults`]. Malformed
    /// sections are skipped and listed in the report; they never abort the load.
    pub fn load(path: impl AsRef<Path>) -> (Self, LoadReport) {
        let path = path.as_ref();

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    info!(path = %path.display(), "Domain table not found, using built-in defaults");
                } else {
                    warn!(path = %path.display(), error = %e, "Domain table unreadable, using built-in defaults");
                }
                let table = Self::defaults();
                let report = LoadReport {
                    source: TableSource::Defaults,
                    loaded: table.len(),
                    skipped: Vec::new(),
                };
                return (table, report);
            }
        };

        let (table, skipped) = Self::parse(&contents);
        for error in &skipped {
            warn!(path = %path.display(), error = %error, "Skipping domain table entry");
        }
        info!(
            path = %path.display(),
            loaded = table.len(),
            skipped = skipped.len(),
            "Domain table loaded"
        );

        let report = LoadReport {
            source: TableSource::File,
            loaded: table.len(),
            skipped,
        };
        (table, report)
    }

    /// Parses INI-style contents: `[pattern]` sections each holding `ip = a.b.c.d`.
    pub fn parse(contents: &str) -> (Self, Vec<TableError>) {
        let (entries, mut skipped) = parser::parse_sections(contents);

        let mut table = Self::default();
        for (line, entry) in entries {
            let pattern = entry.pattern.clone();
            if !table.insert(entry) {
                skipped.push(TableError::DuplicatePattern { pattern, line });
            }
        }
        skipped.sort_by_key(TableError::line);
        (table, skipped)
    }

    /// Resolves an already-normalized name: exact entry first, then the first
    /// wildcard whose suffix ends `name`.
    pub fn lookup(&self, name: &str) -> Option<Ipv4Addr> {
        if let Some(address) = self.exact.get(name) {
            debug!(domain = %name, %address, "Exact table match");
            return Some(*address);
        }

        self.wildcards
            .iter()
            .find(|(suffix, _)| name.ends_with(suffix.as_str()))
            .map(|(suffix, address)| {
                debug!(domain = %name, suffix = %suffix, %address, "Wildcard table match");
                *address
            })
    }

    pub fn entries(&self) -> &[DomainEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: DomainEntry) -> bool {
        if self.entries.iter().any(|e| e.pattern == entry.pattern) {
            return false;
        }

        match wildcard_suffix(&entry.pattern) {
            Some(suffix) => self.wildcards.push((suffix.to_string(), entry.address)),
            None => {
                self.exact.insert(entry.pattern.clone(), entry.address);
            }
        }
        self.entries.push(entry);
        true
    }
}
