use crate::codec;
use std::collections::HashSet;

/// Header of the spreadsheet column holding the identifiers.
pub const IDENTIFIER_COLUMN: &str = "SINTETICOS";

/// Normalized identifiers drawn from one spreadsheet column.
///
/// Values are trimmed and never empty. Membership is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    values: HashSet<String>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim `raw` and insert it. Returns `false` when the value is blank or already present.
    pub fn insert_raw(&mut self, raw: &str) -> bool {
        match normalize_identifier(raw) {
            Some(value) => self.values.insert(value.to_string()),
            None => false,
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.values.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Sorted copy of the first `limit` identifiers, for display.
    pub fn sample(&self, limit: usize) -> Vec<&str> {
        let mut values: Vec<&str> = self.iter().collect();
        values.sort_unstable();
        values.truncate(limit);
        values
    }

    /// Latin-1 encodings of every identifier, plus the number of identifiers
    /// that have no Latin-1 form and therefore can never match a line.
    pub fn latin1_keys(&self) -> (HashSet<Vec<u8>>, usize) {
        let mut keys = HashSet::with_capacity(self.values.len());
        let mut unrepresentable = 0;

        for value in &self.values {
            match codec::encode_latin1(value) {
                Some(bytes) => {
                    keys.insert(bytes);
                }
                None => unrepresentable += 1,
            }
        }

        (keys, unrepresentable)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = IdentifierSet::new();
        for raw in iter {
            set.insert_raw(raw.as_ref());
        }
        set
    }
}

pub fn normalize_identifier(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
