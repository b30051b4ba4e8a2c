//! Turning raw search-form input into a remote query descriptor.
//!
//! Name search takes precedence over license-ID search when both fields are
//! filled in. License-ID format is not validated here; the service decides.

use std::borrow::Cow;

/// Default similarity threshold for fuzzy name matching.
pub const DEFAULT_FUZZ_RATIO: u8 = 75;

/// Raw text from the two search fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub name_text: String,
    pub license_id_text: String,
}

impl SearchInput {
    pub fn new(name_text: impl Into<String>, license_id_text: impl Into<String>) -> Self {
        Self {
            name_text: name_text.into(),
            license_id_text: license_id_text.into(),
        }
    }

    pub fn by_name(name_text: impl Into<String>) -> Self {
        Self::new(name_text, "")
    }

    pub fn by_license_id(license_id_text: impl Into<String>) -> Self {
        Self::new("", license_id_text)
    }

    /// `true` when neither field holds anything but whitespace.
    pub fn is_blank(&self) -> bool {
        self.name_text.trim().is_empty() && self.license_id_text.trim().is_empty()
    }
}

/// Which field a query searches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    ByName,
    ByLicenseId,
}

impl QueryMode {
    /// Query-string parameter the service expects for this mode.
    pub fn param(&self) -> &'static str {
        match self {
            Self::ByName => "contractor_name",
            Self::ByLicenseId => "license_id",
        }
    }
}

/// Immutable, validated query descriptor.
///
/// Only [`QueryBuilder::build`] constructs one, so `value` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    mode: QueryMode,
    value: String,
    fuzz_threshold: u8,
    fuzzy: bool,
}

impl SearchQuery {
    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    /// The trimmed, unencoded search value.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn fuzz_threshold(&self) -> u8 {
        self.fuzz_threshold
    }

    /// `true` when this query should go to the fuzzy-match endpoint.
    ///
    /// Only name searches are ever fuzzy.
    pub fn is_fuzzy(&self) -> bool {
        self.fuzzy && self.mode == QueryMode::ByName
    }

    /// Percent-encoded value, ready for a query string.
    pub fn encoded_value(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.value)
    }

    /// Query string (without the leading `?`) for this descriptor.
    ///
    /// "contractor_name=Acme%20Co" or, for fuzzy queries,
    /// "contractor_name=Acme%20Co&fuzz_ratio=75".
    pub fn to_query_string(&self) -> String {
        let mut qs = format!("{}={}", self.mode.param(), self.encoded_value());
        if self.is_fuzzy() {
            qs.push_str(&format!("&fuzz_ratio={}", self.fuzz_threshold));
        }
        qs
    }
}

/// Builds [`SearchQuery`] descriptors from [`SearchInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBuilder {
    fuzz_threshold: u8,
    fuzzy: bool,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZ_RATIO, false)
    }
}

impl QueryBuilder {
    /// Create a builder. Thresholds above 100 are clamped to 100.
    pub fn new(fuzz_threshold: u8, fuzzy: bool) -> Self {
        Self {
            fuzz_threshold: fuzz_threshold.min(100),
            fuzzy,
        }
    }

    pub fn fuzzy(fuzz_threshold: u8) -> Self {
        Self::new(fuzz_threshold, true)
    }

    /// Build a query, or `None` when there is nothing to search for.
    pub fn build(&self, input: &SearchInput) -> Option<SearchQuery> {
        let name = input.name_text.trim();
        let license_id = input.license_id_text.trim();

        let (mode, value) = if !name.is_empty() {
            (QueryMode::ByName, name)
        } else if !license_id.is_empty() {
            (QueryMode::ByLicenseId, license_id)
        } else {
            return None;
        };

        Some(SearchQuery {
            mode,
            value: value.to_string(),
            fuzz_threshold: self.fuzz_threshold,
            fuzzy: self.fuzzy,
        })
    }
}
