//! Contractor records exchanged with the SafeContractor service.
//!
//! Field names follow the service's snake_case wire format. camelCase aliases
//! are accepted on input so payloads produced by other clients decode too.

use serde::{Deserialize, Deserializer, Serialize};

/// One entry in a search result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub name: String,
    #[serde(
        default,
        alias = "licenseId",
        skip_serializing_if = "Option::is_none"
    )]
    pub license_id: Option<String>,
    /// Similarity score, present only on fuzzy-match results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl SearchResultItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            license_id: None,
            score: None,
        }
    }
}

/// Full record for a contractor: project history plus analysis summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractorDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "previousWorks")]
    pub previous_works: Vec<ProjectRecord>,
    #[serde(
        default,
        alias = "addressDetails",
        skip_serializing_if = "Option::is_none"
    )]
    pub address_details: Option<Address>,
    #[serde(
        default,
        rename = "gpt",
        alias = "analysis_text",
        alias = "analysisText",
        skip_serializing_if = "Option::is_none"
    )]
    pub analysis_text: Option<String>,
}

impl ContractorDetail {
    /// Wire keys (with aliases) that mark an object as a contractor record.
    /// An object carrying none of them is an empty record.
    pub const WIRE_KEYS: &'static [&'static str] = &[
        "name",
        "previous_works",
        "previousWorks",
        "address_details",
        "addressDetails",
        "gpt",
        "analysis_text",
        "analysisText",
    ];

    pub fn is_wire_key(key: &str) -> bool {
        Self::WIRE_KEYS.contains(&key)
    }

    pub fn total_projects(&self) -> usize {
        self.previous_works.len()
    }

    /// The first project as delivered by the service.
    ///
    /// The service does not document its ordering, so "latest" is
    /// informational only.
    pub fn latest_project(&self) -> Option<&ProjectRecord> {
        self.previous_works.first()
    }
}

/// A permitted project attributed to a contractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(alias = "projectId", deserialize_with = "string_or_number")]
    pub project_id: String,
    #[serde(default, alias = "dateStarted")]
    pub date_started: Option<String>,
    #[serde(default, rename = "project_description", alias = "description")]
    pub description: Option<String>,
    #[serde(default, rename = "project_amount", alias = "amount")]
    pub amount: Option<f64>,
    #[serde(
        default,
        rename = "project_status",
        alias = "status",
        deserialize_with = "null_as_empty"
    )]
    pub status: String,
    #[serde(default, rename = "project_comments", alias = "comments")]
    pub comments: Option<String>,
}

impl ProjectRecord {
    /// Binary display classification: "open" versus everything else.
    pub fn is_open(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("open")
    }
}

/// Postal address attached to a contractor record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street_number: Option<String>,
    #[serde(default)]
    pub street_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
}

impl Address {
    /// "12 Main St, Boston, MA 02110" with missing parts left out.
    pub fn one_line(&self) -> String {
        let street = [&self.street_number, &self.street_name]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let region = [&self.state, &self.zipcode]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        [Some(street), self.city.clone(), Some(region)]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
