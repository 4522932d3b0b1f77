//! Government scheme records produced from generative-language output.
//!
//! Field names are camelCase on the wire to match what the provider is
//! prompted for and what the app screens consume.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lenient;

/// Portal used when neither the record nor the known-title table has a URL.
pub const DEFAULT_OFFICIAL_URL: &str = "https://agricoop.nic.in/";

const KNOWN_OFFICIAL_URLS: &[(&str, &str)] = &[
    ("PM-KISAN", "https://pmkisan.gov.in/"),
    ("PMFBY", "https://pmfby.gov.in/"),
    ("Soil Health Card Scheme", "https://www.soilhealth.dac.gov.in/"),
    (
        "Paramparagat Krishi Vikas Yojana (PKVY)",
        "https://pgsindia-ncof.gov.in/",
    ),
];

/// Scheme category. Values outside the six known ones are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemeCategory {
    Finance,
    Insurance,
    Information,
    Organic,
    Subsidy,
    Equipment,
    Other(String),
}

impl SchemeCategory {
    pub const KNOWN: [SchemeCategory; 6] = [
        Self::Finance,
        Self::Insurance,
        Self::Subsidy,
        Self::Equipment,
        Self::Organic,
        Self::Information,
    ];

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "finance" => Self::Finance,
            "insurance" => Self::Insurance,
            "information" => Self::Information,
            "organic" => Self::Organic,
            "subsidy" => Self::Subsidy,
            "equipment" => Self::Equipment,
            _ => Self::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Finance => "finance",
            Self::Insurance => "insurance",
            Self::Information => "information",
            Self::Organic => "organic",
            Self::Subsidy => "subsidy",
            Self::Equipment => "equipment",
            Self::Other(raw) => raw,
        }
    }

    /// Display label used by the category tabs.
    pub fn label(&self) -> &str {
        match self {
            Self::Finance => "Financial Support",
            Self::Insurance => "Insurance",
            Self::Information => "Information",
            Self::Organic => "Organic Farming",
            Self::Subsidy => "Subsidies",
            Self::Equipment => "Equipment",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for SchemeCategory {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl Serialize for SchemeCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchemeCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::string(deserializer).map(|s| Self::parse(&s))
    }
}

/// One entry of the scheme list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemeSummary {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u32,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub eligibility: String,
    #[serde(deserialize_with = "lenient::string")]
    pub benefits: String,
    #[serde(deserialize_with = "lenient::string")]
    pub application_process: String,
    #[serde(deserialize_with = "lenient::string")]
    pub last_date: String,
    pub category: SchemeCategory,
    #[serde(deserialize_with = "lenient::string")]
    pub read_time: String,
    #[serde(
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub popularity: u64,
    #[serde(deserialize_with = "lenient::string")]
    pub success_rate: String,
    #[serde(
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub official_url: Option<String>,
}

impl SchemeSummary {
    /// The built-in record shown when the scheme list cannot be fetched.
    pub fn fallback() -> Self {
        Self {
            id: 1,
            title: "PM-KISAN".to_string(),
            description: "Direct income support to farmers".to_string(),
            eligibility: "Small and marginal farmers".to_string(),
            benefits: "₹6,000 per year".to_string(),
            application_process: "Apply through PM-KISAN portal".to_string(),
            last_date: "Ongoing".to_string(),
            category: SchemeCategory::Finance,
            read_time: "5 min".to_string(),
            rating: Some(4.5),
            popularity: 1200,
            success_rate: "85%".to_string(),
            official_url: Some("https://pmkisan.gov.in/".to_string()),
        }
    }

    /// Where "Apply Now" should lead for this scheme.
    pub fn apply_url(&self) -> String {
        resolve_official_url(&self.title, self.official_url.as_deref())
    }
}

/// Extended information about a single scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemeDetail {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub detailed_description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub eligibility: String,
    #[serde(deserialize_with = "lenient::string")]
    pub benefits: String,
    #[serde(deserialize_with = "lenient::string")]
    pub application_process: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub required_documents: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub last_date: String,
    #[serde(
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub official_url: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_info: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_info: Option<String>,
}

/// A summary overlaid with the fields of its fetched detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedScheme {
    #[serde(flatten)]
    pub summary: SchemeSummary,
    pub detailed_description: String,
    pub required_documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub apply_url: String,
}

impl EnrichedScheme {
    /// Overwrites the summary's eligibility, benefits, application process,
    /// deadline and URL with the detail's values. The summary's title,
    /// category and list metadata are kept.
    pub fn merge(summary: SchemeSummary, detail: SchemeDetail) -> Self {
        let summary = SchemeSummary {
            eligibility: detail.eligibility,
            benefits: detail.benefits,
            application_process: detail.application_process,
            last_date: detail.last_date,
            official_url: detail.official_url,
            ..summary
        };
        let apply_url = summary.apply_url();

        Self {
            summary,
            detailed_description: detail.detailed_description,
            required_documents: detail.required_documents,
            contact_info: detail.contact_info,
            additional_info: detail.additional_info,
            apply_url,
        }
    }
}

/// Tab entry with the number of schemes it would show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Counts for the "all" tab followed by each known category, in tab order.
pub fn category_counts(schemes: &[SchemeSummary]) -> Vec<CategoryCount> {
    let mut counts = vec![CategoryCount {
        id: "all".to_string(),
        name: "All Schemes".to_string(),
        count: schemes.len(),
    }];

    counts.extend(SchemeCategory::KNOWN.iter().map(|category| CategoryCount {
        id: category.as_str().to_string(),
        name: category.label().to_string(),
        count: schemes.iter().filter(|s| &s.category == category).count(),
    }));

    counts
}

/// Filters by category id, ignoring ASCII case; `None`, blank and `"all"`
/// keep everything.
pub fn filter_by_category(
    schemes: Vec<SchemeSummary>,
    category: Option<&str>,
) -> Vec<SchemeSummary> {
    match category.map(str::trim) {
        None | Some("") => schemes,
        Some(id) if id.eq_ignore_ascii_case("all") => schemes,
        Some(id) => schemes
            .into_iter()
            .filter(|s| s.category.as_str().trim().eq_ignore_ascii_case(id))
            .collect(),
    }
}

fn resolve_official_url(title: &str, official_url: Option<&str>) -> String {
    if let Some(url) = official_url.map(str::trim).filter(|u| !u.is_empty()) {
        return url.to_string();
    }

    KNOWN_OFFICIAL_URLS
        .iter()
        .find(|(known, _)| *known == title)
        .map(|(_, url)| url.to_string())
        .unwrap_or_else(|| DEFAULT_OFFICIAL_URL.to_string())
}
