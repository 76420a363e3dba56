use std::collections::BTreeSet;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ParseEnumError, RequestError};

// --- Category ---------------------------------------------------------------

/// A scan module the user can select in target-scan mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Index Dorks")]
    Index,
    #[serde(rename = "Directory Listings")]
    Directory,
    #[serde(rename = "Login Pages")]
    Login,
    #[serde(rename = "SQL Errors & Vulns")]
    Sql,
    #[serde(rename = "Sensitive Files")]
    Sensitive,
    #[serde(rename = "Admin Panels")]
    Admin,
    #[serde(rename = "Backup & Configs")]
    Backup,
    #[serde(rename = "IoT & Dashboards")]
    Devices,
    #[serde(rename = "Code & Credentials")]
    Code,
    #[serde(rename = "Cloud Buckets")]
    Cloud,
    #[serde(rename = "Parameter Exploits")]
    Parameters,
    #[serde(rename = "Tech/Framework Specific")]
    Tech,
    #[serde(rename = "Advanced Custom")]
    Custom,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Index,
        Category::Directory,
        Category::Login,
        Category::Sql,
        Category::Sensitive,
        Category::Admin,
        Category::Backup,
        Category::Devices,
        Category::Code,
        Category::Cloud,
        Category::Parameters,
        Category::Tech,
        Category::Custom,
    ];

    /// Human-readable name, also what the model sees in the prompt.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Index => "Index Dorks",
            Category::Directory => "Directory Listings",
            Category::Login => "Login Pages",
            Category::Sql => "SQL Errors & Vulns",
            Category::Sensitive => "Sensitive Files",
            Category::Admin => "Admin Panels",
            Category::Backup => "Backup & Configs",
            Category::Devices => "IoT & Dashboards",
            Category::Code => "Code & Credentials",
            Category::Cloud => "Cloud Buckets",
            Category::Parameters => "Parameter Exploits",
            Category::Tech => "Tech/Framework Specific",
            Category::Custom => "Advanced Custom",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Index => "index",
            Category::Directory => "directory",
            Category::Login => "login",
            Category::Sql => "sql",
            Category::Sensitive => "sensitive",
            Category::Admin => "admin",
            Category::Backup => "backup",
            Category::Devices => "devices",
            Category::Code => "code",
            Category::Cloud => "cloud",
            Category::Parameters => "parameters",
            Category::Tech => "tech",
            Category::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    /// Accepts the slug or the display name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.slug().eq_ignore_ascii_case(needle) || c.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ParseEnumError {
                kind: "category",
                value: s.to_string(),
                expected: Category::ALL.map(|c| c.slug()).join(", "),
            })
    }
}

// --- Platform ---------------------------------------------------------------

/// The search or intelligence index a query is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Google,
    Bing,
    DuckDuckGo,
    Shodan,
    GitHub,
    Censys,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Google,
        Platform::Bing,
        Platform::DuckDuckGo,
        Platform::Shodan,
        Platform::GitHub,
        Platform::Censys,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Google => "Google",
            Platform::Bing => "Bing",
            Platform::DuckDuckGo => "DuckDuckGo",
            Platform::Shodan => "Shodan",
            Platform::GitHub => "GitHub",
            Platform::Censys => "Censys",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Platform::Google => "google",
            Platform::Bing => "bing",
            Platform::DuckDuckGo => "duckduckgo",
            Platform::Shodan => "shodan",
            Platform::GitHub => "github",
            Platform::Censys => "censys",
        }
    }

    /// Link that runs `query` on this platform's own search page.
    pub fn search_url(&self, query: &str) -> String {
        let (base, params) = match self {
            Platform::Google => ("https://www.google.com/search", vec![("q", query)]),
            Platform::Bing => ("https://www.bing.com/search", vec![("q", query)]),
            Platform::DuckDuckGo => ("https://duckduckgo.com/", vec![("q", query)]),
            Platform::Shodan => ("https://www.shodan.io/search", vec![("query", query)]),
            Platform::GitHub => (
                "https://github.com/search",
                vec![("q", query), ("type", "code")],
            ),
            Platform::Censys => (
                "https://search.censys.io/search",
                vec![("resource", "hosts"), ("q", query)],
            ),
        };

        let query_string = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();
        format!("{base}?{query_string}")
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseEnumError {
                kind: "platform",
                value: s.to_string(),
                expected: Platform::ALL.map(|p| p.slug()).join(", "),
            })
    }
}

// --- Results ----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Intent {
    Offensive,
    Defensive,
    Hybrid,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Offensive => write!(f, "Offensive"),
            Intent::Defensive => write!(f, "Defensive"),
            Intent::Hybrid => write!(f, "Hybrid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Dork {
    /// The actual search query string
    pub query: String,
    /// What this query aims to find
    pub description: String,
    pub category: String,
    /// Whether the dork is for offensive recon, defensive monitoring, or both.
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    pub category_name: String,
    pub dorks: Vec<Dork>,
}

/// Everything one generation call produced, in model output order.
/// Serializes as a bare JSON array of categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct GenerationResult {
    categories: Vec<CategoryResult>,
}

impl GenerationResult {
    pub fn new(categories: Vec<CategoryResult>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[CategoryResult] {
        &self.categories
    }

    pub fn into_categories(self) -> Vec<CategoryResult> {
        self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn total_dorks(&self) -> usize {
        self.categories.iter().map(|c| c.dorks.len()).sum()
    }

    /// Every query across all categories, in order.
    pub fn all_queries(&self) -> Vec<&str> {
        self.categories
            .iter()
            .flat_map(|c| c.dorks.iter().map(|d| d.query.as_str()))
            .collect()
    }
}

impl From<Vec<CategoryResult>> for GenerationResult {
    fn from(categories: Vec<CategoryResult>) -> Self {
        Self::new(categories)
    }
}

// --- Request ----------------------------------------------------------------

/// A validated request for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    target: String,
    categories: BTreeSet<Category>,
    platform: Platform,
    smart_mode: bool,
}

impl GenerationRequest {
    /// Build a request, rejecting a blank target and, outside smart mode, an
    /// empty category selection.
    pub fn new(
        target: impl Into<String>,
        categories: impl IntoIterator<Item = Category>,
        platform: Platform,
        smart_mode: bool,
    ) -> Result<Self, RequestError> {
        let target = target.into().trim().to_string();
        if target.is_empty() {
            return Err(RequestError::EmptyTarget);
        }

        let categories: BTreeSet<Category> = categories.into_iter().collect();
        if !smart_mode && categories.is_empty() {
            return Err(RequestError::NoCategories);
        }

        Ok(Self {
            target,
            categories,
            platform,
            smart_mode,
        })
    }

    /// Target-scan request over every category.
    pub fn all_categories(target: impl Into<String>, platform: Platform) -> Result<Self, RequestError> {
        Self::new(target, Category::ALL, platform, false)
    }

    /// Smart-mode request; categories are left to the model.
    pub fn smart(intent: impl Into<String>, platform: Platform) -> Result<Self, RequestError> {
        Self::new(intent, [], platform, true)
    }

    /// Build from a user selection: no categories means every category, and
    /// smart mode discards whatever categories were picked.
    pub fn from_selection(
        target: impl Into<String>,
        categories: Vec<Category>,
        platform: Platform,
        smart_mode: bool,
    ) -> Result<Self, RequestError> {
        let categories = if smart_mode {
            Vec::new()
        } else if categories.is_empty() {
            Category::ALL.to_vec()
        } else {
            categories
        };
        Self::new(target, categories, platform, smart_mode)
    }

    /// Trimmed target (a hostname, IP or keyword; an intent in smart mode).
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_smart(&self) -> bool {
        self.smart_mode
    }

    /// Selected category names joined with `", "`.
    pub fn category_list(&self) -> String {
        self.categories
            .iter()
            .map(Category::display_name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
