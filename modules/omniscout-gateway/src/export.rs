//! Formatters that turn a [`GenerationResult`] into downloadable text, and
//! the writer that files them under dated export names.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use omniscout_common::{GenerationRequest, GenerationResult, ParseEnumError, Platform};

const CSV_HEADER: &str = "Category,Intent,Platform,Description,Query";
const TXT_SEPARATOR_WIDTH: usize = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Txt];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn render(
        &self,
        result: &GenerationResult,
        platform: Platform,
    ) -> serde_json::Result<String> {
        match self {
            ExportFormat::Json => to_json(result),
            ExportFormat::Csv => Ok(to_csv(result, platform)),
            ExportFormat::Txt => Ok(to_text(result)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim();
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseEnumError {
                kind: "export format",
                value: s.to_string(),
                expected: ExportFormat::ALL.map(|f| f.extension()).join(", "),
            })
    }
}

/// Pretty-printed JSON array, the same shape the model returns.
pub fn to_json(result: &GenerationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn to_csv(result: &GenerationResult, platform: Platform) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for category in result.categories() {
        for dork in &category.dorks {
            let intent = dork.intent.to_string();
            let row = [
                category.category_name.as_str(),
                intent.as_str(),
                platform.name(),
                dork.description.as_str(),
                dork.query.as_str(),
            ]
            .map(csv_field)
            .join(",");

            out.push_str(&row);
            out.push('\n');
        }
    }
    out
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn to_text(result: &GenerationResult) -> String {
    let separator = "-".repeat(TXT_SEPARATOR_WIDTH);
    let mut out = String::new();

    for category in result.categories() {
        out.push_str(&format!("=== {} ===\n", category.category_name));
        for dork in &category.dorks {
            out.push_str(&format!("[{}] {}\n{}\n\n", dork.intent, dork.description, dork.query));
        }
        out.push_str(&separator);
        out.push_str("\n\n");
    }
    out
}

/// Every query in order, one per line ("copy all").
pub fn to_query_list(result: &GenerationResult) -> String {
    result.all_queries().join("\n")
}

/// Lowercase the target and replace anything outside `[a-z0-9]` with `_`.
pub fn sanitize_target(target: &str) -> String {
    target
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
        .collect()
}

pub fn export_filename(
    target: &str,
    platform: Platform,
    date: NaiveDate,
    format: ExportFormat,
) -> String {
    format!(
        "omniscout_{}_{}_{}.{}",
        sanitize_target(target),
        platform.slug(),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Where exports go: the explicit directory, else the configured one, else
/// the working directory.
pub fn resolve_dir(out_dir: Option<PathBuf>, configured: Option<PathBuf>) -> PathBuf {
    out_dir.or(configured).unwrap_or_else(|| PathBuf::from("."))
}

/// Render `result` as `format` and write it into `dir` (created if missing)
/// under its dated export filename. Returns the written path.
pub fn write_to(
    dir: &Path,
    request: &GenerationRequest,
    result: &GenerationResult,
    format: ExportFormat,
    date: NaiveDate,
) -> Result<PathBuf> {
    let contents = format
        .render(result, request.platform())
        .with_context(|| format!("Failed to render {format} export"))?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let path = dir.join(export_filename(request.target(), request.platform(), date, format));
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    tracing::info!(path = %path.display(), format = %format, "Export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniscout_common::{CategoryResult, Dork, Intent};

    fn dork(query: &str, description: &str, category: &str, intent: Intent) -> Dork {
        Dork {
            query: query.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            intent,
        }
    }

    fn sample() -> GenerationResult {
        GenerationResult::new(vec![
            CategoryResult {
                category_name: "Login Pages".to_string(),
                dorks: vec![dork(
                    "site:tesla.com intitle:\"sign in\"",
                    "Sign-in pages",
                    "Login Pages",
                    Intent::Offensive,
                )],
            },
            CategoryResult {
                category_name: "Admin Panels".to_string(),
                dorks: vec![
                    dork("site:tesla.com inurl:admin", "Admin, consoles", "Admin Panels", Intent::Hybrid),
                    dork("site:tesla.com inurl:wp-admin", "WordPress admin", "Admin Panels", Intent::Defensive),
                ],
            },
        ])
    }

    #[test]
    fn csv_quotes_every_field_and_doubles_quotes() {
        let csv = to_csv(&sample(), Platform::Google);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Category,Intent,Platform,Description,Query");
        assert_eq!(
            lines[1],
            r#""Login Pages","Offensive","Google","Sign-in pages","site:tesla.com intitle:""sign in""""#
        );
        assert_eq!(
            lines[2],
            r#""Admin Panels","Hybrid","Google","Admin, consoles","site:tesla.com inurl:admin""#
        );
        assert_eq!(lines.len(), 4);
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn csv_of_empty_result_is_header_only() {
        assert_eq!(to_csv(&GenerationResult::default(), Platform::Bing), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn json_export_round_trips() {
        let result = sample();
        let json = to_json(&result).unwrap();

        assert!(json.starts_with("[\n  {"));
        let parsed: GenerationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn text_export_layout() {
        let result = GenerationResult::new(vec![sample().into_categories().remove(0)]);
        let expected = format!(
            "=== Login Pages ===\n[Offensive] Sign-in pages\nsite:tesla.com intitle:\"sign in\"\n\n{}\n\n",
            "-".repeat(35)
        );
        assert_eq!(to_text(&result), expected);
    }

    #[test]
    fn query_list_preserves_order() {
        assert_eq!(
            to_query_list(&sample()),
            "site:tesla.com intitle:\"sign in\"\nsite:tesla.com inurl:admin\nsite:tesla.com inurl:wp-admin"
        );
    }

    #[test]
    fn filename_sanitizes_target() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(
            export_filename("Tesla.com", Platform::DuckDuckGo, date, ExportFormat::Csv),
            "omniscout_tesla_com_duckduckgo_2025-03-09.csv"
        );
        assert_eq!(sanitize_target("Find open cameras!"), "find_open_cameras_");
        assert_eq!(sanitize_target("caf\u{e9}"), "caf_");
    }

    #[test]
    fn export_dir_prefers_flag_then_config() {
        let flag = Some(PathBuf::from("out"));
        let configured = Some(PathBuf::from("./exports"));

        assert_eq!(resolve_dir(flag.clone(), configured.clone()), PathBuf::from("out"));
        assert_eq!(resolve_dir(None, configured), PathBuf::from("./exports"));
        assert_eq!(resolve_dir(None, None), PathBuf::from("."));
    }

    #[test]
    fn write_to_creates_dated_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested");
        let request = GenerationRequest::new(
            "Tesla.com",
            [omniscout_common::Category::Login],
            Platform::Shodan,
            false,
        )
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();

        let path = write_to(&dir, &request, &sample(), ExportFormat::Txt, date).unwrap();

        assert_eq!(path, dir.join("omniscout_tesla_com_shodan_2025-11-02.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), to_text(&sample()));
    }

    #[test]
    fn write_to_csv_uses_request_platform() {
        let tmp = tempfile::tempdir().unwrap();
        let request = GenerationRequest::smart("open cameras", Platform::Censys).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

        let path = write_to(tmp.path(), &request, &sample(), ExportFormat::Csv, date).unwrap();

        assert!(path.ends_with("omniscout_open_cameras_censys_2025-01-31.csv"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.lines().nth(1).unwrap().contains("\"Censys\""));
    }

    #[test]
    fn format_parses_extension() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
