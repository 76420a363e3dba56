use std::fmt::Write;

use omniscout_common::{GenerationRequest, GenerationResult};

use crate::export::to_query_list;

pub const EMPTY_RESULT_MESSAGE: &str = "NO VECTORS FOUND FOR SELECTED PARAMETERS.";

/// Human-readable results report: one block per category, then a summary.
///
/// With `links`, every dork also shows the platform search URL.
pub fn render_report(request: &GenerationRequest, result: &GenerationResult, links: bool) -> String {
    if result.is_empty() {
        return format!("{EMPTY_RESULT_MESSAGE}\n");
    }

    let platform = request.platform();
    let mut out = String::new();

    for category in result.categories() {
        let _ = writeln!(out, "## {} ({})", category.category_name, category.dorks.len());
        for dork in &category.dorks {
            let _ = writeln!(out, "  [{}] {}", dork.intent, dork.description);
            let _ = writeln!(out, "    {}", dork.query);
            if links {
                let _ = writeln!(out, "    -> {}", platform.search_url(&dork.query));
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", summary_line(request, result));
    out
}

/// The "copy all" listing: one query per line.
pub fn render_queries(result: &GenerationResult) -> String {
    if result.is_empty() {
        return format!("{EMPTY_RESULT_MESSAGE}\n");
    }
    format!("{}\n", to_query_list(result))
}

pub fn summary_line(request: &GenerationRequest, result: &GenerationResult) -> String {
    let mode = if request.is_smart() { "SMART NLP" } else { "STANDARD" };
    format!(
        "TARGET: {} | PLATFORM: {} | MODE: {} | TOTAL: {}",
        request.target(),
        request.platform(),
        mode,
        result.total_dorks()
    )
}
