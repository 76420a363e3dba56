use omniscout_common::GenerationRequest;

use crate::platform_syntax::{focus_hint, syntax_rules};

pub const TARGET_SCAN_QUANTITY: &str =
    "Generate a total of 30+ unique queries across the selected categories.";
pub const SMART_QUANTITY: &str = "Generate 15-20 highly relevant queries based on the intent.";

/// Render the single instruction payload sent to the model for `request`.
pub fn render_prompt(request: &GenerationRequest) -> String {
    let platform = request.platform();
    let rules = syntax_rules(platform);

    let (mode, quantity) = if request.is_smart() {
        (smart_mode_block(request), SMART_QUANTITY)
    } else {
        (target_scan_block(request), TARGET_SCAN_QUANTITY)
    };

    let focus = focus_hint(platform)
        .map(|hint| format!("\n   - {hint}"))
        .unwrap_or_default();

    format!(
        r#"ROLE: You are "OmniScout 360", an elite offensive security engineer and OSINT specialist.
INTELLIGENCE SOURCE (PLATFORM): "{platform}"

{mode}

OBJECTIVE: Generate ELITE, HIGH-IMPACT, and COMPLEX Search Queries to uncover hidden attack surfaces, leaked data, and vulnerabilities on **{platform}**.

### CRITICAL INSTRUCTIONS:
1. **PLATFORM SPECIFIC SYNTAX**:
   - {rules}
   - **DO NOT** use syntax from other platforms. Every query must run as-is on {platform}.

2. **QUANTITY**:
   - {quantity}

3. **COMPLEXITY**:
   - Avoid basic queries. Use advanced filtering specific to the platform.{focus}

4. **INTENT CLASSIFICATION**:
   - **Offensive**: Looking for exploit points, admin panels, vulnerable versions.
   - **Defensive**: Looking for employee emails, accidental cloud bucket leaks, exposed docs.
   - **Hybrid**: Useful for both offensive recon and defensive monitoring.

### REQUIRED OUTPUT FORMAT:
Return ONLY a raw JSON array of categories, each with a "categoryName" and its "dorks". Do not include markdown formatting like ```json.
"#
    )
}

fn target_scan_block(request: &GenerationRequest) -> String {
    format!(
        r#"MODE: TARGET SCANNING
TARGET: "{target}"
SCOPE (SELECTED MODULES): {categories}
INSTRUCTION: Generate specific dorks for this target domain/keyword based strictly on the selected categories. Use each module name exactly as written as the categoryName."#,
        target = request.target(),
        categories = request.category_list(),
    )
}

fn smart_mode_block(request: &GenerationRequest) -> String {
    format!(
        r#"MODE: NATURAL LANGUAGE PROCESSING (SMART SEARCH / NLP)
USER REQUEST: "{target}"
INSTRUCTION: The user has provided a natural language description (e.g., "find open cameras", "leaked passwords for tesla", "confidential pdfs").
1. Analyze the user's intent from the request.
2. TRANSLATE this intent into precise, high-impact search queries (dorks) specifically for **{platform}**.
3. Automatically categorize the results based on what the query aims to find (e.g., if finding cameras, use 'IoT & Dashboards' category). Choose the categories yourself."#,
        target = request.target(),
        platform = request.platform(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniscout_common::{Category, Platform};

    fn scan(platform: Platform) -> GenerationRequest {
        GenerationRequest::new("tesla.com", [Category::Login, Category::Admin], platform, false)
            .unwrap()
    }

    #[test]
    fn prompt_contains_only_the_selected_platform_rules() {
        for platform in Platform::ALL {
            for request in [scan(platform), GenerationRequest::smart("open cameras", platform).unwrap()] {
                let prompt = render_prompt(&request);
                assert!(prompt.contains(syntax_rules(platform)), "{platform} rules missing");

                for other in Platform::ALL.into_iter().filter(|p| *p != platform) {
                    assert!(
                        !prompt.contains(syntax_rules(other)),
                        "{platform} prompt leaks {other} rules"
                    );
                }
            }
        }
    }

    #[test]
    fn non_web_prompts_never_mention_google_operators_as_allowed() {
        for platform in [Platform::Shodan, Platform::GitHub, Platform::Censys] {
            let prompt = render_prompt(&scan(platform));
            assert!(!prompt.contains("Use Google Search Operators"));
        }
    }

    #[test]
    fn target_scan_lists_categories_verbatim() {
        let prompt = render_prompt(&scan(Platform::Google));
        assert!(prompt.contains("MODE: TARGET SCANNING"));
        assert!(prompt.contains("TARGET: \"tesla.com\""));
        assert!(prompt.contains("SCOPE (SELECTED MODULES): Login Pages, Admin Panels"));
        assert!(prompt.contains(TARGET_SCAN_QUANTITY));
        assert!(!prompt.contains(SMART_QUANTITY));
        assert!(!prompt.contains("SMART SEARCH"));
    }

    #[test]
    fn smart_mode_delegates_categories() {
        let request = GenerationRequest::new(
            "leaked admin credentials for Tesla",
            [Category::Cloud],
            Platform::GitHub,
            true,
        )
        .unwrap();
        let prompt = render_prompt(&request);

        assert!(prompt.contains("SMART SEARCH / NLP"));
        assert!(prompt.contains("USER REQUEST: \"leaked admin credentials for Tesla\""));
        assert!(prompt.contains("Choose the categories yourself"));
        assert!(prompt.contains(SMART_QUANTITY));
        assert!(!prompt.contains(TARGET_SCAN_QUANTITY));
        assert!(!prompt.contains("SELECTED MODULES"));
    }

    #[test]
    fn focus_hint_follows_platform() {
        assert!(render_prompt(&scan(Platform::Shodan)).contains("CVEs"));
        assert!(!render_prompt(&scan(Platform::Google)).contains("CVEs"));
        assert!(!render_prompt(&scan(Platform::Google)).contains("leaked secrets"));
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(render_prompt(&scan(Platform::Bing)), render_prompt(&scan(Platform::Bing)));
    }
}
