//! Per-platform query syntax rules embedded in the prompt.
//!
//! Each entry lists the operators the platform understands and names the
//! foreign operators the model must not use. Only the selected platform's
//! entry ever reaches the prompt.

use omniscout_common::Platform;

pub fn syntax_rules(platform: Platform) -> &'static str {
    match platform {
        Platform::Google => {
            "Use Google Search Operators: site:, filetype:, inurl:, intitle:, intext:, -exclude. \
             Nest logic with OR/AND. DO NOT use Shodan or Censys filters like 'port:' or 'services.'."
        }
        Platform::Bing => {
            "Use Bing Search Operators: site:, filetype:, ip:, instreamset:, hasfeed:. \
             Note: Bing supports 'ip:' operator which Google does not. \
             DO NOT use Shodan or GitHub fields like 'port:' or 'repo:'."
        }
        Platform::DuckDuckGo => {
            "Use DuckDuckGo Operators: similar to Google but optimize for privacy-focused indexing. \
             site:, filetype:. DO NOT use Bing's 'ip:' operator or any Shodan, GitHub or Censys field."
        }
        Platform::Shodan => {
            "Use SHODAN Filters: org:, ssl:, port:, product:, http.title:, hostname:, os:, net:. \
             DO NOT use Google operators like 'site:' or 'inurl:'. Example: 'org:\"Target\" port:443'."
        }
        Platform::GitHub => {
            "Use GITHUB Search Syntax: org:, user:, repo:, language:, path:, filename:, extension:. \
             DO NOT use 'site:github.com'. Use the native GitHub search fields. \
             Example: 'org:Target filename:.env'."
        }
        Platform::Censys => {
            "Use CENSYS Search Language: services.port:, services.http.response.headers.server:, \
             location.country_code:. DO NOT use Google operators like 'site:' or Shodan filters like 'org:'. \
             Example: 'services.tls.certificates.leaf_data.names: example.com'."
        }
    }
}

/// Extra complexity guidance for platforms with a distinctive hunting ground.
pub fn focus_hint(platform: Platform) -> Option<&'static str> {
    match platform {
        Platform::Shodan => {
            Some("Look for specific vulnerabilities (CVEs), obsolete headers, or exposed databases.")
        }
        Platform::GitHub => {
            Some("Look for leaked secrets, specific config files, and internal code.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_platform_has_distinct_rules() {
        for a in Platform::ALL {
            for b in Platform::ALL {
                if a != b {
                    assert!(
                        !syntax_rules(a).contains(syntax_rules(b)),
                        "{a} rules embed {b} rules"
                    );
                }
            }
        }
    }

    #[test]
    fn non_web_platforms_forbid_web_operators() {
        for platform in [Platform::Shodan, Platform::GitHub, Platform::Censys] {
            let rules = syntax_rules(platform);
            assert!(rules.contains("DO NOT use"), "{platform} has no prohibition");
            assert!(rules.contains("site:"), "{platform} does not name site:");
        }
    }

    #[test]
    fn rules_name_the_platform() {
        for platform in Platform::ALL {
            assert!(
                syntax_rules(platform)
                    .to_lowercase()
                    .contains(&platform.name().to_lowercase()),
                "{platform}"
            );
        }
    }

    #[test]
    fn only_shodan_and_github_have_focus_hints() {
        assert!(focus_hint(Platform::Shodan).unwrap().contains("CVEs"));
        assert!(focus_hint(Platform::GitHub).unwrap().contains("secrets"));
        assert!(focus_hint(Platform::Google).is_none());
        assert!(focus_hint(Platform::Censys).is_none());
    }
}
