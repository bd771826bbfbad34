//! Robots.txt parser implementation
//!
//! This module wraps the robotstxt crate's matcher and adds `Crawl-delay`
//! lookup, which the matcher does not expose.

use robotstxt::DefaultMatcher;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rules {
    AllowAll,
    DisallowAll,
    Content(String),
}

/// Parsed robots.txt data
///
/// A thin wrapper around the raw robots.txt body. Matching is delegated to
/// `robotstxt::DefaultMatcher` on demand.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    rules: Rules,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            rules: Rules::Content(content.to_string()),
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// Used when the site has no robots.txt (a 4xx other than 401/403).
    pub fn allow_all() -> Self {
        Self {
            rules: Rules::AllowAll,
        }
    }

    /// Creates a ParsedRobots that denies everything
    ///
    /// Used when robots.txt itself is access-restricted (401/403).
    pub fn disallow_all() -> Self {
        Self {
            rules: Rules::DisallowAll,
        }
    }

    /// Checks if a URL is allowed for the given product token
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to check, absolute or path-only
    /// * `user_agent` - The product token matched against `User-agent` lines
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match &self.rules {
            Rules::AllowAll => true,
            Rules::DisallowAll => false,
            Rules::Content(content) if content.trim().is_empty() => true,
            Rules::Content(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// Groups are selected the way the allow/deny matcher selects them: the
    /// leading product token of each `User-agent` line must equal
    /// `user_agent`, ignoring case. The `*` group applies only when no group
    /// names the agent.
    ///
    /// # Returns
    ///
    /// * `Some(f64)` - The crawl delay in seconds
    /// * `None` - If no crawl delay is specified
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let content = match &self.rules {
            Rules::Content(content) => content,
            _ => return None,
        };

        // Crawl-delay applies to the most recent User-agent group
        let mut group_matches_agent = false;
        let mut group_is_wildcard = false;
        let mut seen_agent_group = false;
        let mut in_group_body = false;
        let mut crawl_delay_for_wildcard: Option<f64> = None;
        let mut crawl_delay_for_agent: Option<f64> = None;

        for line in content.lines() {
            let trimmed = line.split('#').next().unwrap_or("").trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // A User-agent line after rules starts a new group
                    if in_group_body {
                        group_matches_agent = false;
                        group_is_wildcard = false;
                        in_group_body = false;
                    }
                    if value == "*" || value.starts_with("* ") || value.starts_with("*\t") {
                        group_is_wildcard = true;
                    } else {
                        let token = product_token(value);
                        if !token.is_empty() && token.eq_ignore_ascii_case(user_agent) {
                            group_matches_agent = true;
                            seen_agent_group = true;
                        }
                    }
                }
                "crawl-delay" => {
                    in_group_body = true;
                    let Ok(delay) = value.parse::<f64>() else {
                        continue;
                    };
                    if !delay.is_finite() || delay < 0.0 {
                        continue;
                    }
                    if group_matches_agent {
                        crawl_delay_for_agent = Some(delay);
                    } else if group_is_wildcard {
                        crawl_delay_for_wildcard = Some(delay);
                    }
                }
                _ => {
                    in_group_body = true;
                }
            }
        }

        if seen_agent_group {
            crawl_delay_for_agent
        } else {
            crawl_delay_for_wildcard
        }
    }
}

/// Leading `[A-Za-z_-]` run of a `User-agent` value, e.g. `Bot` for `Bot/2.1`
fn product_token(value: &str) -> &str {
    let end = value
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '-' || c == '_'))
        .unwrap_or(value.len());
    &value[..end]
}
