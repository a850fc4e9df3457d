//! Best-effort extraction of the three output regions from raw backend text.
//!
//! Strategies are tried in order and the first match wins:
//! 1. `strict`: one regex over the three markers in order.
//! 2. `marker_split`: split on any marker, take pieces 1..=3.
//! 3. whole text as the deliverable.
//!
//! Nothing is ever dropped: text that no strategy understands surfaces as the
//! deliverable.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

pub const MAX_QUERIES: usize = 3;

static STRICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)----THOUGHTS----\s*(.*?)\s*----SEARCH_QUERIES----\s*(.*?)\s*----DELIVERABLE----\s*(.*)")
        .unwrap()
});

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)----THOUGHTS----|----SEARCH_QUERIES----|----DELIVERABLE----").unwrap()
});

/// Reasoning, queries and deliverable recovered from one backend response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedOutput {
    pub reasoning: String,
    pub queries: Vec<String>,
    pub deliverable: String,
    /// Name of the strategy that produced this result.
    pub strategy: &'static str,
}

struct Regions<'a> {
    reasoning: &'a str,
    queries: &'a str,
    deliverable: &'a str,
}

type Strategy = for<'a> fn(&'a str) -> Option<Regions<'a>>;

const STRATEGIES: &[(&str, Strategy)] = &[("strict", strict), ("marker_split", marker_split)];

fn strict(raw: &str) -> Option<Regions<'_>> {
    let caps = STRICT_RE.captures(raw)?;
    Some(Regions {
        reasoning: caps.get(1)?.as_str(),
        queries: caps.get(2)?.as_str(),
        deliverable: caps.get(3)?.as_str(),
    })
}

fn marker_split(raw: &str) -> Option<Regions<'_>> {
    let pieces: Vec<&str> = MARKER_RE.split(raw).collect();
    if pieces.len() < 4 {
        return None;
    }
    Some(Regions {
        reasoning: pieces[1],
        queries: pieces[2],
        deliverable: pieces[3],
    })
}

/// Parse raw backend output. Never fails.
pub fn parse_output(raw: &str) -> ParsedOutput {
    for &(name, strategy) in STRATEGIES {
        if let Some(regions) = strategy(raw) {
            return ParsedOutput {
                reasoning: regions.reasoning.trim().to_string(),
                queries: parse_queries(regions.queries),
                deliverable: regions.deliverable.trim().to_string(),
                strategy: name,
            };
        }
    }
    ParsedOutput {
        reasoning: String::new(),
        queries: Vec::new(),
        deliverable: raw.trim().to_string(),
        strategy: "whole_text",
    }
}

/// Parse a query block: a JSON array, a bulleted list, or one comma-separated
/// line. At most [`MAX_QUERIES`] entries are kept.
pub fn parse_queries(raw: &str) -> Vec<String> {
    let block = strip_code_fence(raw.trim());

    if block.starts_with('[') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(block) {
            return items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s.trim().to_string(),
                    other => other.to_string(),
                })
                .filter(|q| !q.is_empty())
                .take(MAX_QUERIES)
                .collect();
        }
    }

    let lines: Vec<&str> = block
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .collect();

    if let [only] = lines.as_slice() {
        if only.contains(',') {
            return only
                .split(',')
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .take(MAX_QUERIES)
                .map(String::from)
                .collect();
        }
    }

    lines.into_iter().take(MAX_QUERIES).map(String::from).collect()
}

fn strip_bullet(line: &str) -> &str {
    line.trim_matches(|c: char| c == '-' || c == '*' || c.is_whitespace())
}

/// Unwrap a ```` ```json ... ``` ```` block, if present.
fn strip_code_fence(block: &str) -> &str {
    let Some(rest) = block.strip_prefix("```") else {
        return block;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
