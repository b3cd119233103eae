//! Directive mining over issue bodies.
//!
//! Issue text carries relation assertions ("Blocks #12", "depends on
//! acme/widgets#3") and inline metadata (`trellis.weight_multiplier: 3`).
//! Extraction is a pure function of the body text plus the issuing issue's
//! own path: reference tokens resolve to canonical URLs here, but no
//! collection lookup happens until the resolver applies the directives.

use crate::domain::{Issue, IssueUrl};
use regex::Regex;
use std::sync::LazyLock;

// Reference tokens: a short form with `#` must be tried before the plain
// URL-ish class, otherwise `owner/repo#3` captures only `owner/repo`.
const REFERENCE_TOKEN: &str = r"([a-z0-9/_-]*#[0-9]+|[a-z0-9:/_.-]+)";

static DEPENDS_ON: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(&format!(
        r"(?i)(?:depends on|depend on|blocked by|block by|requires|require|parent of) {REFERENCE_TOKEN}"
    )) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

static BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(&format!(
        r"(?i)(?:blocks|block|addresses|address|part of|child of|fixes|fix) {REFERENCE_TOKEN}"
    )) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

static DUPLICATE_OF: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(&format!(
        r"(?i)(?:duplicates|duplicate of|duplicate|dup of|dup) {REFERENCE_TOKEN}"
    )) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

static WEIGHT_MULTIPLIER: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"(?i)trellis\.weight_multiplier[:= ]+([0-9]+)") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

static BASE_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"(?i)trellis\.base_weight[:= ]+([0-9]+)") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

static HIDE_MARKER: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"(?i)trellis\.hide\b") {
    Ok(re) => re,
    Err(_) => unreachable!("static regex pattern"),
});

/// A recognized phrase pattern mined from an issue body.
///
/// Weight payloads stay raw strings: the resolver owns integer parsing so
/// an unparseable value degrades to the default there instead of failing
/// extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// This issue duplicates the target.
    DuplicateOf(IssueUrl),
    /// Inline `trellis.weight_multiplier` override, raw digit string.
    WeightMultiplier(String),
    /// Bare `trellis.hide` marker: drop the issue from the collection.
    Hide,
    /// Inline `trellis.base_weight` override, raw digit string.
    BaseWeight(String),
    /// This issue is blocked by the target.
    DependsOn(IssueUrl),
    /// This issue blocks the target.
    Blocks(IssueUrl),
}

/// Mines all directives from an issue's body.
///
/// Directives are returned in resolver application order: duplicate,
/// weight-multiplier, hide, base-weight, depends-on, blocks. Depends-on
/// and blocks yield every non-overlapping match; duplicate and the weight
/// overrides keep only the last match. References resolving to the issue's
/// own URL are dropped, so an issue is never made adjacent to itself.
#[must_use]
pub fn extract_directives(issue: &Issue) -> Vec<Directive> {
    let mut directives = Vec::new();
    if issue.body.is_empty() {
        return directives;
    }

    if let Some(caps) = DUPLICATE_OF.captures_iter(&issue.body).last() {
        let target = issue.resolve_reference(&caps[1]);
        if target != issue.url {
            directives.push(Directive::DuplicateOf(target));
        }
    }

    if let Some(caps) = WEIGHT_MULTIPLIER.captures_iter(&issue.body).last() {
        directives.push(Directive::WeightMultiplier(caps[1].to_string()));
    }

    if HIDE_MARKER.is_match(&issue.body) {
        directives.push(Directive::Hide);
    }

    if let Some(caps) = BASE_WEIGHT.captures_iter(&issue.body).last() {
        directives.push(Directive::BaseWeight(caps[1].to_string()));
    }

    for caps in DEPENDS_ON.captures_iter(&issue.body) {
        let target = issue.resolve_reference(&caps[1]);
        if target != issue.url {
            directives.push(Directive::DependsOn(target));
        }
    }

    for caps in BLOCKS.captures_iter(&issue.body) {
        let target = issue.resolve_reference(&caps[1]);
        if target != issue.url {
            directives.push(Directive::Blocks(target));
        }
    }

    directives
}
