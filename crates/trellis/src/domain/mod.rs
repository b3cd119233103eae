//! Domain types for the issue dependency graph.
//!
//! The canonical [`Issue`] is the one entity every component works on: the
//! normalizer creates it from a raw provider record, the resolver mutates
//! its derived fields in place, and the renderer projects it into a diagram
//! node.

pub mod provider;

pub use provider::{ProviderInfo, ProviderKind, RawIssue};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Globally unique identifier for an issue: its tracker URL.
///
/// The collection is keyed by this value; relation edges reference issues
/// through it rather than holding copies. `Ord` gives the registry its
/// deterministic lexicographic iteration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IssueUrl(pub String);

impl IssueUrl {
    /// Create a new issue URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IssueUrl {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IssueUrl {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Open/closed state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Issue is open.
    Open,
    /// Issue has been closed.
    Closed,
}

impl IssueState {
    /// Maps a provider's native state string.
    ///
    /// GitHub reports `open`/`closed`, GitLab `opened`/`closed`; anything
    /// that is not `closed` counts as open.
    #[must_use]
    pub fn from_provider_state(state: &str) -> Self {
        if state == "closed" {
            Self::Closed
        } else {
            Self::Open
        }
    }
}

/// A tracker label attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Hex color without the leading `#`.
    pub color: String,
}

/// A person assigned to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Display name.
    pub name: String,
    /// Tracker username.
    pub username: String,
}

/// Canonical issue entity, one per tracker item.
///
/// Mapped fields come from the provider record; derived fields are owned by
/// the graph resolver and start at their defaults until a resolution pass
/// runs. All fields serialize so a persisted snapshot round-trips the
/// resolved state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Tracker URL, the primary key.
    pub url: IssueUrl,

    /// Tracker-local issue number.
    pub number: u64,

    /// Issue title.
    pub title: String,

    /// Open/closed state.
    pub state: IssueState,

    /// Raw text body, the directive-mining source.
    pub body: String,

    /// URL of the repository the issue belongs to.
    pub repo_url: String,

    /// Labels in tracker order.
    pub labels: Vec<Label>,

    /// Assignees in tracker order.
    pub assignees: Vec<Person>,

    /// Which tracker kind produced this issue, with provider-specific
    /// capability detail.
    pub provider: ProviderInfo,

    /// Issues this one is blocked by.
    #[serde(default)]
    pub depends_on: BTreeSet<IssueUrl>,

    /// Issues this one blocks.
    #[serde(default)]
    pub blocks: BTreeSet<IssueUrl>,

    /// True while the issue has no resolved relation edge.
    #[serde(default = "default_true")]
    pub is_orphan: bool,

    /// Excluded from rendered output (duplicate or pull request).
    #[serde(default)]
    pub hidden: bool,

    /// Set by the epic-linkage closure pass.
    #[serde(default)]
    pub linked_with_epic: bool,

    /// URLs this issue claims to duplicate.
    #[serde(default)]
    pub duplicates: Vec<IssueUrl>,

    /// Resolution-time errors, e.g. a reference to an unknown issue.
    #[serde(default)]
    pub errors: Vec<String>,

    /// Own cost before aggregation.
    #[serde(default = "default_weight")]
    pub base_weight: i64,

    /// Own multiplier before chaining.
    #[serde(default = "default_weight")]
    pub weight_multiplier: i64,
}

fn default_true() -> bool {
    true
}

fn default_weight() -> i64 {
    1
}

impl Issue {
    /// True if the issue is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }

    /// True if the issue participates in the graph and has no remaining
    /// dependency.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.is_orphan && self.depends_on.is_empty()
    }

    /// True if the issue carries the configured epic label.
    #[must_use]
    pub fn is_epic(&self, epic_label: &str) -> bool {
        self.labels.iter().any(|label| label.name == epic_label)
    }

    /// Scheme and host of the issue URL, e.g. `https://github.com`.
    ///
    /// Empty when the URL has no scheme, which only happens with corrupt
    /// input; reference resolution then produces unresolvable targets that
    /// surface as per-issue errors instead of panics.
    #[must_use]
    pub fn provider_origin(&self) -> &str {
        match split_origin(self.url.as_str()) {
            Some((origin, _)) => origin,
            None => "",
        }
    }

    /// Repository path of the issue URL with a leading slash,
    /// e.g. `/acme/widgets` for `https://github.com/acme/widgets/issues/7`.
    #[must_use]
    pub fn path(&self) -> String {
        let url_path = match split_origin(self.url.as_str()) {
            Some((_, path)) => path,
            None => "",
        };
        let parts: Vec<&str> = url_path.split('/').collect();
        if parts.len() < 2 {
            return String::new();
        }
        parts[..parts.len() - 2].join("/")
    }

    /// Short display name, e.g. `acme/widgets#7`.
    #[must_use]
    pub fn node_name(&self) -> String {
        let path = self.path();
        format!("{}#{}", path.trim_start_matches('/'), self.number)
    }

    /// Resolves a mined reference token to a canonical issue URL.
    ///
    /// Absolute URLs pass through. `owner/repo#n` resolves against this
    /// issue's provider origin, bare `#n` against its own repository path.
    /// A token with neither scheme nor `#` still yields a best-effort
    /// candidate so the resolver can surface it as an unresolved reference.
    #[must_use]
    pub fn resolve_reference(&self, token: &str) -> IssueUrl {
        if token.contains("://") {
            return IssueUrl::from(token);
        }
        let (path_part, number) = match token.split_once('#') {
            Some((path, number)) => (path, number),
            None => (token, ""),
        };
        let path = if path_part.is_empty() {
            self.path()
        } else {
            format!("/{}", path_part.trim_start_matches('/'))
        };
        IssueUrl(format!(
            "{}{}/issues/{}",
            self.provider_origin(),
            path,
            number
        ))
    }

    /// Restores every derived field to its pre-resolution default.
    ///
    /// Run by the reset pass so resolving an already-resolved collection is
    /// idempotent.
    pub fn reset_derived(&mut self) {
        self.depends_on.clear();
        self.blocks.clear();
        self.is_orphan = true;
        self.hidden = false;
        self.linked_with_epic = false;
        self.duplicates.clear();
        self.errors.clear();
        self.base_weight = 1;
        self.weight_multiplier = 1;
    }
}

/// Splits `scheme://host/rest` into (`scheme://host`, `/rest`).
fn split_origin(url: &str) -> Option<(&str, &str)> {
    let scheme_end = url.find("://")?;
    let host_start = scheme_end + 3;
    match url[host_start..].find('/') {
        Some(i) => Some((&url[..host_start + i], &url[host_start + i..])),
        None => Some((url, "")),
    }
}
