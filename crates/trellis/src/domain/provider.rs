//! Provider-native issue records and their normalization.
//!
//! Fetch collaborators deliver issues in each tracker's own payload shape.
//! The types here mirror those payloads closely enough to deserialize them
//! (every field optional, so a contract violation is detected by the
//! normalizer instead of a deserialize failure), and [`RawIssue::normalize`]
//! maps one record into one canonical [`Issue`].

use super::{Issue, IssueState, IssueUrl, Label, Person};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Default swatch color for GitLab labels, which arrive as plain strings.
const DEFAULT_LABEL_COLOR: &str = "cccccc";

/// Tracker kind, without provider-specific payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// GitHub issue tracker.
    GitHub,
    /// GitLab issue tracker.
    GitLab,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => write!(f, "github"),
            Self::GitLab => write!(f, "gitlab"),
        }
    }
}

/// Provider tag carried on every canonical issue.
///
/// Capability sets differ slightly between trackers; the variants keep just
/// enough provider detail for the resolver to ask capability questions
/// (today: "is this a pull request?") without knowing the concrete provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderInfo {
    /// Produced by GitHub, where an "issue" may actually be a pull request.
    GitHub {
        /// True when the record carried pull-request links.
        pull_request: bool,
    },
    /// Produced by GitLab. Only issues are fetched there, never merge
    /// requests, so there is no pull-request arm.
    GitLab,
}

impl ProviderInfo {
    /// The tracker kind behind this tag.
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::GitHub { .. } => ProviderKind::GitHub,
            Self::GitLab => ProviderKind::GitLab,
        }
    }

    /// True when the underlying tracker item is a pull request.
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        match self {
            Self::GitHub { pull_request } => *pull_request,
            Self::GitLab => false,
        }
    }
}

/// A raw issue as one of the supported providers delivers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum RawIssue {
    /// GitHub REST payload.
    GitHub(RawGitHubIssue),
    /// GitLab payload.
    GitLab(RawGitLabIssue),
}

impl RawIssue {
    /// Maps this raw record into one canonical [`Issue`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] when a field the canonical model
    /// requires is structurally absent. That is a fetch-collaborator
    /// contract violation; callers skip the record and continue the batch.
    pub fn normalize(self) -> Result<Issue> {
        match self {
            Self::GitHub(raw) => raw.normalize(),
            Self::GitLab(raw) => raw.normalize(),
        }
    }
}

/// GitHub REST issue payload, trimmed to the fields trellis consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGitHubIssue {
    /// Tracker-local issue number.
    pub number: Option<u64>,
    /// Issue title.
    pub title: Option<String>,
    /// `open` or `closed`.
    pub state: Option<String>,
    /// Markdown body; GitHub omits it for empty bodies.
    pub body: Option<String>,
    /// Canonical web URL of the issue.
    pub html_url: Option<String>,
    /// API URL of the owning repository.
    pub repository_url: Option<String>,
    /// Labels with tracker-assigned colors.
    #[serde(default)]
    pub labels: Vec<RawGitHubLabel>,
    /// Assigned users.
    #[serde(default)]
    pub assignees: Vec<RawGitHubUser>,
    /// Present iff the item is a pull request.
    pub pull_request: Option<RawPullRequestLinks>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last-update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A GitHub label object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGitHubLabel {
    /// Label name.
    pub name: Option<String>,
    /// Hex color without the leading `#`.
    pub color: Option<String>,
}

/// A GitHub user object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGitHubUser {
    /// Account login.
    pub login: Option<String>,
    /// Display name, when the user has set one.
    pub name: Option<String>,
}

/// Pull-request link object; its presence marks the item as a PR.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPullRequestLinks {
    /// API URL of the pull request.
    pub url: Option<String>,
}

impl RawGitHubIssue {
    fn normalize(self) -> Result<Issue> {
        let missing = |field| Error::MissingField {
            provider: "github",
            field,
        };

        let url = self.html_url.ok_or_else(|| missing("html_url"))?;
        let number = self.number.ok_or_else(|| missing("number"))?;
        let title = self.title.ok_or_else(|| missing("title"))?;
        let state = self.state.ok_or_else(|| missing("state"))?;
        let repo_url = self
            .repository_url
            .ok_or_else(|| missing("repository_url"))?;

        let mut labels = Vec::with_capacity(self.labels.len());
        for label in self.labels {
            labels.push(Label {
                name: label.name.ok_or_else(|| missing("labels.name"))?,
                color: label.color.ok_or_else(|| missing("labels.color"))?,
            });
        }

        let mut assignees = Vec::with_capacity(self.assignees.len());
        for assignee in self.assignees {
            let login = assignee.login.ok_or_else(|| missing("assignees.login"))?;
            assignees.push(Person {
                name: assignee.name.unwrap_or_else(|| login.clone()),
                username: login,
            });
        }

        Ok(new_issue(
            IssueUrl::from(url),
            number,
            title,
            IssueState::from_provider_state(&state),
            self.body.unwrap_or_default(),
            repo_url,
            labels,
            assignees,
            ProviderInfo::GitHub {
                pull_request: self.pull_request.is_some(),
            },
        ))
    }
}

/// GitLab issue payload, trimmed to the fields trellis consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGitLabIssue {
    /// Project-local issue id.
    pub iid: Option<u64>,
    /// Issue title.
    pub title: Option<String>,
    /// `opened` or `closed`.
    pub state: Option<String>,
    /// Markdown description.
    pub description: Option<String>,
    /// Canonical web URL of the issue.
    pub web_url: Option<String>,
    /// Label names; GitLab does not deliver colors inline.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Assigned users.
    #[serde(default)]
    pub assignees: Vec<RawGitLabUser>,
    /// Related-resource links.
    #[serde(rename = "_links")]
    pub links: Option<RawGitLabLinks>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last-update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A GitLab user object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGitLabUser {
    /// Display name.
    pub name: Option<String>,
    /// Account username.
    pub username: Option<String>,
}

/// GitLab `_links` object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGitLabLinks {
    /// API URL of the owning project.
    pub project: Option<String>,
}

impl RawGitLabIssue {
    fn normalize(self) -> Result<Issue> {
        let missing = |field| Error::MissingField {
            provider: "gitlab",
            field,
        };

        let url = self.web_url.ok_or_else(|| missing("web_url"))?;
        let number = self.iid.ok_or_else(|| missing("iid"))?;
        let title = self.title.ok_or_else(|| missing("title"))?;
        let state = self.state.ok_or_else(|| missing("state"))?;
        let repo_url = self
            .links
            .and_then(|links| links.project)
            .ok_or_else(|| missing("_links.project"))?;

        let labels = self
            .labels
            .into_iter()
            .map(|name| Label {
                name,
                color: DEFAULT_LABEL_COLOR.to_string(),
            })
            .collect();

        let mut assignees = Vec::with_capacity(self.assignees.len());
        for assignee in self.assignees {
            let username = assignee
                .username
                .ok_or_else(|| missing("assignees.username"))?;
            assignees.push(Person {
                name: assignee.name.unwrap_or_else(|| username.clone()),
                username,
            });
        }

        Ok(new_issue(
            IssueUrl::from(url),
            number,
            title,
            IssueState::from_provider_state(&state),
            self.description.unwrap_or_default(),
            repo_url,
            labels,
            assignees,
            ProviderInfo::GitLab,
        ))
    }
}

/// Builds a canonical issue with every derived field at its default.
#[expect(clippy::too_many_arguments, reason = "internal constructor")]
fn new_issue(
    url: IssueUrl,
    number: u64,
    title: String,
    state: IssueState,
    body: String,
    repo_url: String,
    labels: Vec<Label>,
    assignees: Vec<Person>,
    provider: ProviderInfo,
) -> Issue {
    Issue {
        url,
        number,
        title,
        state,
        body,
        repo_url,
        labels,
        assignees,
        provider,
        depends_on: BTreeSet::new(),
        blocks: BTreeSet::new(),
        is_orphan: true,
        hidden: false,
        linked_with_epic: false,
        duplicates: Vec::new(),
        errors: Vec::new(),
        base_weight: 1,
        weight_multiplier: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github_record() -> RawGitHubIssue {
        RawGitHubIssue {
            number: Some(7),
            title: Some("Add widget cache".to_string()),
            state: Some("open".to_string()),
            body: Some("Depends on #6".to_string()),
            html_url: Some("https://github.com/acme/widgets/issues/7".to_string()),
            repository_url: Some("https://api.github.com/repos/acme/widgets".to_string()),
            labels: vec![RawGitHubLabel {
                name: Some("bug".to_string()),
                color: Some("d73a4a".to_string()),
            }],
            assignees: vec![RawGitHubUser {
                login: Some("alice".to_string()),
                name: None,
            }],
            pull_request: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn github_record_maps_all_required_fields() {
        let issue = RawIssue::GitHub(github_record()).normalize().unwrap();

        assert_eq!(issue.url.as_str(), "https://github.com/acme/widgets/issues/7");
        assert_eq!(issue.number, 7);
        assert_eq!(issue.state, IssueState::Open);
        assert_eq!(issue.body, "Depends on #6");
        assert_eq!(issue.labels[0].color, "d73a4a");
        assert_eq!(issue.assignees[0].name, "alice");
        assert!(issue.is_orphan);
        assert_eq!(issue.base_weight, 1);
        assert!(!issue.provider.is_pull_request());
    }

    #[test]
    fn github_pull_request_links_set_the_capability_flag() {
        let mut record = github_record();
        record.pull_request = Some(RawPullRequestLinks {
            url: Some("https://api.github.com/repos/acme/widgets/pulls/7".to_string()),
        });

        let issue = RawIssue::GitHub(record).normalize().unwrap();
        assert!(issue.provider.is_pull_request());
        assert_eq!(issue.provider.kind(), ProviderKind::GitHub);
    }

    #[test]
    fn github_missing_url_is_a_contract_error() {
        let mut record = github_record();
        record.html_url = None;

        let err = RawIssue::GitHub(record).normalize().unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                provider: "github",
                field: "html_url"
            }
        ));
    }

    #[test]
    fn github_absent_body_maps_to_empty_string() {
        let mut record = github_record();
        record.body = None;

        let issue = RawIssue::GitHub(record).normalize().unwrap();
        assert_eq!(issue.body, "");
    }

    fn gitlab_record() -> RawGitLabIssue {
        RawGitLabIssue {
            iid: Some(3),
            title: Some("Widget pipeline".to_string()),
            state: Some("opened".to_string()),
            description: Some(String::new()),
            web_url: Some("https://gitlab.com/acme/widgets/issues/3".to_string()),
            labels: vec!["backend".to_string()],
            assignees: vec![RawGitLabUser {
                name: Some("Bob B".to_string()),
                username: Some("bob".to_string()),
            }],
            links: Some(RawGitLabLinks {
                project: Some("https://gitlab.com/api/v4/projects/42".to_string()),
            }),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn gitlab_record_maps_all_required_fields() {
        let issue = RawIssue::GitLab(gitlab_record()).normalize().unwrap();

        assert_eq!(issue.number, 3);
        assert_eq!(issue.state, IssueState::Open, "opened maps to Open");
        assert_eq!(issue.labels[0].color, DEFAULT_LABEL_COLOR);
        assert_eq!(issue.assignees[0].username, "bob");
        assert_eq!(issue.provider, ProviderInfo::GitLab);
        assert!(!issue.provider.is_pull_request());
    }

    #[test]
    fn gitlab_missing_project_link_is_a_contract_error() {
        let mut record = gitlab_record();
        record.links = None;

        let err = RawIssue::GitLab(record).normalize().unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                provider: "gitlab",
                field: "_links.project"
            }
        ));
    }
}
