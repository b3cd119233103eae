//! End-to-end resolution and rendering over raw provider batches.

use trellis::collection::IssueCollection;
use trellis::domain::provider::{RawGitHubIssue, RawGitHubLabel};
use trellis::domain::{IssueUrl, RawIssue};
use trellis::render::render_collection;

const EPIC: &str = "epic";

fn raw_issue(number: u64, body: &str) -> RawIssue {
    RawIssue::GitHub(RawGitHubIssue {
        number: Some(number),
        title: Some(format!("Issue {number}")),
        state: Some("open".to_string()),
        body: Some(body.to_string()),
        html_url: Some(format!("https://github.com/acme/widgets/issues/{number}")),
        repository_url: Some("https://api.github.com/repos/acme/widgets".to_string()),
        ..RawGitHubIssue::default()
    })
}

fn raw_epic(number: u64, body: &str) -> RawIssue {
    let RawIssue::GitHub(mut raw) = raw_issue(number, body) else {
        unreachable!("raw_issue builds github records");
    };
    raw.labels.push(RawGitHubLabel {
        name: Some(EPIC.to_string()),
        color: Some("ff9900".to_string()),
    });
    RawIssue::GitHub(raw)
}

fn url_of(number: u64) -> IssueUrl {
    IssueUrl::from(format!("https://github.com/acme/widgets/issues/{number}").as_str())
}

#[test]
fn blocks_directive_links_two_issues_and_renders_one_edge() {
    // Issue A says "Blocks #2"; issue B has an empty body.
    let mut collection = IssueCollection::new();
    let rejected = collection.merge_batch(vec![raw_issue(1, "Blocks #2"), raw_issue(2, "")]);
    assert!(rejected.is_empty());

    collection.resolve(EPIC);

    let a = collection.get(&url_of(1)).unwrap();
    let b = collection.get(&url_of(2)).unwrap();
    assert_eq!(a.blocks.iter().collect::<Vec<_>>(), vec![&url_of(2)]);
    assert_eq!(b.depends_on.iter().collect::<Vec<_>>(), vec![&url_of(1)]);
    assert!(!a.is_orphan);
    assert!(!b.is_orphan);
    assert!(a.is_ready(), "A participates and has no dependency");

    let dot = render_collection(&collection, EPIC).unwrap();
    let edge_lines: Vec<&str> = dot.lines().filter(|l| l.contains("->")).collect();
    assert_eq!(edge_lines.len(), 1);
    // The dependency target A is ready, so the edge renders pink.
    assert!(edge_lines[0].contains("color=\"pink\""));
}

#[test]
fn full_pipeline_derives_status_weight_and_epic_links() {
    let mut collection = IssueCollection::new();
    collection.merge_batch(vec![
        raw_epic(1, "Depends on #2\nDepends on #3"),
        raw_issue(2, "trellis.base_weight: 2"),
        raw_issue(3, "trellis.base_weight: 2"),
        raw_issue(4, "dup of #2"),
        raw_issue(5, ""),
    ]);
    collection.resolve(EPIC);

    // The epic blocks nothing but depends on #2 and #3; both become
    // epic-linked through the closure.
    assert!(collection.get(&url_of(2)).unwrap().linked_with_epic);
    assert!(collection.get(&url_of(3)).unwrap().linked_with_epic);
    assert!(!collection.get(&url_of(5)).unwrap().linked_with_epic);

    // #2 blocks the epic, so its weight aggregates the epic's weight.
    // weight(epic) = 1; weight(#2) = 2 + 1 = 3.
    assert_eq!(collection.weight(&url_of(2)).unwrap(), 3);

    // The duplicate is hidden and never rendered.
    assert!(collection.get(&url_of(4)).unwrap().hidden);
    let dot = render_collection(&collection, EPIC).unwrap();
    assert!(!dot.contains("issues/4\""));
}

#[test]
fn unresolved_reference_is_an_annotation_not_a_failure() {
    let mut collection = IssueCollection::new();
    collection.merge_batch(vec![raw_issue(1, "Requires acme/other#9")]);
    collection.resolve(EPIC);

    let issue = collection.get(&url_of(1)).unwrap();
    assert_eq!(issue.errors.len(), 1);
    assert!(issue.errors[0].contains("https://github.com/acme/other/issues/9"));

    let dot = render_collection(&collection, EPIC).unwrap();
    assert!(dot.contains("ERR: "));
}

#[test]
fn visibility_filters_compose_with_rendering() {
    let mut closed = raw_issue(2, "");
    if let RawIssue::GitHub(raw) = &mut closed {
        raw.state = Some("closed".to_string());
    }

    let mut collection = IssueCollection::new();
    collection.merge_batch(vec![raw_issue(1, "Depends on #2"), closed, raw_issue(3, "")]);
    collection.resolve(EPIC);
    collection.hide_closed();

    let dot = render_collection(&collection, EPIC).unwrap();
    assert!(!dot.contains("issues/2\""), "closed issue is filtered out");
    assert!(!dot.contains("->"), "its edge goes with it");

    // Issue 3 never joined the graph; issue 1 lost its only dependency
    // target but keeps its derived state from resolution.
    assert!(collection.has_orphans());
}

#[test]
fn cross_repository_references_resolve_by_absolute_url() {
    let other = RawIssue::GitHub(RawGitHubIssue {
        number: Some(1),
        title: Some("Other repo issue".to_string()),
        state: Some("open".to_string()),
        body: Some(String::new()),
        html_url: Some("https://github.com/acme/other/issues/1".to_string()),
        repository_url: Some("https://api.github.com/repos/acme/other".to_string()),
        ..RawGitHubIssue::default()
    });

    let mut collection = IssueCollection::new();
    collection.merge_batch(vec![
        raw_issue(1, "Depends on https://github.com/acme/other/issues/1"),
        other,
    ]);
    collection.resolve(EPIC);

    let a = collection.get(&url_of(1)).unwrap();
    assert!(a
        .depends_on
        .contains(&IssueUrl::from("https://github.com/acme/other/issues/1")));
}
