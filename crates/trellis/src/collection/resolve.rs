//! The multi-pass resolution pipeline.
//!
//! Resolution turns mined text directives into a consistent bidirectional
//! graph plus per-issue derived status. The passes run in a fixed order
//! over the whole collection:
//!
//! 1. **Reset** - every derived field back to its default, so resolving an
//!    already-resolved collection is idempotent.
//! 2. **Directives** - per issue, in directive-kind order: duplicate,
//!    weight-multiplier, hide marker, base weight, depends-on, blocks.
//!    Every mined relation materializes as a consistent edge pair on both
//!    endpoints. A hide marker removes the issue immediately and skips its
//!    remaining directives.
//! 3. **Hiding** - duplicates and pull requests are marked hidden.
//! 4. **Epic linkage** - closure over `blocks`/`depends_on` reachability to
//!    an epic-labeled issue.

use super::IssueCollection;
use crate::domain::IssueUrl;
use crate::extract::{extract_directives, Directive};

impl IssueCollection {
    /// Runs the full resolution pipeline over the collection.
    ///
    /// Requires global knowledge of all issues, so every fetch batch must
    /// be merged before this runs. Safe to run repeatedly: the reset pass
    /// restores every derived field first.
    pub fn resolve(&mut self, epic_label: &str) {
        tracing::debug!(issues = self.issues.len(), "starting resolution");
        self.reset_pass();
        self.directive_pass();
        self.hiding_pass();
        self.epic_linkage_pass(epic_label);
    }

    fn reset_pass(&mut self) {
        for issue in self.issues.values_mut() {
            issue.reset_derived();
        }
    }

    fn directive_pass(&mut self) {
        let urls: Vec<IssueUrl> = self.issues.keys().cloned().collect();
        for url in urls {
            // The issue may already be gone: a hide marker on an earlier
            // issue only removes that issue, but re-checking keeps the
            // sweep robust against future removals.
            let Some(issue) = self.issues.get(&url) else {
                continue;
            };
            let directives = extract_directives(issue);
            self.apply_directives(&url, directives);
        }
    }

    fn apply_directives(&mut self, url: &IssueUrl, directives: Vec<Directive>) {
        for directive in directives {
            match directive {
                Directive::DuplicateOf(target) => {
                    if let Some(issue) = self.issues.get_mut(url) {
                        issue.duplicates.push(target);
                    }
                }
                Directive::WeightMultiplier(raw) => {
                    // Unparseable values keep the default; best-effort
                    // parsing is the contract for inline metadata.
                    if let Ok(value) = raw.parse::<i64>() {
                        if let Some(issue) = self.issues.get_mut(url) {
                            issue.weight_multiplier = value;
                        }
                    }
                }
                Directive::Hide => {
                    self.issues.remove(url);
                    return;
                }
                Directive::BaseWeight(raw) => {
                    if let Ok(value) = raw.parse::<i64>() {
                        if let Some(issue) = self.issues.get_mut(url) {
                            issue.base_weight = value;
                        }
                    }
                }
                Directive::DependsOn(target) => {
                    if self.target_exists(url, &target) {
                        self.add_edge(url, &target);
                    }
                }
                Directive::Blocks(target) => {
                    if self.target_exists(url, &target) {
                        self.add_edge(&target, url);
                    }
                }
            }
        }
    }

    /// Checks a relation target, recording an error on the referencing
    /// issue when the target is not in the collection.
    fn target_exists(&mut self, origin: &IssueUrl, target: &IssueUrl) -> bool {
        if self.issues.contains_key(target) {
            return true;
        }
        if let Some(issue) = self.issues.get_mut(origin) {
            issue
                .errors
                .push(format!("referenced issue \"{target}\" not found"));
        }
        false
    }

    /// Materializes one relation as a consistent edge pair and clears the
    /// orphan flag on both endpoints.
    fn add_edge(&mut self, dependent: &IssueUrl, dependency: &IssueUrl) {
        if let Some(issue) = self.issues.get_mut(dependent) {
            issue.depends_on.insert(dependency.clone());
            issue.is_orphan = false;
        }
        if let Some(issue) = self.issues.get_mut(dependency) {
            issue.blocks.insert(dependent.clone());
            issue.is_orphan = false;
        }
    }

    fn hiding_pass(&mut self) {
        for issue in self.issues.values_mut() {
            if !issue.duplicates.is_empty() {
                issue.hidden = true;
            }
            if issue.provider.is_pull_request() {
                issue.hidden = true;
            }
        }
    }

    fn epic_linkage_pass(&mut self, epic_label: &str) {
        let linkage: Vec<(IssueUrl, bool)> = self
            .issues
            .values()
            .map(|issue| {
                let linked = !issue.hidden
                    && (issue.is_epic(epic_label)
                        || self.reaches_epic_via_blocks(&issue.url, epic_label)
                        || self.reaches_epic_via_depends_on(&issue.url, epic_label));
                (issue.url.clone(), linked)
            })
            .collect();

        for (url, linked) in linkage {
            if let Some(issue) = self.issues.get_mut(&url) {
                issue.linked_with_epic = linked;
            }
        }
    }
}
