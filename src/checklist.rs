//! Checklist store and mutators
//!
//! The store is an ordered collection of checklists. Each checklist is held
//! behind an `Arc` so that cloning the store shares every checklist, and a
//! mutation only allocates a new checklist for the one it touches. Callers
//! compare with `Arc::ptr_eq` to skip re-rendering untouched lists.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Prefix of an unchecked step
pub const UNCHECKED_PREFIX: &str = "- [ ] ";

/// Prefix of a checked step
pub const CHECKED_PREFIX: &str = "- [x] ";

/// Heading marker for checklists created from an issue type
pub const ISSUE_HEADING_PREFIX: &str = "🔍 ";

/// A named, ordered sequence of steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: String,
    pub heading: String,
    #[serde(rename = "list_array")]
    pub steps: Vec<String>,
}

impl Checklist {
    pub fn new(id: impl Into<String>, heading: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            id: id.into(),
            heading: heading.into(),
            steps,
        }
    }

    /// Checklist keyed by an issue type, as produced by `create_checklist`
    pub fn for_issue(issue_type: &str, steps: Vec<String>) -> Self {
        Self::new(issue_type, format!("{ISSUE_HEADING_PREFIX}{issue_type}"), steps)
    }

    /// Instructions shown when the camera cannot be opened
    pub fn camera_access_required() -> Self {
        Self::new(
            "camera-error",
            "⚠️ Camera Access Required",
            vec![
                format!("{UNCHECKED_PREFIX}Please enable camera access to continue"),
                format!("{UNCHECKED_PREFIX}Make sure no other app is using the camera"),
                format!("{UNCHECKED_PREFIX}Try refreshing the page if issues persist"),
            ],
        )
    }
}

/// Checked state encoded in a step's prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMark {
    Unchecked,
    Checked,
}

impl StepMark {
    /// Parse the marker and return it with the free text after it
    pub fn parse(step: &str) -> Option<(StepMark, &str)> {
        if let Some(text) = step.strip_prefix(UNCHECKED_PREFIX) {
            Some((StepMark::Unchecked, text))
        } else {
            step.strip_prefix(CHECKED_PREFIX)
                .map(|text| (StepMark::Checked, text))
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            StepMark::Unchecked => UNCHECKED_PREFIX,
            StepMark::Checked => CHECKED_PREFIX,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            StepMark::Unchecked => StepMark::Checked,
            StepMark::Checked => StepMark::Unchecked,
        }
    }
}

/// Flip a step's marker, keeping its text. Unmarked steps yield `None`.
pub fn toggle_marker(step: &str) -> Option<String> {
    let (mark, text) = StepMark::parse(step)?;
    Some(format!("{}{text}", mark.flipped().prefix()))
}

/// What to do when a created checklist reuses an existing identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Overwrite heading and steps of the existing checklist in place
    #[default]
    Replace,
    /// Append a second checklist with the same identifier
    Append,
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(DuplicatePolicy::Replace),
            "append" => Ok(DuplicatePolicy::Append),
            other => Err(format!("unknown duplicate policy: {other}")),
        }
    }
}

/// Ordered collection of checklists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistStore {
    lists: Vec<Arc<Checklist>>,
}

impl ChecklistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Checklist>> {
        self.lists.iter()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&Arc<Checklist>> {
        self.lists.iter().find(|list| list.id == id)
    }

    /// Add a checklist at the end, or replace an existing one per `policy`.
    ///
    /// Returns `true` if an existing checklist was overwritten.
    pub fn create_or_append(&mut self, checklist: Checklist, policy: DuplicatePolicy) -> bool {
        if policy == DuplicatePolicy::Replace {
            if let Some(slot) = self.lists.iter_mut().find(|list| list.id == checklist.id) {
                *slot = Arc::new(checklist);
                return true;
            }
        }
        self.lists.push(Arc::new(checklist));
        false
    }

    /// Replace the steps of every checklist with `id`. Absent ids are a no-op.
    pub fn replace_steps(&mut self, id: &str, steps: &[String]) -> bool {
        let mut changed = false;
        for slot in self.lists.iter_mut().filter(|list| list.id == id) {
            Arc::make_mut(slot).steps = steps.to_vec();
            changed = true;
        }
        changed
    }

    /// Flip the marker of one step. Out-of-range indexes, absent ids and
    /// unmarked steps leave the store untouched.
    pub fn toggle_step(&mut self, id: &str, index: usize) -> bool {
        let mut changed = false;
        for slot in self.lists.iter_mut().filter(|list| list.id == id) {
            let Some(toggled) = slot.steps.get(index).and_then(|step| toggle_marker(step)) else {
                continue;
            };
            Arc::make_mut(slot).steps[index] = toggled;
            changed = true;
        }
        changed
    }

    /// Remove every checklist with `id`
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.lists.len();
        self.lists.retain(|list| list.id != id);
        self.lists.len() != before
    }

    pub fn reset(&mut self) {
        self.lists.clear();
    }

    /// Owned copy of every checklist, detached from later mutation
    pub fn snapshot(&self) -> Vec<Checklist> {
        self.lists.iter().map(|list| (**list).clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn leak_store() -> ChecklistStore {
        let mut store = ChecklistStore::new();
        store.create_or_append(
            Checklist::for_issue("leak", steps(&["- [ ] check hose", "- [x] check drum"])),
            DuplicatePolicy::Replace,
        );
        store
    }

    #[test]
    fn test_toggle_marker() {
        assert_eq!(toggle_marker("- [ ] check hose").as_deref(), Some("- [x] check hose"));
        assert_eq!(toggle_marker("- [x] check hose").as_deref(), Some("- [ ] check hose"));
        assert_eq!(toggle_marker("check hose"), None);
        assert_eq!(toggle_marker("- [X] upper case is not a marker"), None);
    }

    #[test]
    fn test_for_issue_heading() {
        let list = Checklist::for_issue("leak", vec![]);
        assert_eq!(list.id, "leak");
        assert_eq!(list.heading, "🔍 leak");
    }

    #[test]
    fn test_toggle_step_round_trip() {
        let mut store = leak_store();
        let original = store.clone();

        assert!(store.toggle_step("leak", 0));
        assert_eq!(store.get("leak").unwrap().steps[0], "- [x] check hose");
        assert!(store.toggle_step("leak", 0));
        assert_eq!(store, original);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut store = leak_store();
        let before = store.clone();
        assert!(!store.toggle_step("leak", 2));
        assert!(!store.toggle_step("missing", 0));
        assert_eq!(store, before);
    }

    #[test]
    fn test_toggle_unmarked_step_is_noop() {
        let mut store = ChecklistStore::new();
        store.create_or_append(
            Checklist::new("plain", "Plain", steps(&["no marker"])),
            DuplicatePolicy::Replace,
        );
        let before = store.clone();
        assert!(!store.toggle_step("plain", 0));
        assert_eq!(store, before);
    }

    #[test]
    fn test_replace_steps_keeps_heading() {
        let mut store = leak_store();
        assert!(store.replace_steps("leak", &steps(&["check hose"])));
        let list = store.get("leak").unwrap();
        assert_eq!(list.heading, "🔍 leak");
        assert_eq!(list.steps, steps(&["check hose"]));

        let before = store.clone();
        assert!(!store.replace_steps("absent", &steps(&["x"])));
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = leak_store();
        assert!(store.remove("leak"));
        assert!(store.is_empty());
        assert!(!store.remove("leak"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_policy() {
        let mut store = leak_store();
        let replaced = store.create_or_append(
            Checklist::for_issue("leak", steps(&["fresh"])),
            DuplicatePolicy::Replace,
        );
        assert!(replaced);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("leak").unwrap().steps, steps(&["fresh"]));

        let replaced = store.create_or_append(
            Checklist::for_issue("leak", steps(&["second"])),
            DuplicatePolicy::Append,
        );
        assert!(!replaced);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_untouched_lists_keep_identity() {
        let mut store = leak_store();
        store.create_or_append(
            Checklist::new("drum", "Drum", steps(&["- [ ] spin"])),
            DuplicatePolicy::Replace,
        );
        let before = store.clone();

        store.toggle_step("drum", 0);

        assert!(Arc::ptr_eq(before.get("leak").unwrap(), store.get("leak").unwrap()));
        assert!(!Arc::ptr_eq(before.get("drum").unwrap(), store.get("drum").unwrap()));
        // The prior copy is not affected by the mutation
        assert_eq!(before.get("drum").unwrap().steps[0], "- [ ] spin");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = leak_store();
        let snapshot = store.snapshot();
        store.reset();
        assert!(store.is_empty());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "leak");
    }

    #[test]
    fn test_duplicate_policy_parse() {
        assert_eq!("replace".parse(), Ok(DuplicatePolicy::Replace));
        assert_eq!(" Append ".parse(), Ok(DuplicatePolicy::Append));
        assert!("merge".parse::<DuplicatePolicy>().is_err());
    }
}
