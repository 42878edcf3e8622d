use serde::Serialize;

/// Image rows to drop and to create so a product ends up with the submitted
/// set of URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageChanges {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl ImageChanges {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diffs the URLs attached to a product against the URLs just submitted.
///
/// `to_remove` keeps the order of `existing`, `to_add` the order of
/// `submitted`. URLs are compared as plain strings.
pub fn reconcile_images(existing: &[String], submitted: &[String]) -> ImageChanges {
    let to_remove = existing
        .iter()
        .filter(|url| !submitted.contains(url))
        .cloned()
        .collect();

    let to_add = submitted
        .iter()
        .filter(|url| !existing.contains(url))
        .cloned()
        .collect();

    ImageChanges { to_add, to_remove }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn urls(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn replaces_dropped_url_with_new_one() {
        let changes = reconcile_images(&urls(&["a", "b", "c"]), &urls(&["b", "c", "d"]));

        assert_eq!(changes.to_remove, urls(&["a"]));
        assert_eq!(changes.to_add, urls(&["d"]));
    }

    #[test]
    fn empty_existing_adds_everything() {
        let changes = reconcile_images(&[], &urls(&["x"]));

        assert!(changes.to_remove.is_empty());
        assert_eq!(changes.to_add, urls(&["x"]));
    }

    #[test]
    fn empty_submission_removes_everything() {
        let changes = reconcile_images(&urls(&["x"]), &[]);

        assert_eq!(changes.to_remove, urls(&["x"]));
        assert!(changes.to_add.is_empty());
    }

    #[test]
    fn unchanged_list_is_a_no_op() {
        let current = urls(&["http://x/1.png", "http://x/2.png"]);
        let reordered = urls(&["http://x/2.png", "http://x/1.png"]);

        assert!(reconcile_images(&current, &current).is_empty());
        assert!(reconcile_images(&current, &reordered).is_empty());
    }

    #[test]
    fn urls_are_not_normalized() {
        let changes = reconcile_images(&urls(&["http://x/1.png"]), &urls(&["http://x/1.png/"]));

        assert_eq!(changes.to_remove, urls(&["http://x/1.png"]));
        assert_eq!(changes.to_add, urls(&["http://x/1.png/"]));
    }

    #[test]
    fn applying_changes_yields_submitted_set() {
        let existing = urls(&["a", "b", "c"]);
        let submitted = urls(&["c", "e", "a"]);

        let changes = reconcile_images(&existing, &submitted);

        let mut result: BTreeSet<String> = existing
            .into_iter()
            .filter(|url| !changes.to_remove.contains(url))
            .collect();
        result.extend(changes.to_add);

        assert_eq!(result, submitted.into_iter().collect::<BTreeSet<_>>());
    }
}
