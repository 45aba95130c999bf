use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

use crate::value::Record;

/// Rows collected per class name, in the order classes were first seen.
///
/// This is the shape of a tree file: `ClassName: [row, row, ...]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet(IndexMap<String, Vec<Record>>);

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, class_name: &str, record: Record) {
        self.0
            .entry(class_name.to_string())
            .or_default()
            .push(record);
    }

    /// Append rows for a class. An empty list leaves the set untouched.
    pub fn push_all(&mut self, class_name: &str, records: Vec<Record>) {
        if records.is_empty() {
            return;
        }
        match self.0.entry(class_name.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().extend(records),
            Entry::Vacant(entry) => {
                entry.insert(records);
            }
        }
    }

    pub fn get(&self, class_name: &str) -> Option<&[Record]> {
        self.0.get(class_name).map(Vec::as_slice)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of rows across all classes.
    pub fn total_records(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Merge previously saved rows into this set.
    ///
    /// For every class in either set the result is the order-preserving union
    /// of this set's rows followed by the old rows; rows equal in every column
    /// appear once. Rows that differ in any column (an `updated_at`, say) are
    /// both kept, so merging is not idempotent across dumps of changing data.
    pub fn merge(&mut self, old: RecordSet) {
        let mut old = old.0;
        for (class_name, rows) in self.0.iter_mut() {
            let previous = old.shift_remove(class_name).unwrap_or_default();
            *rows = union(std::mem::take(rows), previous);
        }
        for (class_name, rows) in old {
            self.0.insert(class_name, union(rows, Vec::new()));
        }
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<Record>> {
        self.0
    }
}

impl IntoIterator for RecordSet {
    type Item = (String, Vec<Record>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Vec<Record>)> for RecordSet {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Record>)>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for (class_name, records) in iter {
            set.push_all(&class_name, records);
        }
        set
    }
}

fn union(left: Vec<Record>, right: Vec<Record>) -> Vec<Record> {
    let mut out: Vec<Record> = Vec::with_capacity(left.len() + right.len());
    for record in left.into_iter().chain(right) {
        if !out.contains(&record) {
            out.push(record);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn row(id: i64, name: &str) -> Record {
        Record::from([
            ("id".to_string(), Value::from(id)),
            ("name".to_string(), Value::from(name)),
        ])
    }

    #[test]
    fn push_all_skips_empty_lists() {
        let mut set = RecordSet::new();
        set.push_all("User", Vec::new());
        assert!(set.is_empty());

        set.push_all("User", vec![row(1, "a")]);
        set.push_all("User", vec![row(2, "b")]);
        assert_eq!(set.get("User").unwrap().len(), 2);
        assert_eq!(set.total_records(), 2);
    }

    #[test]
    fn classes_keep_first_seen_order() {
        let mut set = RecordSet::new();
        set.push("User", row(1, "a"));
        set.push("Post", row(1, "p"));
        set.push("User", row(2, "b"));
        assert_eq!(set.class_names().collect::<Vec<_>>(), vec!["User", "Post"]);
    }

    #[test]
    fn merge_unions_per_class() {
        let mut new = RecordSet::new();
        new.push_all("User", vec![row(1, "a"), row(2, "b")]);

        let mut old = RecordSet::new();
        old.push_all("User", vec![row(2, "b"), row(3, "c")]);
        old.push_all("Post", vec![row(9, "p")]);

        new.merge(old);
        assert_eq!(
            new.get("User").unwrap(),
            &[row(1, "a"), row(2, "b"), row(3, "c")]
        );
        assert_eq!(new.get("Post").unwrap(), &[row(9, "p")]);
    }

    #[test]
    fn merge_keeps_rows_that_differ() {
        let mut new = RecordSet::new();
        new.push_all("User", vec![row(1, "renamed")]);
        let mut old = RecordSet::new();
        old.push_all("User", vec![row(1, "a")]);

        new.merge(old);
        assert_eq!(new.get("User").unwrap().len(), 2);
    }

    #[test]
    fn merge_collapses_duplicates_within_new_rows() {
        let mut new = RecordSet::new();
        new.push_all("User", vec![row(1, "a"), row(1, "a")]);
        new.merge(RecordSet::new());
        assert_eq!(new.get("User").unwrap().len(), 1);
    }

    #[test]
    fn yaml_shape_is_class_to_rows() {
        let mut set = RecordSet::new();
        set.push("User", row(1, "a"));
        let yaml = serde_yaml::to_string(&set).unwrap();
        assert_eq!(yaml, "User:\n- id: 1\n  name: a\n");

        let parsed: RecordSet = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, set);
    }
}
