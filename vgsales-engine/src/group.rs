//! Explicit grouping of records by a text key.
use std::collections::HashMap;

use crate::record::Record;

/// Records sharing one key, in their original relative order.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: &'a str,
    pub records: Vec<&'a Record>,
}

/// Groups in first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct Groups<'a> {
    groups: Vec<Group<'a>>,
}

impl<'a> Groups<'a> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group<'a>> {
        self.groups.iter()
    }

    /// Groups reordered by ascending key.
    #[must_use]
    pub fn into_sorted(mut self) -> Vec<Group<'a>> {
        self.groups.sort_by(|a, b| a.key.cmp(b.key));
        self.groups
    }
}

impl<'a> IntoIterator for Groups<'a> {
    type Item = Group<'a>;
    type IntoIter = std::vec::IntoIter<Group<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partition `records` by `key`. Keys are compared as raw text.
pub fn group_by<'a, F>(records: &[&'a Record], key: F) -> Groups<'a>
where
    F: Fn(&'a Record) -> &'a str,
{
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for &record in records {
        let k = key(record);
        if let Some(&slot) = index.get(k) {
            groups[slot].records.push(record);
        } else {
            index.insert(k, groups.len());
            groups.push(Group {
                key: k,
                records: vec![record],
            });
        }
    }

    Groups { groups }
}
