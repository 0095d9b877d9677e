//! Grouping of an already filtered option list.
//!
//! Grouping is a presentation step on top of filtering: it never changes which
//! options match, only how they are bucketed.

use super::OptionItem;

/// Bucket used for options without a group.
pub const DEFAULT_GROUP: &str = "Other";

/// A group heading and the options under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup {
    pub name: String,
    /// Indices into the source option list, in filtered order.
    pub indices: Vec<usize>,
}

/// Partition filtered option indices by group, preserving first-seen order.
pub fn group_indices<T>(options: &[OptionItem<T>], filtered: &[usize]) -> Vec<OptionGroup> {
    let mut groups: Vec<OptionGroup> = Vec::new();
    for &index in filtered {
        let Some(option) = options.get(index) else {
            continue;
        };
        let name = option.group_name().unwrap_or(DEFAULT_GROUP);
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.indices.push(index),
            None => groups.push(OptionGroup {
                name: name.to_string(),
                indices: vec![index],
            }),
        }
    }
    groups
}

/// Partition filtered options by group, preserving first-seen order.
pub fn group<'a, T>(filtered: &[&'a OptionItem<T>]) -> Vec<(String, Vec<&'a OptionItem<T>>)> {
    let mut groups: Vec<(String, Vec<&'a OptionItem<T>>)> = Vec::new();
    for &option in filtered {
        let name = option.group_name().unwrap_or(DEFAULT_GROUP);
        match groups.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, members)) => members.push(option),
            None => groups.push((name.to_string(), vec![option])),
        }
    }
    groups
}
