//! Option lists: items, filtering and grouping.

mod filter;
mod group;
mod item;

pub use filter::{
    FilterMatch, MatchMode, filter, filter_indices, fuzzy_filter, normalize_term, option_matches,
};
pub use group::{DEFAULT_GROUP, OptionGroup, group, group_indices};
pub use item::{OptionItem, OptionState};
