//! Generic data view: global filter, single-column sort, pagination and
//! table/list/grid rendering over caller records.

mod column;
mod config;
mod pagination;
mod record;
mod render;
mod sort;
mod state;
mod view;

pub use column::{CellRenderer, Column, ColumnKind};
pub use config::DataViewConfig;
pub use pagination::{PageRange, page_bounds, page_count};
pub use record::{Accessor, Record, stringify};
pub use render::{RenderedView, Renderers};
pub use sort::{Comparison, SortDirection, SortState, compare_values, comparison_for, sort_indices};
pub use state::{ViewState, ViewType};
pub use view::{CreateCallback, DataView, DataViewId};
