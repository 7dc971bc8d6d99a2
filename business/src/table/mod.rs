//! Generic data table: search, sort, pagination and selection over any [`TableRow`].

mod cell;
mod column;
mod config;
mod data_table;
pub mod format;

pub use cell::{CellValue, Record, TableRow};
pub use column::{Align, BadgeColor, BadgeMapper, ColumnDescriptor, ColumnType, Formatter};
pub use config::{DEFAULT_PAGE_SIZE, TableConfig};
pub use data_table::{ClickRegion, DataTable, SortDirection, SortState, TableEvent};
