//! Headless data table: column definitions, caller-owned state, pinning
//! layout, drag reorder and markup rendering.

pub mod column;
pub mod layout;
pub mod render;
pub mod reorder;
pub mod state;

pub use column::{ColumnDef, ColumnSize, HeaderContext, PinSide};
pub use layout::{resolve_columns, ResolvedColumn};
pub use render::{Body, BodyRow, Cell, CellStyle, DataTable, HeaderCell, RenderOptions, TableMarkup};
pub use reorder::on_column_drag_end;
pub use state::{dispatch_row_click, ColumnPinning, SortDirection, SortingRule, TableState};
