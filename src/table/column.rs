//! Column definitions for the headless data table.

use crate::table::state::SortDirection;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinSide {
    Left,
    Right,
}

impl PinSide {
    pub fn as_str(self) -> &'static str {
        match self {
            PinSide::Left => "left",
            PinSide::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSize {
    pub size: u32,
    pub min: u32,
    pub max: u32,
}

impl Default for ColumnSize {
    fn default() -> Self {
        Self {
            size: 150,
            min: 20,
            max: u32::MAX,
        }
    }
}

impl ColumnSize {
    pub fn fixed(size: u32) -> Self {
        Self {
            size,
            min: size,
            max: size,
        }
    }

    pub fn clamp(&self, width: u32) -> u32 {
        width.clamp(self.min, self.max.max(self.min))
    }
}

/// What a header renderer gets to see.
#[derive(Clone, Copy, Debug)]
pub struct HeaderContext<'a> {
    pub column_id: &'a str,
    pub title: &'a str,
    pub sort: Option<SortDirection>,
    pub pin: Option<PinSide>,
}

pub type CellRenderer<R> = Box<dyn Fn(&R) -> String + Send + Sync>;
pub type HeaderRenderer = Box<dyn Fn(&HeaderContext<'_>) -> String + Send + Sync>;
pub type FooterRenderer<R> = Box<dyn Fn(&[R]) -> String + Send + Sync>;

pub struct ColumnDef<R> {
    pub id: String,
    pub title: String,
    accessor: CellRenderer<R>,
    cell: Option<CellRenderer<R>>,
    header: Option<HeaderRenderer>,
    footer: Option<FooterRenderer<R>>,
    pub size: ColumnSize,
    /// Pin side applied when the table state is first built from the columns.
    pub pin: Option<PinSide>,
    pub enable_drag: bool,
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("size", &self.size)
            .field("pin", &self.pin)
            .finish()
    }
}

impl<R> ColumnDef<R> {
    pub fn new<F>(id: impl Into<String>, title: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            title: title.into(),
            accessor: Box::new(accessor),
            cell: None,
            header: None,
            footer: None,
            size: ColumnSize::default(),
            pin: None,
            enable_drag: true,
        }
    }

    pub fn with_cell<F>(mut self, cell: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Box::new(cell));
        self
    }

    pub fn with_header<F>(mut self, header: F) -> Self
    where
        F: Fn(&HeaderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.header = Some(Box::new(header));
        self
    }

    pub fn with_footer<F>(mut self, footer: F) -> Self
    where
        F: Fn(&[R]) -> String + Send + Sync + 'static,
    {
        self.footer = Some(Box::new(footer));
        self
    }

    pub fn with_size(mut self, size: ColumnSize) -> Self {
        self.size = size;
        self
    }

    pub fn pinned(mut self, side: PinSide) -> Self {
        self.pin = Some(side);
        self
    }

    pub fn without_drag(mut self) -> Self {
        self.enable_drag = false;
        self
    }

    /// Raw accessor value, used for sorting and exports.
    pub fn value(&self, row: &R) -> String {
        (self.accessor)(row)
    }

    pub fn render_cell(&self, row: &R) -> String {
        match &self.cell {
            Some(cell) => cell(row),
            None => (self.accessor)(row),
        }
    }

    pub fn render_header(&self, ctx: &HeaderContext<'_>) -> String {
        match &self.header {
            Some(header) => header(ctx),
            None => ctx.title.to_string(),
        }
    }

    pub fn has_footer(&self) -> bool {
        self.footer.is_some()
    }

    pub fn render_footer(&self, rows: &[R]) -> String {
        self.footer.as_ref().map(|f| f(rows)).unwrap_or_default()
    }
}
