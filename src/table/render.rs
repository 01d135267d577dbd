//! Render table state to a markup tree (and HTML).

use crate::table::column::{ColumnDef, HeaderContext, PinSide};
use crate::table::layout::{resolve_columns, ResolvedColumn};
use crate::table::state::{SortDirection, TableState};
use std::fmt::Write as _;

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub sticky_header: bool,
    pub sticky_footer: bool,
    pub enable_column_drag: bool,
    pub empty_message: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sticky_header: true,
            sticky_footer: true,
            enable_column_drag: true,
            empty_message: "No results.".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellStyle {
    pub width: u32,
    pub pin: Option<PinSide>,
    pub offset: Option<u32>,
    pub pin_boundary: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderCell {
    pub column_id: String,
    pub content: String,
    pub style: CellStyle,
    pub draggable: bool,
    pub sort: Option<SortDirection>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub column_id: String,
    pub content: String,
    pub style: CellStyle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyRow {
    pub row_id: String,
    pub selected: bool,
    pub cells: Vec<Cell>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    Rows(Vec<BodyRow>),
    /// One full-width row shown instead of an empty body.
    Placeholder { colspan: usize, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableMarkup {
    pub header: Vec<HeaderCell>,
    pub body: Body,
    pub footer: Option<Vec<Cell>>,
    pub sticky_header: bool,
    pub sticky_footer: bool,
    pub total_width: u32,
}

impl TableMarkup {
    /// Rendered body rows; the placeholder counts as one.
    pub fn row_count(&self) -> usize {
        match &self.body {
            Body::Rows(rows) => rows.len(),
            Body::Placeholder { .. } => 1,
        }
    }

    pub fn column_ids(&self) -> Vec<&str> {
        self.header.iter().map(|h| h.column_id.as_str()).collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "<table style=\"width:{}px\">", self.total_width);
        out.push_str(if self.sticky_header {
            "<thead class=\"sticky top-0\"><tr>"
        } else {
            "<thead><tr>"
        });
        for h in &self.header {
            let _ = write!(
                out,
                "<th data-column-id=\"{}\"{}{}{}>{}</th>",
                escape(&h.column_id),
                class_attr(&h.style),
                style_attr(&h.style),
                if h.draggable { " draggable=\"true\"" } else { "" },
                escape(&h.content)
            );
        }
        out.push_str("</tr></thead><tbody>");
        match &self.body {
            Body::Rows(rows) => {
                for row in rows {
                    let _ = write!(
                        out,
                        "<tr data-row-id=\"{}\"{}>",
                        escape(&row.row_id),
                        if row.selected { " data-state=\"selected\"" } else { "" }
                    );
                    for cell in &row.cells {
                        write_cell(&mut out, cell);
                    }
                    out.push_str("</tr>");
                }
            }
            Body::Placeholder { colspan, message } => {
                let _ = write!(
                    out,
                    "<tr><td colspan=\"{}\" class=\"empty\">{}</td></tr>",
                    colspan,
                    escape(message)
                );
            }
        }
        out.push_str("</tbody>");
        if let Some(footer) = &self.footer {
            out.push_str(if self.sticky_footer {
                "<tfoot class=\"sticky bottom-0\"><tr>"
            } else {
                "<tfoot><tr>"
            });
            for cell in footer {
                write_cell(&mut out, cell);
            }
            out.push_str("</tr></tfoot>");
        }
        out.push_str("</table>");
        out
    }
}

fn write_cell(out: &mut String, cell: &Cell) {
    let _ = write!(
        out,
        "<td data-column-id=\"{}\"{}{}>{}</td>",
        escape(&cell.column_id),
        class_attr(&cell.style),
        style_attr(&cell.style),
        escape(&cell.content)
    );
}

fn class_attr(style: &CellStyle) -> String {
    match (style.pin, style.pin_boundary) {
        (Some(side), true) => format!(" class=\"pinned-{} pin-boundary\"", side.as_str()),
        (Some(side), false) => format!(" class=\"pinned-{}\"", side.as_str()),
        (None, _) => String::new(),
    }
}

fn style_attr(style: &CellStyle) -> String {
    match (style.pin, style.offset) {
        (Some(side), Some(offset)) => format!(
            " style=\"width:{}px;position:sticky;{}:{}px\"",
            style.width,
            side.as_str(),
            offset
        ),
        _ => format!(" style=\"width:{}px\"", style.width),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn style_of<R>(col: &ResolvedColumn<'_, R>) -> CellStyle {
    CellStyle {
        width: col.width,
        pin: col.pin,
        offset: col.offset,
        pin_boundary: col.is_pin_boundary,
    }
}

/// Column set plus row identity. Stateless: every call to [`DataTable::render`]
/// is a pure function of the rows and the caller's [`TableState`].
pub struct DataTable<R> {
    pub columns: Vec<ColumnDef<R>>,
    row_id: Box<dyn Fn(&R) -> String + Send + Sync>,
    pub options: RenderOptions,
}

impl<R> DataTable<R> {
    pub fn new<F>(columns: Vec<ColumnDef<R>>, row_id: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self {
            columns,
            row_id: Box::new(row_id),
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn initial_state(&self) -> TableState {
        TableState::for_columns(&self.columns)
    }

    pub fn row_id(&self, row: &R) -> String {
        (self.row_id)(row)
    }

    pub fn render(&self, rows: &[R], state: &TableState) -> TableMarkup {
        let resolved = resolve_columns(&self.columns, state);
        let header = resolved
            .iter()
            .map(|col| {
                let ctx = HeaderContext {
                    column_id: &col.def.id,
                    title: &col.def.title,
                    sort: state.sort_direction(&col.def.id),
                    pin: col.pin,
                };
                HeaderCell {
                    column_id: col.def.id.clone(),
                    content: col.def.render_header(&ctx),
                    style: style_of(col),
                    draggable: self.options.enable_column_drag
                        && col.def.enable_drag
                        && col.pin.is_none(),
                    sort: ctx.sort,
                }
            })
            .collect();

        let body = if rows.is_empty() {
            Body::Placeholder {
                colspan: resolved.len().max(1),
                message: self.options.empty_message.clone(),
            }
        } else {
            Body::Rows(
                rows.iter()
                    .map(|row| {
                        let row_id = self.row_id(row);
                        BodyRow {
                            selected: state.is_selected(&row_id),
                            row_id,
                            cells: resolved
                                .iter()
                                .map(|col| Cell {
                                    column_id: col.def.id.clone(),
                                    content: col.def.render_cell(row),
                                    style: style_of(col),
                                })
                                .collect(),
                        }
                    })
                    .collect(),
            )
        };

        let footer = resolved.iter().any(|c| c.def.has_footer()).then(|| {
            resolved
                .iter()
                .map(|col| Cell {
                    column_id: col.def.id.clone(),
                    content: col.def.render_footer(rows),
                    style: style_of(col),
                })
                .collect()
        });

        TableMarkup {
            header,
            body,
            footer,
            sticky_header: self.options.sticky_header,
            sticky_footer: self.options.sticky_footer,
            total_width: crate::table::layout::total_width(&resolved),
        }
    }
}
