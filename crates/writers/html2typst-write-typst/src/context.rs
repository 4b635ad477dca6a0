//! Render context threaded through the traversal.
//!
//! The context is a small `Copy` value. A parent derives its children's
//! context from its own; counters that siblings share (the next ordinal of an
//! ordered list, the column count of a table) are carried forward explicitly
//! by the traversal rather than mutated in place.

/// Kind of list currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// The innermost open list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFrame {
    pub kind: ListKind,
    /// Nesting depth, 0 for a top-level list.
    pub depth: usize,
    /// Number the next ordered item receives.
    pub ordinal: u64,
    /// Count down instead of up.
    pub reversed: bool,
}

/// The innermost open table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableFrame {
    /// Column count, fixed by the first row.
    pub columns: Option<usize>,
    /// Rows seen so far.
    pub rows: usize,
}

/// Context an element renders in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub list: Option<ListFrame>,
    pub table: Option<TableFrame>,
    /// Inside preformatted or code content: no escaping, no collapsing.
    pub verbatim: bool,
}

impl RenderContext {
    /// Context for the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Context for the items of a new list, one level deeper than any
    /// enclosing list.
    pub fn enter_list(self, kind: ListKind, start: u64, reversed: bool) -> Self {
        let depth = self.list.map_or(0, |frame| frame.depth + 1);
        Self {
            list: Some(ListFrame {
                kind,
                depth,
                ordinal: start,
                reversed,
            }),
            ..self
        }
    }

    /// Context for the rows of a new table. Lists inside cells start over.
    pub fn enter_table(self) -> Self {
        Self {
            list: None,
            table: Some(TableFrame::default()),
            ..self
        }
    }

    pub fn enter_verbatim(self) -> Self {
        Self {
            verbatim: true,
            ..self
        }
    }

    /// Context after one list item has been emitted.
    pub fn next_item(self) -> Self {
        let list = self.list.map(|frame| ListFrame {
            ordinal: if frame.reversed {
                frame.ordinal.saturating_sub(1)
            } else {
                frame.ordinal.saturating_add(1)
            },
            ..frame
        });
        Self { list, ..self }
    }

    /// Context after a table row of `width` columns has been emitted.
    /// The first row fixes the column count.
    pub fn next_row(self, width: usize) -> Self {
        let table = self.table.map(|frame| TableFrame {
            columns: frame.columns.or(Some(width)),
            rows: frame.rows + 1,
        });
        Self { table, ..self }
    }

    /// Current list nesting depth (0 outside lists).
    pub fn depth(&self) -> usize {
        self.list.map_or(0, |frame| frame.depth)
    }
}
