//! Tables.
//!
//! Cells render to [`Role::Cell`] fragments, rows gather them into
//! [`Role::Row`], and the table lays the rows out on a fixed column count:
//! the width of its first row.

use html2typst_core::{Node, Severity, WarningKind};

use super::Scope;
use super::inline::strong_markup;
use crate::compose::{Cell, Fragment, Layout, Role, apply_style, compose_flow, indent_lines};
use crate::text::trim_html_space;

/// Upper bound on `colspan`, as browsers clamp it.
const MAX_COLSPAN: usize = 1000;

pub(super) fn cell(
    header: bool,
    element: &Node,
    children: &[Fragment],
    scope: &mut Scope<'_>,
) -> Fragment {
    let content = apply_style(compose_flow(children), &scope.style, Layout::Block);
    let content = if header && !content.is_empty() {
        strong_markup(&content)
    } else {
        content
    };
    let colspan = element
        .attrs
        .get("colspan")
        .and_then(|span| span.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_COLSPAN);

    let text = content.clone();
    Fragment::inline(text).with_role(Role::Cell(Cell {
        content,
        header,
        colspan,
    }))
}

pub(super) fn row(children: Vec<Fragment>, scope: &mut Scope<'_>) -> Fragment {
    let mut cells = Vec::new();
    for fragment in children {
        match fragment.role {
            Role::Cell(cell) => cells.push(cell),
            _ if !fragment.is_blank() => cells.push(Cell {
                content: trim_html_space(&fragment.text).to_string(),
                header: false,
                colspan: 1,
            }),
            _ => {}
        }
    }
    // The row has no markup of its own, so its style goes on each cell.
    for cell in &mut cells {
        let content = std::mem::take(&mut cell.content);
        cell.content = apply_style(content, &scope.style, Layout::Block);
    }

    if let Some(table) = scope.ctx.table
        && let Some(expected) = table.columns
    {
        let found: usize = cells.iter().map(|cell| cell.colspan).sum();
        if found != expected && !cells.is_empty() {
            let row = table.rows + 1;
            tracing::warn!(row, expected, found, "table row width mismatch");
            scope.warn(
                Severity::Minor,
                WarningKind::ColumnMismatch {
                    row,
                    expected,
                    found,
                },
                format!("table row {row} has {found} cells, expected {expected}"),
            );
        }
    }

    let text = cells
        .iter()
        .map(|cell| cell.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    Fragment::block(text).with_role(Role::Row(cells))
}

pub(super) fn table(children: Vec<Fragment>) -> Fragment {
    let mut rows = Vec::new();
    let mut captions = Vec::new();
    let mut stray = Vec::new();
    for fragment in children {
        match fragment.role {
            Role::Row(cells) if !cells.is_empty() => rows.push(cells),
            Role::Row(_) => {}
            Role::Caption => captions.push(fragment.text),
            _ => stray.push(fragment),
        }
    }

    let mut out = compose_flow(&stray);
    let Some(first) = rows.first() else {
        return Fragment::block(out);
    };

    let columns = first.iter().map(|cell| cell.colspan).sum::<usize>().max(1);
    let mut body = format!("table(\n  columns: {columns},\n");
    for cells in rows {
        let rendered: Vec<String> = fit_row(cells, columns).iter().map(render_cell).collect();
        body.push_str(&format!("  {},\n", rendered.join(", ")));
    }
    body.push(')');

    let caption = captions
        .iter()
        .map(|text| trim_html_space(text))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let table = if caption.is_empty() {
        format!("#{body}")
    } else {
        format!(
            "#figure(\n{},\n  caption: [{caption}],\n)",
            indent_lines(&body, "  ")
        )
    };

    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str(&table);
    Fragment::block(out)
}

/// Fit a row to exactly `columns` columns. Short rows are padded with empty
/// cells; cells past the last column are merged into the last one.
fn fit_row(cells: Vec<Cell>, columns: usize) -> Vec<Cell> {
    let mut fitted: Vec<Cell> = Vec::with_capacity(columns);
    let mut used = 0;
    for mut cell in cells {
        if used >= columns {
            if let Some(last) = fitted.last_mut() {
                if last.content.is_empty() {
                    last.content = cell.content;
                } else if !cell.content.is_empty() {
                    last.content.push(' ');
                    last.content.push_str(&cell.content);
                }
            }
            continue;
        }
        cell.colspan = cell.colspan.min(columns - used);
        used += cell.colspan;
        fitted.push(cell);
    }
    while used < columns {
        fitted.push(Cell {
            content: String::new(),
            header: false,
            colspan: 1,
        });
        used += 1;
    }
    fitted
}

fn render_cell(cell: &Cell) -> String {
    if cell.colspan > 1 {
        format!("table.cell(colspan: {})[{}]", cell.colspan, cell.content)
    } else {
        format!("[{}]", cell.content)
    }
}
