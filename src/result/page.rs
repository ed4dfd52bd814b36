use crate::dashboard::{SortDirection, TablePage, ViewKind, ViewModel};
use crate::result::NumberFormat;
use std::fmt::Write;

/// Plain-text rendering of a table page: pipe-separated columns sized to
/// their widest cell, a separator line and the paging summary.
pub fn render_table(page: &TablePage) -> String {
    let headers: Vec<String> = page
        .headers
        .iter()
        .map(|h| match h.active {
            Some(SortDirection::Desc) => format!("{} v", h.label),
            Some(SortDirection::Asc) => format!("{} ^", h.label),
            None => h.label.to_string(),
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &page.rows {
        for (i, cell) in row.cells().iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    let _ = writeln!(out, "{}", header.join(" | "));

    let separator: String = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");
    let _ = writeln!(out, "{}", separator);

    for row in &page.rows {
        let cells: Vec<String> = row
            .cells()
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:width$}", cell, width = widths[i]))
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | "));
    }

    let _ = writeln!(out, "\n{}", page.summary());
    out
}

/// Plain-text rendering of a chart, menu or number display.
pub fn render_view(model: &ViewModel) -> String {
    let mut out = String::new();
    if model.kind == ViewKind::NumberDisplay {
        let _ = writeln!(
            out,
            "{}: {}",
            model.name,
            model.display.as_deref().unwrap_or("")
        );
        return out;
    }

    let _ = writeln!(out, "{} ({:?})", model.name, model.kind);
    let key_width = model
        .rows
        .iter()
        .map(|r| r.key.to_string().chars().count())
        .max()
        .unwrap_or(0);
    for row in &model.rows {
        let marker = if row.selected { '*' } else { ' ' };
        let _ = writeln!(
            out,
            " {} {:width$}  {}",
            marker,
            row.key.to_string(),
            NumberFormat::Count.format(row.value),
            width = key_width
        );
    }
    out
}
