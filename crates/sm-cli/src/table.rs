//! Aligned plain-text tables for `status` and `list`.

const COLUMN_GAP: &str = "  ";

/// Render `rows` under `headers`, one left-aligned column per header, with a
/// dashed rule below the header line. No trailing newline.
pub(crate) fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule_width = widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(&widths, headers.iter().copied()));
    lines.push("-".repeat(rule_width));
    for row in rows {
        lines.push(format_row(&widths, row.iter().map(String::as_str)));
    }

    lines.join("\n")
}

fn format_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();

    padded.join(COLUMN_GAP).trim_end().to_string()
}
