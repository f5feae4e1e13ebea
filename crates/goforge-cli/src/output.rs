use goforge_core::report::Narrate;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a report as pretty JSON or as its narration, one line at a time.
pub fn print_report<R: Narrate + Serialize>(report: &R, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }
    for line in report.narrate() {
        println!("{line}");
    }
    Ok(())
}

/// Left-aligned columns separated by two spaces, with a dashed rule under the header.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    for line in table_lines(headers, &rows) {
        println!("{line}");
    }
}

fn table_lines(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(String::len)
                .chain(std::iter::once(headers[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = vec![render_row(headers.iter().copied(), &widths)];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(|row| render_row(row.iter().map(String::as_str), &widths)));
    lines
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter().copied())
        .map(|(cell, w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let rows = vec![
            vec!["github.com/pkg/errors".into(), "v0.9.0".into(), "v0.9.1".into()],
            vec!["golang.org/x/text".into(), "v0.14.0".into(), "v0.15.0".into()],
        ];
        let lines = table_lines(&["MODULE", "CURRENT", "LATEST"], &rows);
        assert_eq!(lines[0], "MODULE                 CURRENT  LATEST");
        assert_eq!(lines[1], "---------------------  -------  -------");
        assert_eq!(lines[2], "github.com/pkg/errors  v0.9.0   v0.9.1");
        assert_eq!(lines[3], "golang.org/x/text      v0.14.0  v0.15.0");
    }
}
