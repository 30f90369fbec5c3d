use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use bids_cli::types::ConvertResult;

pub fn print_summary(result: &ConvertResult) {
    println!("Output: {}", result.output_dir.display());
    for path in &result.dataset_files {
        println!("Dataset table: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Subject"),
        header_cell("Session"),
        header_cell("Task"),
        header_cell("Files"),
        header_cell("Failed"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);

    let mut total_files = 0usize;
    let mut total_warnings = 0usize;
    for summary in &result.acquisitions {
        total_files += summary.files.len();
        total_warnings += summary.compliance.warning_count();
        table.add_row(vec![
            Cell::new(file_name(&summary.source))
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&summary.subject),
            optional_cell(summary.session.as_deref()),
            optional_cell(summary.task.as_deref()),
            Cell::new(summary.files.len()),
            count_cell(summary.failures.len(), Color::Red),
            count_cell(summary.compliance.warning_count(), Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_files).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(total_warnings, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_issue_table(result);

    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_issue_table(result: &ConvertResult) {
    let mut rows = Vec::new();
    for summary in &result.acquisitions {
        let source = file_name(&summary.source);
        for failure in &summary.failures {
            rows.push((source.clone(), failure.kind.to_string(), "EXTRACTION", failure.reason.clone()));
        }
        for issue in &summary.compliance.issues {
            rows.push((source.clone(), issue.file.clone(), issue.level.as_str(), issue.message()));
        }
    }
    if rows.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("File"),
        header_cell("Kind"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for (source, file, kind, message) in rows {
        let color = if kind == "EXTRACTION" { Color::Red } else { Color::Yellow };
        table.add_row(vec![
            Cell::new(source),
            Cell::new(file),
            Cell::new(kind).fg(color),
            Cell::new(message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
