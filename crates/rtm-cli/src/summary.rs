use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rtm_cli::types::ConvertResult;

pub fn print_summary(result: &ConvertResult) {
    println!("Input: {}", result.input.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Rows")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let stats = &result.filter;
    table.add_row(vec![Cell::new("Read"), Cell::new(result.rows_read)]);
    if let Some(removed) = result.predicate_removed {
        table.add_row(vec![Cell::new("Rows filter"), removed_cell(removed)]);
    }
    table.add_row(vec![Cell::new("Completed"), removed_cell(stats.completed)]);
    table.add_row(vec![Cell::new("Trashed"), removed_cell(stats.trashed)]);
    table.add_row(vec![
        Cell::new(format!("Orphaned ({} passes)", stats.orphan_passes)),
        removed_cell(stats.orphaned),
    ]);
    table.add_row(vec![Cell::new("Unreachable"), warn_cell(result.unreachable.len())]);
    table.add_row(vec![Cell::new("Without id"), warn_cell(result.skipped)]);
    table.add_row(vec![Cell::new("Tasks"), Cell::new(result.tasks)]);
    table.add_row(vec![Cell::new("Notes"), Cell::new(result.notes)]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.rows_written()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if let Some(suffix) = &result.list_suffix {
        println!("List: {suffix}");
    }
    print_path("CSV", &result.output, result.written);
    print_path("Trace", &result.output_json, result.written);
    if !result.unreachable.is_empty() {
        eprintln!("Tasks in parent cycles (not exported):");
        for id in &result.unreachable {
            eprintln!("- {id}");
        }
    }
}

fn print_path(label: &str, path: &Path, written: bool) {
    if written {
        println!("{label}: {}", path.display());
    } else {
        println!("{label}: {} (dry run, not written)", path.display());
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    align_column(table, 2, CellAlignment::Right);
    align_column(table, 3, CellAlignment::Right);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(60);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn removed_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(format!("-{count}")).fg(Color::Yellow)
    } else {
        dim_cell(count)
    }
}

fn warn_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
