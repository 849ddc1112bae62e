use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tracing::info_span;

use rtm_cli::config::{ConvertOverrides, ConvertSettings, DEFAULT_DATA_DIR, FileConfig};
use rtm_cli::pipeline::{convert, list_summaries, resolve_input, write_schema};
use rtm_cli::types::ConvertResult;
use rtm_ingest::{load_export, select_rows};

use crate::cli::{ConvertArgs, ListsArgs, SchemaArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_convert(args: &ConvertArgs, file: FileConfig) -> Result<ConvertResult> {
    let overrides = ConvertOverrides {
        input: args.input.clone(),
        template: args.template.clone(),
        mapping: args.mapping.clone(),
        rows_path: args.rows_path.clone(),
        rows_filter: args.rows_filter.clone(),
        output: args.output.clone(),
        output_json: args.output_json.clone(),
        data_dir: args.data_dir.clone(),
        date_basis: args.date_basis.clone(),
        dry_run: args.dry_run,
    };
    let settings = ConvertSettings::resolve(file, overrides)?;
    let span = info_span!("convert", date_basis = %settings.date_basis);
    let _guard = span.enter();
    convert(&settings)
}

pub fn run_schema(args: &SchemaArgs, file: &FileConfig) -> Result<PathBuf> {
    let input = locate_input(args.input.as_ref(), args.data_dir.as_ref(), file)?;
    let document = load_export(&input).context("load export")?;
    write_schema(&document, &args.output)?;
    Ok(args.output.clone())
}

pub fn run_lists(args: &ListsArgs, file: &FileConfig) -> Result<()> {
    let input = locate_input(args.input.as_ref(), args.data_dir.as_ref(), file)?;
    let document = load_export(&input).context("load export")?;
    let rows_path = args.rows_path.as_deref().or(file.rows_path.as_deref());
    let rows = select_rows(&document, rows_path).context("select rows")?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("List"),
        header_cell("Id"),
        header_cell("Tasks"),
        header_cell("Open"),
    ]);
    apply_table_style(&mut table);
    for list in list_summaries(&document, &rows) {
        table.add_row(vec![
            Cell::new(list.name.as_deref().unwrap_or("(unnamed)")),
            Cell::new(list.id),
            Cell::new(list.tasks),
            Cell::new(list.open),
        ]);
    }
    println!("Input: {}", input.display());
    println!("{table}");
    Ok(())
}

/// Flag value, then config value, then discovery in the data directory.
fn locate_input(
    input: Option<&PathBuf>,
    data_dir: Option<&PathBuf>,
    file: &FileConfig,
) -> Result<PathBuf> {
    let data_dir = data_dir
        .or(file.data_dir.as_ref())
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    resolve_input(input.or(file.input.as_ref()).map(PathBuf::as_path), &data_dir)
}
