//! Conversion pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: Locate and parse the export, template and mapping
//! 2. **Filter**: Row predicate, then completed/trashed/orphan exclusion
//! 3. **Linearize**: Depth-first ordering of tasks and their notes
//! 4. **Emit**: Render one CSV line and one trace entry per emission
//! 5. **Output**: Pick file names and write the CSV and trace
//!
//! Nothing is written until every earlier stage has succeeded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use rtm_ingest::{
    EXPORT_PREFIX, discover_latest_export, extract_schema, load_export, load_mapping,
    read_template_headers, select_rows,
};
use rtm_model::{Emission, ExportDocument, ListIndex, Mapping, Record};
use rtm_output::{
    RenderedOutput, RowEmitter, list_suffix, render_rows, suffixed_output_path, write_outputs,
};
use rtm_transform::{
    DateBasis, FieldResolver, FilterStats, Linearization, NoteIndex, Predicate, PredicateParser,
    filter_records, linearize, retain_matching,
};
use tracing::{debug, info, info_span, trace, warn};

use crate::config::ConvertSettings;
use crate::logging::redact_value;
use crate::types::{ConvertResult, ListSummary};

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Everything read from disk before transformation starts.
#[derive(Debug)]
pub struct IngestResult {
    pub input: PathBuf,
    pub document: ExportDocument,
    pub rows: Vec<Record>,
    pub headers: Vec<String>,
    pub mapping: Mapping,
}

/// Pick the export to read.
///
/// An existing `input` is used as given. Otherwise the newest
/// `rememberthemilk_export*` file in `data_dir` is used; if there is none,
/// a configured `input` is returned so the read reports it missing.
pub fn resolve_input(input: Option<&Path>, data_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = input
        && path.is_file()
    {
        return Ok(path.to_path_buf());
    }
    let discovered = if data_dir.is_dir() {
        discover_latest_export(data_dir).context("search data directory for exports")?
    } else {
        None
    };
    match (discovered, input) {
        (Some(found), _) => {
            info!(path = %found.display(), "using newest export");
            Ok(found)
        }
        (None, Some(path)) => Ok(path.to_path_buf()),
        (None, None) => bail!(
            "no input given and no {EXPORT_PREFIX}* file in {}",
            data_dir.display()
        ),
    }
}

/// Read the export, its candidate rows, the template headers and the mapping.
pub fn ingest(settings: &ConvertSettings) -> Result<IngestResult> {
    let input = resolve_input(settings.input.as_deref(), &settings.data_dir)?;
    let document = load_export(&input).context("load export")?;
    let rows = select_rows(&document, settings.rows_path.as_deref()).context("select rows")?;
    let headers = read_template_headers(&settings.template).context("read template headers")?;
    let mapping = match &settings.mapping {
        Some(path) => load_mapping(path).context("load mapping")?,
        None => Mapping::default(),
    };
    debug!(
        columns = headers.len(),
        mapped = mapping.len(),
        lists = document.lists().len(),
        "ingest inputs ready"
    );
    Ok(IngestResult {
        input,
        document,
        rows,
        headers,
        mapping,
    })
}

// ============================================================================
// Stage 2: Filter
// ============================================================================

/// Rows left after pre-selection and exclusion.
#[derive(Debug)]
pub struct FilterResult {
    pub records: Vec<Record>,
    pub predicate_removed: Option<usize>,
    pub stats: FilterStats,
}

/// Parse the optional row predicate. A malformed predicate is fatal.
pub fn parse_rows_filter(expression: Option<&str>) -> Result<Option<Predicate>> {
    expression
        .map(|text| {
            PredicateParser::parse(text).with_context(|| format!("invalid rows filter '{text}'"))
        })
        .transpose()
}

pub fn filter(
    mut rows: Vec<Record>,
    predicate: Option<&Predicate>,
    document: &ExportDocument,
    lists: &ListIndex,
) -> FilterResult {
    let predicate_removed =
        predicate.map(|predicate| retain_matching(&mut rows, predicate, document.root(), lists));
    let outcome = filter_records(rows);
    FilterResult {
        records: outcome.records,
        predicate_removed,
        stats: outcome.stats,
    }
}

// ============================================================================
// Stage 3-4: Linearize and Emit
// ============================================================================

pub fn emit(
    emissions: &[Emission<'_>],
    headers: &[String],
    mapping: &Mapping,
    document: &ExportDocument,
    basis: DateBasis,
) -> RenderedOutput {
    let resolver = FieldResolver::new(mapping, document.root());
    let emitter = RowEmitter::new(headers, resolver, basis);
    let rendered = render_rows(&emitter, emissions);
    for line in &rendered.lines {
        trace!(row = redact_value(line), "csv line");
    }
    rendered
}

// ============================================================================
// Stage 5: Output
// ============================================================================

/// Final CSV and trace paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub trace: PathBuf,
}

/// Apply the list suffix to whichever output paths were not set explicitly.
pub fn output_paths(settings: &ConvertSettings, suffix: Option<&str>) -> OutputPaths {
    let pick = |path: &Path, explicit: bool| match suffix {
        Some(suffix) if !explicit => suffixed_output_path(path, suffix),
        _ => path.to_path_buf(),
    };
    OutputPaths {
        csv: pick(&settings.output, settings.output_explicit),
        trace: pick(&settings.output_json, settings.output_json_explicit),
    }
}

pub fn output(paths: &OutputPaths, headers: &[String], rendered: &RenderedOutput) -> Result<()> {
    write_outputs(
        &paths.csv,
        &paths.trace,
        headers,
        &rendered.lines,
        &rendered.trace,
    )
    .context("write outputs")
}

// ============================================================================
// Full run
// ============================================================================

/// Run every stage for one conversion.
pub fn convert(settings: &ConvertSettings) -> Result<ConvertResult> {
    let predicate = parse_rows_filter(settings.rows_filter.as_deref())?;

    let ingest_span = info_span!("ingest");
    let ingest_start = Instant::now();
    let IngestResult {
        input,
        document,
        rows,
        headers,
        mapping,
    } = ingest_span.in_scope(|| ingest(settings))?;
    let rows_read = rows.len();
    info!(
        input = %input.display(),
        rows = rows_read,
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let lists = ListIndex::from_document(&document);
    let filter_span = info_span!("filter");
    let filter_start = Instant::now();
    let FilterResult {
        records,
        predicate_removed,
        stats,
    } = filter_span.in_scope(|| filter(rows, predicate.as_ref(), &document, &lists));
    info!(
        kept = stats.kept,
        completed = stats.completed,
        trashed = stats.trashed,
        orphaned = stats.orphaned,
        duration_ms = filter_start.elapsed().as_millis(),
        "filter complete"
    );

    let notes = document.notes();
    let linearize_span = info_span!("linearize");
    let linearize_start = Instant::now();
    let note_index = NoteIndex::new(&notes);
    let linearization: Linearization<'_> =
        linearize_span.in_scope(|| linearize(&records, &note_index));
    info!(
        tasks = linearization.task_count(),
        notes = linearization.note_count(),
        unreachable = linearization.unreachable.len(),
        duration_ms = linearize_start.elapsed().as_millis(),
        "linearize complete"
    );

    let emit_span = info_span!("emit");
    let emit_start = Instant::now();
    let rendered = emit_span.in_scope(|| {
        emit(
            &linearization.emissions,
            &headers,
            &mapping,
            &document,
            settings.date_basis,
        )
    });
    info!(
        lines = rendered.lines.len(),
        duration_ms = emit_start.elapsed().as_millis(),
        "emit complete"
    );

    let output_span = info_span!("output", dry_run = settings.dry_run);
    let _output_guard = output_span.enter();
    let suffix = list_suffix(&linearization.emissions, &lists);
    let paths = output_paths(settings, suffix.as_deref());
    if settings.dry_run {
        info!(csv = %paths.csv.display(), "dry run, nothing written");
    } else {
        output(&paths, &headers, &rendered)?;
    }
    if rendered.lines.is_empty() {
        warn!("no rows emitted");
    }

    Ok(ConvertResult {
        input,
        rows_read,
        predicate_removed,
        filter: stats,
        tasks: linearization.task_count(),
        notes: linearization.note_count(),
        unreachable: linearization.unreachable.clone(),
        skipped: linearization.skipped,
        list_suffix: suffix,
        output: paths.csv,
        output_json: paths.trace,
        written: !settings.dry_run,
    })
}

// ============================================================================
// Auxiliary commands
// ============================================================================

/// Lists in document order with their task counts, plus an unnamed
/// bucket for rows whose list is unknown.
pub fn list_summaries(document: &ExportDocument, rows: &[Record]) -> Vec<ListSummary> {
    let open_ids: Vec<Option<String>> = filter_records(rows.to_vec())
        .records
        .iter()
        .map(Record::list_id)
        .collect();
    let mut totals: HashMap<Option<String>, (usize, usize)> = HashMap::new();
    for list_id in rows.iter().map(Record::list_id) {
        totals.entry(list_id).or_default().0 += 1;
    }
    for list_id in open_ids {
        totals.entry(list_id).or_default().1 += 1;
    }

    let mut summaries: Vec<ListSummary> = document
        .lists()
        .into_iter()
        .map(|list| {
            let (tasks, open) = totals.remove(&Some(list.id.clone())).unwrap_or_default();
            ListSummary {
                id: list.id,
                name: list.name,
                tasks,
                open,
            }
        })
        .collect();

    let (tasks, open) = totals
        .into_values()
        .fold((0, 0), |(t, o), (tasks, open)| (t + tasks, o + open));
    if tasks > 0 {
        summaries.push(ListSummary {
            id: "-".to_string(),
            name: None,
            tasks,
            open,
        });
    }
    summaries
}

/// Write the type skeleton of an export as pretty JSON.
pub fn write_schema(document: &ExportDocument, path: &Path) -> Result<()> {
    let schema = extract_schema(document.root());
    let text = serde_json::to_string_pretty(&schema).context("serialize schema")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "schema written");
    Ok(())
}
