use super::{open_workbook, read_rows, CodeListReport, RunSummary};
use crate::config::{BatchConfig, CodeListSpec, FlatCodeListSpec};
use anyhow::{bail, Context as AnyhowContext, Result};
use los_graph::{
    apply_focus, is_code_list_sheet, normalize_tag, ConceptScheme, FocusScope, GraphSink,
    RdfGraph, SchemeBuilder, TurtleSink,
};
use los_tabular::{distinct_column, CsvSource, Row, TabularSource};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// One scheme to build, with its input already read
enum Job<'a> {
    Hierarchy { spec: &'a CodeListSpec, rows: Vec<Row> },
    Sheet { tag: String, rows: Vec<Row> },
    Flat { spec: &'a FlatCodeListSpec, codes: BTreeSet<String> },
}

/// File stem of a code list document
pub fn destination(tag: &str) -> String {
    format!("cl-{}", tag.to_lowercase())
}

pub fn run(config: &BatchConfig, summary: &mut RunSummary) -> Result<()> {
    let jobs = collect_jobs(config)?;
    log::info!("Building {} code lists", jobs.len());

    // Sources are read sequentially, schemes are built in parallel
    let builder = SchemeBuilder::new(config.uris.clone());
    let built: Vec<Result<(ConceptScheme, RdfGraph)>> = jobs
        .into_par_iter()
        .map(|job| {
            let scheme = build(&builder, job)?;
            let graph = scheme.to_graph(&config.uris);
            Ok((scheme, graph))
        })
        .collect();

    // A failed scheme does not stop the independent ones
    let mut sink = TurtleSink::new(config.output_dir());
    let total = built.len();
    let mut failures = Vec::new();
    for result in built {
        let written = result.and_then(|(scheme, graph)| {
            let destination = destination(&scheme.tag);
            sink.write(&graph, &destination)
                .with_context(|| format!("Code list '{}'", scheme.tag))?;
            Ok(CodeListReport {
                tag: scheme.tag.clone(),
                concepts: scheme.len(),
                triples: graph.edge_count(),
                file: sink.path_for(&destination),
            })
        });
        match written {
            Ok(report) => summary.code_lists.push(report),
            Err(err) => {
                log::error!("{err:#}");
                failures.push(format!("{err:#}"));
            }
        }
    }

    if !failures.is_empty() {
        bail!(
            "{} of {} code lists failed:\n  {}",
            failures.len(),
            total,
            failures.join("\n  ")
        );
    }
    Ok(())
}

fn collect_jobs(config: &BatchConfig) -> Result<Vec<Job<'_>>> {
    let mut workbook = open_workbook(config)?;
    let mut jobs = Vec::new();

    for spec in &config.code_lists {
        let rows = read_rows(config, &spec.source, workbook.as_mut())
            .with_context(|| format!("Code list '{}'", spec.tag))?;
        jobs.push(Job::Hierarchy { spec, rows });
    }

    if config.auto_sheets {
        if let Some(workbook) = workbook.as_mut() {
            let declared: HashSet<String> = config
                .code_lists
                .iter()
                .map(|c| normalize_tag(&c.tag))
                .chain(config.flat_code_lists.iter().map(|c| normalize_tag(&c.tag)))
                .collect();

            for name in workbook.sheet_names() {
                let tag = normalize_tag(&name);
                if declared.contains(&tag) {
                    continue;
                }
                let sheet = workbook.sheet(&name)?;
                if !is_code_list_sheet(&tag, sheet.header_width()) {
                    log::debug!("Skipping sheet '{name}'");
                    continue;
                }
                let rows = sheet.rows()?;
                jobs.push(Job::Sheet { tag, rows });
            }
        }
    }

    for spec in &config.flat_code_lists {
        let mut codes = BTreeSet::new();
        for path in &spec.sources {
            let path = config.resolve(path);
            let source = CsvSource::from_path(&path)
                .with_context(|| format!("Code list '{}': failed to read {}", spec.tag, path.display()))?;
            codes.extend(distinct_column(&source, spec.column)?);
        }
        jobs.push(Job::Flat { spec, codes });
    }

    Ok(jobs)
}

fn build(builder: &SchemeBuilder, job: Job<'_>) -> Result<ConceptScheme> {
    let scheme = match job {
        Job::Hierarchy { spec, rows } => {
            let tag = normalize_tag(&spec.tag);
            let mut scheme = builder
                .build(&tag, &rows, spec.levels)
                .with_context(|| format!("Code list '{}'", spec.tag))?;
            if let Some(focus) = spec.focus.clone() {
                apply_focus(&mut scheme, focus.into_transform().as_ref(), spec.focus_scope);
            }
            scheme
        }
        Job::Sheet { tag, rows } => builder
            .build(&tag, &rows, 1)
            .with_context(|| format!("Sheet code list '{tag}'"))?,
        Job::Flat { spec, codes } => {
            let mut scheme = builder.build_flat(&normalize_tag(&spec.tag), codes);
            if let Some(focus) = spec.focus.clone() {
                apply_focus(&mut scheme, focus.into_transform().as_ref(), FocusScope::All);
            }
            scheme
        }
    };
    Ok(scheme)
}
