use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{debug, info};

use qc_layout::AdvanceMeasurer;
use qc_model::ReportProfile;
use qc_report::{
    DocumentSink, JsonLinesSink, PageCollector, ReportVariant, builtin_profile,
    cv_two_month_profile, render_report,
};

use crate::cli::{ProfileArgs, RenderArgs};
use crate::summary::{apply_table_style, header_cell};
use crate::types::{OutputTarget, RenderOutcome};

/// Default page-plan path next to the input: `report.json` becomes
/// `report.pages.jsonl`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("pages.jsonl")
}

fn output_target(args: &RenderArgs) -> OutputTarget {
    if args.dry_run {
        return OutputTarget::Discarded;
    }
    match &args.output {
        Some(path) if path.as_os_str() == "-" => OutputTarget::Stdout,
        Some(path) => OutputTarget::File(path.clone()),
        None => OutputTarget::File(default_output_path(&args.input)),
    }
}

pub fn load_profile(path: &Path) -> Result<ReportProfile> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let profile: ReportProfile =
        serde_json::from_str(&text).with_context(|| format!("parse profile {}", path.display()))?;
    debug!(profile = %profile.name, path = %path.display(), "loaded profile override");
    Ok(profile)
}

pub fn run_render(args: &RenderArgs) -> Result<RenderOutcome> {
    let input = &args.input;
    let source = fs::read_to_string(input).with_context(|| format!("read {}", input.display()))?;
    let profile = args.profile.as_deref().map(load_profile).transpose()?;
    let target = output_target(args);
    let measurer = AdvanceMeasurer::default();

    let render = |sink: &mut dyn DocumentSink| {
        render_report(args.variant, &source, profile.clone(), &measurer, sink)
            .with_context(|| format!("render {}", input.display()))
    };
    let summary = match &target {
        OutputTarget::Discarded => render(&mut PageCollector::default())?,
        OutputTarget::Stdout => render(&mut JsonLinesSink::new(io::stdout().lock()))?,
        OutputTarget::File(path) => {
            ensure_parent_dir(path)?;
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            render(&mut JsonLinesSink::new(BufWriter::new(file)))?
        }
    };
    info!(
        input = %input.display(),
        pages = summary.page_count(),
        "render complete"
    );

    Ok(RenderOutcome {
        input: input.clone(),
        target,
        summary,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

/// One row per built-in profile.
pub fn profiles_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variant"),
        header_cell("Title"),
        header_cell("Columns"),
        header_cell("First page"),
        header_cell("Full page"),
        header_cell("Band"),
        header_cell("Summary"),
    ]);
    apply_table_style(&mut table);
    for variant in ReportVariant::ALL {
        let profile = builtin_profile(variant);
        let capacity = &profile.capacity;
        let columns = match variant {
            ReportVariant::CvTwoMonth => format!("{}/{}", profile.arity(), profile.arity() + 1),
            _ => profile.arity().to_string(),
        };
        table.add_row(vec![
            variant.as_str().to_string(),
            variant.title().to_string(),
            columns,
            format!(
                "{}/{}",
                capacity.first_page.normal, capacity.first_page.header_overflow
            ),
            capacity.full_page.to_string(),
            capacity.full_band.to_string(),
            profile
                .summary
                .as_ref()
                .map_or_else(|| "-".to_string(), |summary| summary.title.clone()),
        ]);
    }
    table
}

pub fn run_profiles() -> Result<()> {
    println!("{}", profiles_table());
    Ok(())
}

pub fn profile_json(args: &ProfileArgs) -> Result<String> {
    let profile = match args.variant {
        ReportVariant::CvTwoMonth => cv_two_month_profile(args.with_ratio),
        variant => builtin_profile(variant),
    };
    serde_json::to_string_pretty(&profile).context("serialize profile")
}

pub fn run_profile(args: &ProfileArgs) -> Result<()> {
    println!("{}", profile_json(args)?);
    Ok(())
}
