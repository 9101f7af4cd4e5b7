use guided_vectorize::config::{load_config, VectorizeToolConfig};
use guided_vectorize::diagnostics::{LogSink, RunSummary, TimingBreakdown};
use guided_vectorize::image::io::write_json_file;
use guided_vectorize::input::{ParameterFile, RunParameters};
use guided_vectorize::output::{create_output, MatchOverlay, SqlWriter, VectorWriter};
use guided_vectorize::{VectorizeError, Vectorizer};
use log::info;
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), VectorizeError> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let mut load_timings = TimingBreakdown::default();
    let raster = load_timings.time("load_raster", || config.raster.load())?;
    let (params, records) = ParameterFile::open(&config.parameters)?;
    let geo = params.geo_reference(raster.width(), raster.height())?;
    info!(
        "raster {}x{} ({} foreground), tolerance {} px, {} reference features announced",
        raster.width(),
        raster.height(),
        raster.as_grid().foreground_count(),
        geo.tolerance_px,
        params.ref_count
    );

    let grid = raster.as_grid();
    let vectorizer =
        Vectorizer::new(grid, geo.clone())?.with_declared_references(params.ref_count);

    let vector_path = config.output.vector_path()?;
    let sql_path = config.output.sql_path()?;
    let vector = VectorWriter::new(
        create_output(&vector_path)?,
        geo.tolerance_px,
        config.vector_color,
    )?;
    let sql = SqlWriter::new(
        create_output(&sql_path)?,
        config.experiment_id,
        params.data_id,
        geo,
    );
    let overlay = config
        .output
        .overlay_image
        .clone()
        .map(|path| MatchOverlay::new(&grid, path));
    let mut sinks = (vector, (sql, overlay));

    let mut summary = follow_all(&config, &vectorizer, records, &mut sinks)?;
    load_timings.stages.append(&mut summary.timings.stages);
    summary.timings.stages = load_timings.stages;

    println!("{}", summary.headline());
    println!("Vector file written to {}", vector_path.display());
    println!("SQL file written to {}", sql_path.display());
    if let Some(path) = &config.output.overlay_image {
        println!("Overlay written to {}", path.display());
    }
    if let Some(path) = &config.output.report_json {
        let report = RunReport {
            config_path: &config_path,
            parameters: &params,
            summary: &summary,
        };
        write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

fn follow_all<I, O>(
    config: &VectorizeToolConfig,
    vectorizer: &Vectorizer<'_>,
    records: I,
    sinks: &mut O,
) -> Result<RunSummary, VectorizeError>
where
    I: IntoIterator<Item = guided_vectorize::Result<guided_vectorize::input::ReferenceRecord>>,
    O: guided_vectorize::output::FeatureSink,
{
    #[cfg(feature = "parallel")]
    if config.parallel {
        return vectorizer.run_parallel(records, sinks, &mut LogSink);
    }
    #[cfg(not(feature = "parallel"))]
    if config.parallel {
        log::warn!("built without the `parallel` feature; following sequentially");
    }
    vectorizer.run(records, sinks, &mut LogSink)
}

fn usage() -> VectorizeError {
    VectorizeError::Config("Usage: guided_vectorize <config.json>".to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReport<'a> {
    config_path: &'a str,
    parameters: &'a RunParameters,
    summary: &'a RunSummary,
}
