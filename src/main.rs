use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use sitemapper::alarms::alarms_for_site;
use sitemapper::config::ImportOptions;
use sitemapper::engine::{ImportEngine, ImportSummary, PipelineError};
use sitemapper::export::{export_kml, export_point_attributes_csv, ExportMode};
use sitemapper::net::FetchOptions;
use sitemapper::tabular::read_csv;
use sitemapper::thematic::{generate_for_store, unify_legends, Source, ThematicConfig};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Telecom site and sector import, thematic colouring and KML export")]
struct Cli {
    /// JSON file overriding the thematic palettes and thresholds
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    thematic_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import CSV, JSON or KML files and URLs and print what was loaded
    Import {
        #[command(flatten)]
        input: InputArgs,
        /// Print the whole store instead of per-source counts
        #[arg(long)]
        json: bool,
    },
    /// Write imported sites as KML
    ExportKml {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, value_enum, default_value_t = ModeOpt::Sites)]
        mode: ModeOpt,
        /// Output path (`-` for stdout)
        #[arg(short, long, default_value = "-", value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
    /// Write the custom attributes of imported KML points as CSV
    ExportAttributes {
        #[command(flatten)]
        input: InputArgs,
        /// Output path (`-` for stdout)
        #[arg(short, long, default_value = "-", value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
    /// Build colour legends for sector and/or KML point attributes
    Thematic {
        #[command(flatten)]
        input: InputArgs,
        /// Sector attribute, e.g. `technology` or `custom:RSRP`
        #[arg(long)]
        site_attribute: Option<String>,
        /// KML point attribute, e.g. `custom:PCI`
        #[arg(long)]
        kml_attribute: Option<String>,
    },
    /// List alarm rows that belong to a site
    Alarms {
        /// Alarm export (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        alarms: PathBuf,
        #[arg(long)]
        site: String,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Files or http(s) URLs to import
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Group tag for tabular file imports (URLs group by source name)
    #[arg(long)]
    group: Option<String>,

    /// Request timeout for URLs, in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// Bearer token for URLs
    #[arg(long, env = "SITEMAPPER_TOKEN")]
    token: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeOpt {
    Sites,
    Full,
}

impl From<ModeOpt> for ExportMode {
    fn from(m: ModeOpt) -> Self {
        match m {
            ModeOpt::Sites => ExportMode::Sites,
            ModeOpt::Full => ExportMode::Full,
        }
    }
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Import every input; failures are logged and skipped.
fn load(input: &InputArgs) -> (ImportEngine, Vec<ImportSummary>) {
    let mut options = ImportOptions::new();
    if let Some(group) = &input.group {
        options = options.with_group(group.clone());
    }
    let mut fetch = FetchOptions::default().with_timeout(Duration::from_secs(input.timeout));
    if let Some(token) = &input.token {
        fetch = fetch.with_bearer_token(token.clone());
    }
    let engine = ImportEngine::new(options).with_fetch_options(fetch);

    let (urls, files): (Vec<&String>, Vec<&String>) = input.inputs.iter().partition(|i| is_url(i));
    let paths: Vec<PathBuf> = files.iter().map(|f| PathBuf::from(f.as_str())).collect();

    let mut results = engine.import_files(&paths);
    results.extend(urls.iter().map(|u| engine.import_url(u)));

    let summaries = results.into_iter().filter_map(report).collect();
    (engine, summaries)
}

fn report(result: Result<ImportSummary, PipelineError>) -> Option<ImportSummary> {
    match result {
        Ok(summary) => Some(summary),
        Err(e) if e.source.is_empty_result() => {
            log::warn!("{}", e);
            None
        }
        Err(e) => {
            log::error!("{}", e);
            None
        }
    }
}

fn write_output(path: &Path, text: &str) -> CliResult<()> {
    if path == Path::new("-") {
        println!("{}", text);
    } else {
        std::fs::write(path, text)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

fn thematic_config(path: Option<&Path>) -> CliResult<ThematicConfig> {
    match path {
        Some(p) => Ok(ThematicConfig::from_json(&std::fs::read_to_string(p)?)?),
        None => Ok(ThematicConfig::default()),
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Import { input, json } => {
            let (engine, summaries) = load(&input);
            if json {
                println!("{}", serde_json::to_string_pretty(&*engine.store())?);
            } else {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            }
        }
        Command::ExportKml { input, mode, output } => {
            let (engine, _) = load(&input);
            let store = engine.store();
            if store.sites.is_empty() {
                return Err("no sites to export".into());
            }
            write_output(&output, &export_kml(&store.sites, mode.into()))?;
        }
        Command::ExportAttributes { input, output } => {
            let (engine, _) = load(&input);
            let store = engine.store();
            if store.kml_points().next().is_none() {
                return Err("no KML points to export".into());
            }
            write_output(&output, &export_point_attributes_csv(&store.points)?)?;
        }
        Command::Thematic {
            input,
            site_attribute,
            kml_attribute,
        } => {
            let config = thematic_config(cli.thematic_config.as_deref())?;
            let (engine, _) = load(&input);
            let store = engine.store();

            let mut sites = site_attribute
                .as_deref()
                .and_then(|a| generate_for_store(&store, Source::Sites, a, &config));
            let mut kml = kml_attribute
                .as_deref()
                .and_then(|a| generate_for_store(&store, Source::Kml, a, &config));
            if let (Some(s), Some(k)) = (sites.as_mut(), kml.as_mut()) {
                if unify_legends(s, k, &config) {
                    log::info!("unified legends for {} and {}", s.attribute, k.attribute);
                }
            }

            let out = serde_json::json!({ "sites": sites, "kml": kml });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Alarms { alarms, site } => {
            let text = std::fs::read_to_string(&alarms)?;
            let rows = read_csv(&text)?;
            let hits = alarms_for_site(&rows, &site);
            log::info!("{} of {} alarm rows match {}", hits.len(), rows.len(), site);
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
