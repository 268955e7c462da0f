use clap::Parser;
use colored::Colorize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat};
use crate::runner::{Options, Outcome, Runner};

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    // Diagnostics go to stderr; stdout is reserved for the rendered table.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label.bold(), value);
}

fn format_label(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "text",
        OutputFormat::Json => "json",
        OutputFormat::Html => "html",
    }
}

fn print_run_summary(options: &Options) {
    format_kv_line("dataset", &options.dataset);
    format_kv_line("where", &options.where_clause);
    format_kv_line("limit", &options.limit.to_string());
    format_kv_line("filter", &options.filter_needle);
    format_kv_line("format", format_label(options.format));
    format_kv_line("output", options.output.as_deref().unwrap_or("<stdout>"));
    format_kv_line("timeout", &format!("{}s", options.timeout_seconds));
}

fn build_options(args: &CliArgs, cfg: &ConfigFile) -> Result<Options, String> {
    let defaults = Options::default();

    let dataset = args
        .dataset
        .clone()
        .or_else(|| cfg.dataset.clone())
        .unwrap_or(defaults.dataset);
    let where_clause = args
        .where_clause
        .clone()
        .or_else(|| cfg.where_clause.clone())
        .unwrap_or(defaults.where_clause);
    let limit = args.limit.or(cfg.limit).unwrap_or(defaults.limit);
    let filter_needle = args
        .filter
        .clone()
        .or_else(|| cfg.filter.clone())
        .unwrap_or(defaults.filter_needle);
    let timeout_seconds = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(defaults.timeout_seconds);
    let output = args.output.clone().or_else(|| cfg.output.clone());

    let format = match args.format.as_deref().or(cfg.output_format.as_deref()) {
        Some(raw) => OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected html, json or text"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(defaults.format),
    };

    Ok(Options {
        api_base: defaults.api_base,
        dataset,
        where_clause,
        limit,
        filter_needle,
        timeout_seconds,
        output,
        format,
    })
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::parse();

    if args.no_color {
        colored::control::set_override(false);
    }
    init_logging(args.verbose);
    validation::validate(&args)?;

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => {
                config::ensure_default_config_file(&path)?;
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };
    if cfg.no_color.unwrap_or(false) {
        colored::control::set_override(false);
    }

    let options = build_options(&args, &cfg)?;
    if args.verbose > 0 {
        print_run_summary(&options);
    }

    let runner = Runner::new(options).map_err(|e| e.to_string())?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    match rt.block_on(runner.run()) {
        Ok(Outcome::Rendered { rows }) => {
            info!(rows, "table rendered");
            if let Some(path) = runner.options().output.as_deref() {
                format_kv_line("saved", path);
            }
            Ok(())
        }
        Ok(Outcome::NoData) => {
            info!("no records matched, rendered the no-data row");
            if let Some(path) = runner.options().output.as_deref() {
                format_kv_line("saved", path);
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "run failed");
            Err(e.to_string())
        }
    }
}
