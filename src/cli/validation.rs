use crate::cli::args::CliArgs;
use crate::fetcher;
use crate::output::OutputFormat;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(limit) = args.limit {
        if limit == 0 || limit > fetcher::DEFAULT_LIMIT {
            return Err(format!(
                "invalid --limit {limit}, expected 1..={}",
                fetcher::DEFAULT_LIMIT
            ));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive number of seconds".to_string());
        }
    }
    if let Some(raw) = args.format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --format '{raw}', expected html, json or text"
            ));
        }
    }
    if let Some(dataset) = args.dataset.as_deref() {
        if dataset.trim().is_empty() {
            return Err("invalid --dataset, id is empty".to_string());
        }
    }
    Ok(())
}
