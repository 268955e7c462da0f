use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "studata",
    version,
    about = "student statistics table builder for the Bahrain Open Data Portal",
    long_about = "Studata fetches one page of the student nationality statistics dataset from the Bahrain Open Data Portal, narrows it to a college, and renders the result as an HTML table (or JSON/text).\n\nExamples:\n  studata\n  studata -o students.html\n  studata --filter \"College of IT\" --format text\n  studata --config ~/.studata/config.yml\n\nTip: Use the config file to persist query settings and keep invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored terminal output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered table to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'F',
        long = "fmt",
        visible_alias = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: html, json or text (default: inferred from the output path, else html)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'd',
        long = "ds",
        visible_alias = "dataset",
        value_name = "ID",
        help_heading = "Query",
        help = "Dataset id on the portal."
    )]
    pub dataset: Option<String>,

    #[arg(
        short = 'w',
        long = "where",
        value_name = "CLAUSE",
        help_heading = "Query",
        help = "Server-side ODSQL where clause."
    )]
    pub where_clause: Option<String>,

    #[arg(
        short = 'l',
        long = "lim",
        visible_alias = "limit",
        value_name = "N",
        help_heading = "Query",
        help = "Page size (1-100)."
    )]
    pub limit: Option<usize>,

    #[arg(
        short = 'f',
        long = "filter",
        value_name = "TEXT",
        help_heading = "Query",
        help = "Client-side case-sensitive substring match on the colleges field."
    )]
    pub filter: Option<String>,

    #[arg(
        short = 't',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.studata/config.yml)."
    )]
    pub config: Option<String>,
}
