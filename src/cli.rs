use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "license-graph",
    about = "Resolve the installed dependency graph of a project and group it by license",
    version
)]
pub struct Cli {
    /// Root manifest of the project
    #[arg(default_value = "package.json")]
    pub manifest: PathBuf,

    /// Package tree to scan (repeatable) [default: `trees` from config, else ./node_modules]
    #[arg(long = "tree", value_name = "DIR")]
    pub trees: Vec<PathBuf>,

    /// Config file [default: ./.license-graph/config.toml, fallback ~/.config/license-graph/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the license texts referenced by the config
    #[arg(long, value_name = "DIR")]
    pub licenses_dir: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Exit with code 1 when a package's license is not listed in the config
    #[arg(long)]
    pub check: bool,

    /// Show every package grouped by license
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Tables on stdout
    Terminal,
    /// Pruned packages as JSON
    Json,
    /// License sections with their texts as JSON
    Sections,
}
