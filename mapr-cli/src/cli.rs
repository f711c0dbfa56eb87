use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use mapr_lib::config::Layout;

#[derive(Parser)]
#[command(name = "mapr")]
#[command(version, about = "Browse an OMERO.web annotation tree", long_about = None)]
pub struct Cli {
    /// Server base URL
    #[arg(long, global = true, env = "MAPR_URL", default_value = "https://idr.openmicroscopy.org")]
    pub url: String,

    /// Session key sent as the sessionid cookie; anonymous when omitted
    #[arg(long, global = true, env = "MAPR_SESSION", hide_env_values = true)]
    pub session: Option<String>,

    /// Which tree to browse
    #[arg(long, global = true, value_enum, default_value_t = LayoutArg::Mapr)]
    pub layout: LayoutArg,

    /// Annotation menu for the mapr layout
    #[arg(long, global = true, default_value = "gene")]
    pub menu: String,

    /// JSON menu configuration replacing the stock menus
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and print the tree
    Tree {
        /// Node to select and open, e.g. 42 or screen-42
        #[arg(long)]
        show: Option<String>,
        /// Levels to expand below the first
        #[arg(short, long, default_value_t = 0)]
        depth: usize,
        /// Experimenter to show; all users when omitted
        #[arg(short, long)]
        experimenter: Option<i64>,
    },
    /// Print autocomplete suggestions for a term
    Search {
        term: String,
        #[arg(long)]
        case_sensitive: bool,
    },
    /// Apply an annotation value as the tree filter and print the tree
    Filter {
        value: String,
        #[arg(long)]
        case_sensitive: bool,
        /// Levels to expand below the first
        #[arg(short, long, default_value_t = 0)]
        depth: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    Containers,
    Mapannotations,
    Mapr,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Containers => Layout::Containers,
            LayoutArg::Mapannotations => Layout::MapAnnotations,
            LayoutArg::Mapr => Layout::Mapr,
        }
    }
}
