use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use corral_business::ExportFormat;

#[derive(Parser)]
#[command(name = "corral")]
#[command(about = "Cost ledger client for Corral", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the API base URL (also `CORRAL_API_URL`)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Username or email; prompted when missing
        #[arg(long, short = 'u')]
        identifier: Option<String>,
        /// Read the password from the first line of stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage cost categories
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Manage costs
    #[command(subcommand)]
    Costs(CostCommand),
    /// Monthly totals and category breakdown
    Dashboard {
        /// How many months back from the current one (0-11)
        #[arg(long, short = 'm', default_value_t = 0)]
        months_back: usize,
    },
    /// Cost report over a date range
    Report(ReportArgs),
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Client-side table controls shared by list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Case-insensitive filter over every column
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Sort by column key, `key` or `key:desc`
    #[arg(long)]
    pub sort: Option<String>,

    /// Page to show (1-based)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// List categories
    List(TableArgs),
    /// Show the category hierarchy
    Tree,
    /// Show one category
    Show { id: u64 },
    /// Create a category
    Create(CategoryFields),
    /// Update a category; unset flags keep their current value
    Update {
        id: u64,
        #[command(flatten)]
        fields: CategoryFields,
    },
    /// Delete a category
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CategoryFields {
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Parent category id
    #[arg(long, conflicts_with = "root")]
    pub parent: Option<u64>,
    /// Move the category to the top level
    #[arg(long)]
    pub root: bool,
    /// Whether costs can be booked against the category
    #[arg(long)]
    pub movement: Option<bool>,
}

#[derive(Subcommand)]
pub enum CostCommand {
    /// List one page of costs
    List {
        #[command(flatten)]
        table: TableArgs,
        /// Only costs of this category
        #[arg(long)]
        category: Option<u64>,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Show one cost
    Show { id: u64 },
    /// Record a cost
    Create(CostFields),
    /// Update a cost; unset flags keep their current value
    Update {
        id: u64,
        #[command(flatten)]
        fields: CostFields,
    },
    /// Delete a cost
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CostFields {
    /// Category id (must allow movements)
    #[arg(long)]
    pub category: Option<u64>,
    /// Date incurred (YYYY-MM-DD), defaults to today for new costs
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct ReportArgs {
    /// First day (YYYY-MM-DD), defaults to the start of this month
    #[arg(long, global = true)]
    pub from: Option<NaiveDate>,
    /// Last day (YYYY-MM-DD), defaults to the end of this month
    #[arg(long, global = true)]
    pub to: Option<NaiveDate>,

    #[command(flatten)]
    pub table: TableArgs,

    #[command(subcommand)]
    pub action: Option<ReportAction>,
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Download the report as a file
    Export {
        #[arg(long, short = 'f', value_enum, default_value_t = FileFormat::Pdf)]
        format: FileFormat,
        /// Directory the file is written to
        #[arg(long, short = 'o', default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileFormat {
    Pdf,
    Excel,
}

impl From<FileFormat> for ExportFormat {
    fn from(format: FileFormat) -> Self {
        match format {
            FileFormat::Pdf => Self::Pdf,
            FileFormat::Excel => Self::Excel,
        }
    }
}
