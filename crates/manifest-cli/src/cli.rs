//! CLI definition using clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use manifest_types::{ColumnType, OutputFormat, Shift};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleet-manifest")]
#[command(version)]
#[command(about = "Per-shift fleet manifests with a configurable column schema")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Store directory override
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the column schema
    Column {
        #[command(subcommand)]
        action: ColumnAction,
    },

    /// Manage fleet vehicles
    Vehicle {
        #[command(subcommand)]
        action: VehicleAction,
    },

    /// Manage drivers
    Driver {
        #[command(subcommand)]
        action: NameAction,
    },

    /// Manage destinations
    Destination {
        #[command(subcommand)]
        action: NameAction,
    },

    /// Manage the status taxonomy
    Status {
        #[command(subcommand)]
        action: StatusAction,
    },

    /// View or save a shift
    Shift {
        #[command(subcommand)]
        action: ShiftAction,
    },

    /// Show the latest record per vehicle across today's shifts
    Summary,

    /// Browse archived days
    Archives {
        #[command(subcommand)]
        action: ArchiveAction,
    },

    /// Export to an Excel workbook
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set log level used when RUST_LOG is unset
        #[arg(long)]
        set_log_level: Option<String>,

        /// Set the label shown for an empty status
        #[arg(long)]
        set_placeholder: Option<String>,

        /// Enable/disable background saving
        #[arg(long)]
        set_background_save: Option<bool>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Reset all data, archives included
    Reset,
}

#[derive(Subcommand)]
pub enum ColumnAction {
    /// List columns in order
    List,

    /// Add a column
    Add {
        /// Display label
        label: String,

        /// text, number, date, time, status, driver, destination
        #[arg(long = "type", short = 't', default_value = "text")]
        column_type: ColumnType,
    },

    /// Rename a column (its id is kept)
    Rename { index: usize, label: String },

    /// Move a column one position
    Move {
        index: usize,
        direction: Direction,
    },

    /// Delete a column and its values in every shift
    Delete { index: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Subcommand)]
pub enum VehicleAction {
    /// List vehicles
    List,

    /// Add a vehicle by plate
    Add { plate: String },

    /// Delete a vehicle
    Delete { plate: String },

    /// Assign a driver (omit to unassign)
    AssignDriver {
        plate: String,
        driver: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum NameAction {
    /// List names
    List,

    /// Add a name
    Add { name: String },

    /// Delete a name
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum StatusAction {
    /// Show the taxonomy tree
    List,

    /// Add a main status, or a sub/sub-sub status under it
    Add {
        main: String,
        sub: Option<String>,
        sub_sub: Option<String>,
    },

    /// Delete a status and everything beneath it
    Delete {
        main: String,
        sub: Option<String>,
        sub_sub: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ShiftAction {
    /// Show the merged view of a shift
    Show { shift: Shift },

    /// Edit rows of a shift and save it
    Save {
        shift: Shift,

        /// PLATE:COLUMN=VALUE (column id or label)
        #[arg(long = "set", value_name = "PLATE:COLUMN=VALUE")]
        set: Vec<String>,

        /// PLATE=Main|Sub|SubSub
        #[arg(long = "status", value_name = "PLATE=PATH")]
        status: Vec<String>,

        /// Blank a row's status
        #[arg(long = "clear-status", value_name = "PLATE")]
        clear_status: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ArchiveAction {
    /// List archived days, newest first
    List,

    /// Show one archived day
    Show { date: NaiveDate },
}

#[derive(Subcommand)]
pub enum ExportTarget {
    /// Export today's summary
    Summary {
        /// Output Excel file path
        #[arg(long, short = 'o', default_value = "summary.xlsx")]
        output: PathBuf,
    },

    /// Export archived days (all when no date is given)
    Archives {
        dates: Vec<NaiveDate>,

        /// Output Excel file path
        #[arg(long, short = 'o', default_value = "archives.xlsx")]
        output: PathBuf,
    },
}
