//! gridform - edit and export schema-mutable table documents.
//!
//! Every subcommand loads a JSON table document, applies one core
//! operation through the editor (which writes the document back), and
//! exits. `export` renders the CSV form instead.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gridform_model::ColumnType;

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "gridform", about = "Edit and export schema-mutable table documents")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty table document
    Init {
        /// Path for the new document
        file: PathBuf,
    },
    /// Print the table
    Show { file: PathBuf },
    /// Append a column with a generated label
    AddColumn { file: PathBuf },
    /// Remove the column at INDEX
    RemoveColumn { file: PathBuf, index: usize },
    /// Rename the column at INDEX (empty or unchanged names are ignored)
    RenameColumn {
        file: PathBuf,
        index: usize,
        name: String,
    },
    /// Change the type of the column at INDEX, resetting its cells
    SetType {
        file: PathBuf,
        index: usize,
        #[arg(value_enum)]
        column_type: ColumnTypeArg,
    },
    /// Replace the option list of the column at INDEX from comma-separated text
    SetOptions {
        file: PathBuf,
        index: usize,
        options: String,
    },
    /// Append an empty row
    AddRow { file: PathBuf },
    /// Remove the row at INDEX
    RemoveRow { file: PathBuf, index: usize },
    /// Set one cell (true/false for boolean columns, raw text otherwise)
    SetCell {
        file: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
    /// Attach an image file to a cell as a base64 data URI
    AttachImage {
        file: PathBuf,
        row: usize,
        column: String,
        image: PathBuf,
    },
    /// Clear an image cell
    ClearImage {
        file: PathBuf,
        row: usize,
        column: String,
    },
    /// Export the table to CSV
    Export {
        file: PathBuf,
        /// Output path (defaults to data.csv in the working directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// CLI-facing spelling of the column types.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColumnTypeArg {
    Text,
    Boolean,
    Selection,
    Image,
}

impl From<ColumnTypeArg> for ColumnType {
    fn from(arg: ColumnTypeArg) -> Self {
        match arg {
            ColumnTypeArg::Text => ColumnType::Text,
            ColumnTypeArg::Boolean => ColumnType::Boolean,
            ColumnTypeArg::Selection => ColumnType::Selection,
            ColumnTypeArg::Image => ColumnType::Image,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Init { file } => commands::init(&file),
        Commands::Show { file } => commands::show(&file),
        Commands::AddColumn { file } => commands::add_column(&file),
        Commands::RemoveColumn { file, index } => commands::remove_column(&file, index),
        Commands::RenameColumn { file, index, name } => {
            commands::rename_column(&file, index, &name)
        }
        Commands::SetType {
            file,
            index,
            column_type,
        } => commands::set_type(&file, index, column_type.into()),
        Commands::SetOptions {
            file,
            index,
            options,
        } => commands::set_options(&file, index, &options),
        Commands::AddRow { file } => commands::add_row(&file),
        Commands::RemoveRow { file, index } => commands::remove_row(&file, index),
        Commands::SetCell {
            file,
            row,
            column,
            value,
        } => commands::set_cell(&file, row, &column, &value),
        Commands::AttachImage {
            file,
            row,
            column,
            image,
        } => commands::attach_image(&file, row, &column, &image),
        Commands::ClearImage { file, row, column } => commands::clear_image(&file, row, &column),
        Commands::Export { file, out } => commands::export(&file, out.as_deref()),
    }
}
