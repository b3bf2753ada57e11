//! sheetdiff CLI
//!
//! Command-line tool for comparing spreadsheet files cell by cell.

use clap::{Parser, Subcommand};
use sheetdiff_core::{
    diff, finalize_mapping, load_table, reconcile, save_report, MappingFile, Reconciliation,
    ReportFormat, SessionStore, Table,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetdiff")]
#[command(about = "Spreadsheet comparison tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two spreadsheet files and report cell differences
    Compare {
        /// Left (reference) file
        #[arg(short, long)]
        left: PathBuf,

        /// Right (candidate) file
        #[arg(short, long)]
        right: PathBuf,

        /// Column mapping pair, as 'left_column=right_column' (repeatable)
        #[arg(short, long)]
        map: Vec<String>,

        /// Path to a mapping file (JSON)
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// Show only rows with differences
        #[arg(long)]
        only_differences: bool,

        /// Maximum number of rows to display
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Write the full report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format (csv, xlsx or json); inferred from the output
        /// extension when omitted
        #[arg(long)]
        format: Option<String>,
    },

    /// Show both files' headers and whether they match
    Headers {
        /// Left (reference) file
        #[arg(short, long)]
        left: PathBuf,

        /// Right (candidate) file
        #[arg(short, long)]
        right: PathBuf,
    },

    /// Parse and display a single spreadsheet file
    Inspect {
        /// Path to the file
        #[arg(short, long)]
        file: PathBuf,

        /// Maximum number of rows to display
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Create a mapping file template
    CreateMapping {
        /// Output path for the mapping file
        #[arg(short, long)]
        output: PathBuf,

        /// Mapping pair to include, as 'left_column=right_column' (repeatable)
        #[arg(short, long)]
        map: Vec<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> sheetdiff_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            left,
            right,
            map,
            mapping,
            only_differences,
            limit,
            output,
            format,
        } => cmd_compare(&left, &right, &map, mapping, only_differences, limit, output, format),
        Commands::Headers { left, right } => cmd_headers(&left, &right),
        Commands::Inspect { file, limit } => cmd_inspect(&file, limit),
        Commands::CreateMapping { output, map } => cmd_create_mapping(&output, &map),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_compare(
    left_path: &PathBuf,
    right_path: &PathBuf,
    map_pairs: &[String],
    mapping_path: Option<PathBuf>,
    only_differences: bool,
    limit: usize,
    output: Option<PathBuf>,
    format: Option<String>,
) -> sheetdiff_core::Result<()> {
    let left = load_table(left_path)?;
    let right = load_table(right_path)?;

    let report = match reconcile(&left, &right) {
        Reconciliation::Auto { compare_columns } => {
            println!(
                "Headers match: comparing {} columns automatically",
                compare_columns.len()
            );
            diff(&left, &right, &compare_columns)?
        }
        Reconciliation::Manual => {
            // Collect mapping pairs from the file first, then the flags
            let mut sessions = SessionStore::new();
            let session = sessions.create();
            if let Some(draft) = sessions.draft_mut(session) {
                if let Some(path) = &mapping_path {
                    let file = MappingFile::load(path)?;
                    for pair in &file.pairs {
                        draft.add_entry(pair.source.clone(), pair.target.clone());
                    }
                }
                for pair in map_pairs {
                    let (source, target) = parse_map_pair(pair);
                    draft.add_entry(source, target);
                }
            }
            let draft = sessions.end(session).unwrap_or_default();

            if draft.is_empty() {
                eprintln!("Headers differ: a column mapping is required.");
                eprintln!();
                eprintln!(
                    "Left  ({}): {}",
                    left.source_path.display(),
                    left.header_names().join(", ")
                );
                eprintln!(
                    "Right ({}): {}",
                    right.source_path.display(),
                    right.header_names().join(", ")
                );
                eprintln!();
                eprintln!("Provide pairs with --map left_column=right_column,");
                eprintln!("or a mapping file with --mapping <file>.");
                std::process::exit(1);
            }

            let finalized = finalize_mapping(&left, &right, &draft)?;
            println!(
                "Headers differ: comparing {} mapped columns",
                finalized.compare_columns.len()
            );
            diff(&left, &finalized.projected, &finalized.compare_columns)?
        }
    };

    println!(
        "Compared {} rows across {} columns: {} rows differ ({} cells)",
        report.summary.rows_compared,
        report.compare_columns.len(),
        report.summary.rows_with_differences,
        report.summary.cells_with_differences
    );
    println!();

    if only_differences {
        print_table(&report.differing_rows(), limit);
    } else {
        print_table(&report.table, limit);
    }

    if let Some(out_path) = output {
        let report_format = match format {
            Some(name) => parse_report_format(&name),
            None => ReportFormat::from_path(&out_path)?,
        };
        save_report(&report, &out_path, report_format)?;
        println!();
        println!("Report written to {}", out_path.display());
    }

    Ok(())
}

fn cmd_headers(left_path: &PathBuf, right_path: &PathBuf) -> sheetdiff_core::Result<()> {
    let left = load_table(left_path)?;
    let right = load_table(right_path)?;

    print_headers(&left, &right);
    println!();

    match reconcile(&left, &right) {
        Reconciliation::Auto { compare_columns } => {
            println!("Headers match ({} columns).", compare_columns.len());
        }
        Reconciliation::Manual => {
            println!("Headers differ: a column mapping is required to compare these files.");
        }
    }

    Ok(())
}

fn cmd_inspect(file: &PathBuf, limit: usize) -> sheetdiff_core::Result<()> {
    let table = load_table(file)?;

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    print_table(&table, limit);

    Ok(())
}

fn cmd_create_mapping(output: &PathBuf, map_pairs: &[String]) -> sheetdiff_core::Result<()> {
    let mut file = MappingFile::new();

    for pair in map_pairs {
        match pair.split_once('=') {
            Some((source, target)) if !source.is_empty() && !target.is_empty() => {
                file.add_pair(source, target);
            }
            _ => {
                eprintln!(
                    "Warning: Invalid mapping '{}', expected 'left_column=right_column'",
                    pair
                );
            }
        }
    }

    // If no pairs provided, add a placeholder
    if file.pairs.is_empty() {
        file.add_pair("left_column", "right_column");
    }

    file.save(output)?;
    println!("Created mapping file: {}", output.display());
    println!("Pairs: {}", file.pairs.len());
    println!();
    println!("Edit the file to match your columns, then run:");
    println!(
        "  sheetdiff compare --left <left> --right <right> --mapping {}",
        output.display()
    );

    Ok(())
}

fn print_headers(left: &Table, right: &Table) {
    println!(
        "Left  ({}): {}",
        left.source_path.display(),
        left.header_names().join(", ")
    );
    println!(
        "Right ({}): {}",
        right.source_path.display(),
        right.header_names().join(", ")
    );
}

fn print_table(table: &Table, limit: usize) {
    let header = table.header_names();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    for row in table.rows.iter().take(limit) {
        let values: Vec<String> = row.cells.iter().map(|c| c.to_string_value()).collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }
}

fn parse_map_pair(pair: &str) -> (String, String) {
    match pair.split_once('=') {
        Some((source, target)) if !source.is_empty() && !target.is_empty() => {
            (source.to_string(), target.to_string())
        }
        _ => {
            eprintln!(
                "Invalid mapping '{}', expected 'left_column=right_column'",
                pair
            );
            std::process::exit(1);
        }
    }
}

fn parse_report_format(name: &str) -> ReportFormat {
    match name.to_lowercase().as_str() {
        "csv" => ReportFormat::Csv,
        "xlsx" => ReportFormat::Xlsx,
        "json" => ReportFormat::Json,
        _ => {
            eprintln!("Unknown format: {}. Supported formats: csv, xlsx, json", name);
            std::process::exit(1);
        }
    }
}
