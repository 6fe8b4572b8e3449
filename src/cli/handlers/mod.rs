mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::lock::TableLock;
use crate::io::table_io::{self, TableError};
use crate::model::table::Table;
use crate::ops::check::{self, CheckError, CheckWarning};
use crate::ops::classify::MoveError;
use crate::ops::grouping::partition;
use crate::ops::order_key::renormalize;
use crate::ops::reorder::try_reorder;
use crate::ops::span::recompute_spans;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let dir = working_dir(cli.project_dir.as_deref())?;

    match cli.command {
        Commands::Init(args) => cmd_init(args, &dir),
        Commands::Show => cmd_show(&dir, json),
        Commands::Groups => cmd_groups(&dir, json),
        Commands::Mv(args) => cmd_mv(&dir, args, json),
        Commands::Normalize => cmd_normalize(&dir, json),
        Commands::Check => cmd_check(&dir, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The -C directory if given, else the current directory
fn working_dir(project_dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match project_dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn load_table_from(dir: &Path) -> Result<Table, TableError> {
    let root = table_io::discover_table(dir)?;
    table_io::load_table(&root)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let table = load_table_from(dir)?;
    let rows = recompute_spans(table.rows());

    if json {
        let out = TableJson {
            name: &table.doc.table.name,
            rows: &rows,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", table.doc.table.name);
        println!();
        print!("{}", render_table(&rows, &table.display_columns()));
    }
    Ok(())
}

fn cmd_groups(dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let table = load_table_from(dir)?;
    let groups = partition(table.rows());

    if json {
        let out: Vec<GroupJson> = groups.iter().map(group_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for group in &groups {
            println!("{}", format_group_line(group));
        }
    }
    Ok(())
}

fn cmd_check(dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let table = load_table_from(dir)?;
    let result = check::check_rows(table.rows(), &table.doc.order);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                match err {
                    CheckError::DuplicateKey { order, row_ids } => {
                        println!("  order {} is shared by: {}", order, row_ids.join(", "));
                    }
                    CheckError::NonFiniteKey { row_id } => {
                        println!("  {} has a non-finite order key", row_id);
                    }
                    CheckError::DuplicateRowId { row_id } => {
                        println!("  row id {} is used more than once", row_id);
                    }
                    CheckError::InterleavedGroup { group, split_by } => {
                        println!("  group {} is split by rows of {}", group, split_by);
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    CheckWarning::TightGap { before, after, gap } => {
                        println!(
                            "  {} and {} are only {:e} apart (run `gt normalize`)",
                            before, after, gap
                        );
                    }
                    CheckWarning::StaleSpan {
                        row_id,
                        expected,
                        found,
                    } => {
                        println!(
                            "  {} has span {} but should have {}",
                            row_id,
                            span_str(*found),
                            span_str(*expected)
                        );
                    }
                    CheckWarning::EmptyGroup { row_id } => {
                        println!("  {} has an empty group", row_id);
                    }
                }
            }
        }
        if result.errors.is_empty() && result.warnings.is_empty() {
            println!("ok: {} rows", table.rows().len());
        }
    }

    if result.valid {
        Ok(())
    } else {
        Err(format!("{} error(s) found", result.errors.len()).into())
    }
}

fn span_str(span: Option<usize>) -> String {
    span.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_mv(dir: &Path, args: MvArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let root = table_io::discover_table(dir)?;
    let _lock = TableLock::acquire_default(&root)?;
    let mut table = table_io::load_table(&root)?;

    let active = args.active();
    let over = args.over();
    let before = table.rows().to_vec();

    let (moved, reason) = match try_reorder(&before, &active, &over) {
        Ok(rows) => {
            let moved = moved_rows(&before, &rows);
            table_io::save_rows(&mut table, rows)?;
            (moved, None)
        }
        Err(e @ MoveError::NoOp(_)) => (Vec::new(), Some(e.to_string())),
        Err(e @ MoveError::PrecisionExhausted { .. }) => {
            return Err(format!("{} (run `gt normalize`)", e).into());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        let out = MoveJson {
            active,
            over,
            changed: !moved.is_empty(),
            reason,
            moved,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if let Some(reason) = reason {
        println!("{}", reason);
    } else {
        for m in &moved {
            println!("{}", format_moved_line(m));
        }
    }
    Ok(())
}

fn cmd_normalize(dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let root = table_io::discover_table(dir)?;
    let _lock = TableLock::acquire_default(&root)?;
    let mut table = table_io::load_table(&root)?;

    let step = table.doc.order.normalize_step;
    if !(step.is_finite() && step > 0.0) {
        return Err(format!("order.normalize_step must be a positive number, got {}", step).into());
    }
    let rows = renormalize(table.rows(), step);
    let count = rows.len();
    table_io::save_rows(&mut table, rows)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&NormalizeJson { rows: count, step })?);
    } else {
        println!("renumbered {} rows", count);
    }
    Ok(())
}
