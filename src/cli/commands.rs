use clap::{Args, Parser, Subcommand};

use crate::model::item::ItemId;

#[derive(Parser)]
#[command(name = "gt", about = concat!("grouptable v", env!("CARGO_PKG_VERSION"), " - grouped tables you can reorder"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a table in a different directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,

    /// Log debug output to stderr (overridden by GT_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a starter table.toml in the current directory
    Init(InitArgs),
    /// Show the table with group cells merged
    Show,
    /// List groups with their size and key range
    Groups,
    /// Drop a row or group onto another row or group
    Mv(MvArgs),
    /// Rewrite all order keys to an even sequence
    Normalize,
    /// Validate order keys, grouping and spans
    Check,
}

#[derive(Args)]
pub struct InitArgs {
    /// Table name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Overwrite an existing table.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct MvArgs {
    /// Row to move (a group ID with --group)
    pub id: String,
    /// Row to drop onto (a group ID with --over-group)
    pub over: String,
    /// Move the whole group named by ID
    #[arg(long)]
    pub group: bool,
    /// Drop onto the whole group named by OVER
    #[arg(long)]
    pub over_group: bool,
}

impl MvArgs {
    pub fn active(&self) -> ItemId {
        item(&self.id, self.group)
    }

    pub fn over(&self) -> ItemId {
        item(&self.over, self.over_group)
    }
}

fn item(id: &str, is_group: bool) -> ItemId {
    if is_group {
        ItemId::group(id)
    } else {
        ItemId::row(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mv_args_to_items() {
        let cli = Cli::try_parse_from(["gt", "mv", "dairy", "r1", "--group"]).unwrap();
        let Commands::Mv(args) = cli.command else {
            panic!("expected mv");
        };
        assert_eq!(args.active(), ItemId::group("dairy"));
        assert_eq!(args.over(), ItemId::row("r1"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gt", "show", "--json", "-C", "/tmp/x"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.project_dir.as_deref(), Some("/tmp/x"));
    }
}
