use clap::{Args, Parser, Subcommand};

use crate::model::item::{Priority, Recurrence};

#[derive(Parser)]
#[command(name = "tt", about = concat!("thingtrack v", env!("CARGO_PKG_VERSION"), " - things, due dates and repeats in a plain file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub workspace_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new workspace in the current directory
    Init(InitArgs),
    /// Show the agenda for a date window
    List(ListArgs),
    /// Show one stored item
    Show(TargetArgs),
    /// Add an item
    Add(AddArgs),
    /// Mark an item completed
    Done(TargetArgs),
    /// Mark an item not completed
    Undone(TargetArgs),
    /// Change fields of an item
    Edit(EditArgs),
    /// Delete an item
    Rm(TargetArgs),
    /// List items due today or overdue
    Due,
    /// Read or change a config value
    Config(ConfigArgs),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Workspace name (default: directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if things/ already exists (items are kept)
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only items whose name or a tag contains this text
    pub query: Option<String>,
    /// First day of the window (default: today)
    #[arg(long)]
    pub from: Option<String>,
    /// Last day of the window
    #[arg(long, conflicts_with = "days")]
    pub to: Option<String>,
    /// Window length in days (default: view.window_days)
    #[arg(long)]
    pub days: Option<u32>,
}

/// Picks one stored item: by ID, or by its visible fields for items without one
#[derive(Args)]
pub struct TargetArgs {
    /// Item ID (e.g. T-004)
    #[arg(required_unless_present = "key", conflicts_with = "key")]
    pub id: Option<String>,
    /// Match name, start date, start time, due date and end time exactly
    #[arg(long, num_args = 5, value_names = ["NAME", "START_DATE", "START_TIME", "DUE", "END_TIME"])]
    pub key: Vec<String>,
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Item name
    pub name: String,
    /// Tag (repeatable, or comma-separated)
    #[arg(long, short)]
    pub tag: Vec<String>,
    /// Start date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub start_date: Option<String>,
    /// Start time, HH:MM (default: now)
    #[arg(long)]
    pub start_time: Option<String>,
    /// Due date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub due: Option<String>,
    /// End time, HH:MM (default: start time + defaults.duration_minutes)
    #[arg(long)]
    pub end_time: Option<String>,
    /// low, medium or high (default: defaults.priority)
    #[arg(long, short)]
    pub priority: Option<Priority>,
    /// none, daily, weekly, fortnightly, monthly or yearly
    #[arg(long, short, default_value = "none")]
    pub repeat: Recurrence,
    /// Add as already completed
    #[arg(long)]
    pub done: bool,
    /// Extra attribute KEY=VALUE (repeatable)
    #[arg(long, short)]
    pub field: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// Replace tags (repeatable, or comma-separated)
    #[arg(long)]
    pub tag: Vec<String>,
    /// Remove all tags
    #[arg(long, conflicts_with = "tag")]
    pub clear_tags: bool,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub start_time: Option<String>,
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long)]
    pub end_time: Option<String>,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub repeat: Option<Recurrence>,
    /// Set attribute KEY=VALUE (repeatable)
    #[arg(long)]
    pub field: Vec<String>,
    /// Remove attribute KEY (repeatable)
    #[arg(long)]
    pub unset_field: Vec<String>,
}

// ---------------------------------------------------------------------------
// Config / recovery
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key, e.g. view.window_days
    pub key: String,
    /// New value (omit to print the current one)
    pub value: Option<String>,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum entries to show
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove entries older than 30 days
    Prune(PruneArgs),
    /// Print the recovery log path
    Path,
}

#[derive(Args)]
pub struct PruneArgs {
    /// Remove every entry
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_flags() {
        let cli = Cli::parse_from([
            "tt", "add", "Gym", "--tag", "health", "-p", "high", "--repeat", "Weekly", "-f",
            "coach=Sam",
        ]);
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.name, "Gym");
                assert_eq!(args.tag, vec!["health"]);
                assert_eq!(args.priority, Some(Priority::High));
                assert_eq!(args.repeat, Recurrence::Weekly);
                assert_eq!(args.field, vec!["coach=Sam"]);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn target_by_key() {
        let cli = Cli::parse_from([
            "tt", "done", "--key", "Gym", "2024-01-01", "09:00", "2024-01-01", "10:00",
        ]);
        match cli.command {
            Some(Commands::Done(t)) => {
                assert_eq!(t.id, None);
                assert_eq!(t.key.len(), 5);
            }
            _ => panic!("expected done"),
        }
    }

    #[test]
    fn target_is_required() {
        assert!(Cli::try_parse_from(["tt", "rm"]).is_err());
        assert!(Cli::try_parse_from(["tt", "rm", "T-001", "--key", "a", "b", "c", "d", "e"]).is_err());
    }
}
