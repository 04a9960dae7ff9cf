mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::recovery;
use crate::io::store::{self, Store, StoreError};
use crate::model::workspace::Workspace;
use crate::ops::agenda::{Window, build_agenda};
use crate::ops::identity::{ItemKey, Target};
use crate::ops::item_ops::{self, ItemEdit, NewItem};
use crate::ops::reminders;
use crate::ops::repository::Repository;

type HandlerResult = Result<(), Box<dyn std::error::Error>>;

const NO_MATCH: &str = "no matching item";

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> HandlerResult {
    let json = cli.json;
    let start = start_dir(cli.workspace_dir.as_deref())?;

    match cli.command {
        // No subcommand: interactive agenda
        None => crate::tui::run(&start),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, &start),

            // Read commands
            Commands::List(args) => cmd_list(args, &start, json),
            Commands::Show(args) => cmd_show(args, &start, json),
            Commands::Due => cmd_due(&start, json),

            // Write commands
            Commands::Add(args) => cmd_add(args, &start, json),
            Commands::Done(args) => cmd_set_completed(args, true, &start, json),
            Commands::Undone(args) => cmd_set_completed(args, false, &start, json),
            Commands::Edit(args) => cmd_edit(args, &start, json),
            Commands::Rm(args) => cmd_rm(args, &start, json),

            // Maintenance
            Commands::Config(args) => cmd_config(args, &start, json),
            Commands::Recovery(args) => cmd_recovery(args, &start, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directory workspace discovery starts from: `-C DIR` or the current directory
pub fn start_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn open_workspace(start: &Path) -> Result<(Workspace, Repository), StoreError> {
    let root = store::discover_workspace(start)?;
    let workspace = store::load_workspace(&root)?;
    let repo = Repository::open(Store::new(&workspace.things_dir), &workspace.config.ids.prefix)?;
    Ok((workspace, repo))
}

/// Locate `things/` without parsing config.toml, so a broken config can still be fixed
fn things_dir(start: &Path) -> Result<PathBuf, StoreError> {
    Ok(store::discover_workspace(start)?.join("things"))
}

fn target_of(args: &TargetArgs) -> Result<Target, Box<dyn std::error::Error>> {
    if let Some(id) = &args.id {
        return Ok(Target::Id(id.clone()));
    }
    match args.key.as_slice() {
        [name, start_date, start_time, due_date, end_time] => Ok(Target::Key(ItemKey {
            name: name.clone(),
            start_date: start_date.clone(),
            start_time: start_time.clone(),
            due_date: due_date.clone(),
            end_time: end_time.clone(),
        })),
        _ => Err("expected an item ID or --key NAME START_DATE START_TIME DUE END_TIME".into()),
    }
}

fn target_label(target: &Target) -> &str {
    match target {
        Target::Id(id) => id,
        Target::Key(key) => &key.name,
    }
}

fn split_tags(raw: &[String]) -> Vec<String> {
    raw.iter().flat_map(|t| item_ops::parse_tags(t)).collect()
}

fn parse_fields(raw: &[String]) -> Result<Vec<(String, String)>, item_ops::ItemError> {
    raw.iter().map(|f| item_ops::parse_field(f)).collect()
}

/// Print the outcome of a mutation. A miss is not an error.
fn report_mutation(matched: bool, id: Option<String>, verb: &str, label: &str, json: bool) -> HandlerResult {
    if json {
        println!("{}", serde_json::to_string_pretty(&MutationJson { matched, id })?);
    } else if matched {
        println!("{} {}", verb, label);
    } else {
        println!("{}", NO_MATCH);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, start: &Path, json: bool) -> HandlerResult {
    let (workspace, repo) = open_workspace(start)?;
    let today = item_ops::today();

    let from = match args.from.as_deref() {
        Some(s) => item_ops::check_date(s)?,
        None => today,
    };
    let window = match args.to.as_deref() {
        Some(s) => Window {
            from,
            to: item_ops::check_date(s)?,
        },
        None => Window::starting(from, args.days.unwrap_or(workspace.config.view.window_days)),
    };
    if window.to < window.from {
        return Err(format!("--to {} is before --from {}", window.to, window.from).into());
    }

    let query = args.query.unwrap_or_default();
    let rows = build_agenda(repo.list(), &query, window, today);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&agenda_to_json(&rows, window, &query))?
        );
    } else if rows.is_empty() {
        println!("no items between {} and {}", window.from, window.to);
    } else {
        for line in format_agenda_table(&rows) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(args: TargetArgs, start: &Path, json: bool) -> HandlerResult {
    let (_, repo) = open_workspace(start)?;
    let target = target_of(&args)?;
    let Some(item) = repo.get(&target) else {
        println!("{}", NO_MATCH);
        return Ok(());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        for line in format_item_detail(item) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_due(start: &Path, json: bool) -> HandlerResult {
    let (_, repo) = open_workspace(start)?;
    let due = reminders::due_items(repo.list(), item_ops::today());
    let (title, body) = reminders::reminder_message(&due);
    if json {
        println!("{}", serde_json::to_string_pretty(&DueJson { title, items: due })?);
    } else {
        println!("{}", title);
        println!("{}", body);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, start: &Path, json: bool) -> HandlerResult {
    let (workspace, mut repo) = open_workspace(start)?;

    let new_item = NewItem {
        name: args.name,
        tags: split_tags(&args.tag),
        start_date: args.start_date,
        start_time: args.start_time,
        due_date: args.due,
        end_time: args.end_time,
        priority: args.priority,
        recurrence: args.repeat,
        completed: args.done,
        fields: parse_fields(&args.field)?,
    };
    let item = new_item.build(Local::now().naive_local(), &workspace.config.defaults)?;
    let id = repo.add(item)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&MutationJson {
                matched: true,
                id: Some(id),
            })?
        );
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_set_completed(args: TargetArgs, completed: bool, start: &Path, json: bool) -> HandlerResult {
    let (_, mut repo) = open_workspace(start)?;
    let target = target_of(&args)?;
    let id = repo.get(&target).and_then(|item| item.id.clone());
    let matched = repo.set_completed(&target, completed)?;
    let verb = if completed { "done:" } else { "undone:" };
    report_mutation(matched, id, verb, target_label(&target), json)
}

fn cmd_edit(args: EditArgs, start: &Path, json: bool) -> HandlerResult {
    let (_, mut repo) = open_workspace(start)?;
    let target = target_of(&args.target)?;

    let tags = if args.clear_tags {
        Some(Vec::new())
    } else if !args.tag.is_empty() {
        Some(split_tags(&args.tag))
    } else {
        None
    };
    let edit = ItemEdit {
        name: args.name,
        tags,
        start_date: args.start_date,
        start_time: args.start_time,
        due_date: args.due,
        end_time: args.end_time,
        priority: args.priority,
        recurrence: args.repeat,
        set_fields: parse_fields(&args.field)?,
        unset_fields: args.unset_field,
    };
    if edit.is_empty() {
        return Err("nothing to change (see `tt edit --help`)".into());
    }
    edit.validate()?;

    let id = repo.get(&target).and_then(|item| item.id.clone());
    let matched = repo.update(&target, |item| edit.apply(item))?;
    report_mutation(matched, id, "updated:", target_label(&target), json)
}

fn cmd_rm(args: TargetArgs, start: &Path, json: bool) -> HandlerResult {
    let (_, mut repo) = open_workspace(start)?;
    let target = target_of(&args)?;
    let removed = repo.remove(&target)?;
    let matched = removed.is_some();
    let id = removed.and_then(|item| item.id);
    report_mutation(matched, id, "removed:", target_label(&target), json)
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigArgs, start: &Path, json: bool) -> HandlerResult {
    let things_dir = things_dir(start)?;
    let mut doc = config_io::read_config_doc(&things_dir)?;

    match args.value {
        Some(value) => {
            config_io::set_value(&mut doc, &args.key, &value)?;
            config_io::write_config_doc(&things_dir, &doc)?;
            if json {
                println!("{}", serde_json::json!({ "key": args.key, "value": value }));
            } else {
                println!("{} = {}", args.key, value);
            }
        }
        None => {
            let value = config_io::get_value(&doc, &args.key)?
                .ok_or_else(|| format!("{} is not set", args.key))?;
            if json {
                println!("{}", serde_json::json!({ "key": args.key, "value": value }));
            } else {
                println!("{}", value);
            }
        }
    }
    Ok(())
}

fn cmd_recovery(args: RecoveryCmd, start: &Path, json: bool) -> HandlerResult {
    let things_dir = things_dir(start)?;

    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(&things_dir).display());
        }
        Some(RecoveryAction::Prune(prune)) => {
            let removed = recovery::prune_recovery(&things_dir, prune.all)?;
            println!("pruned {} recovery entries", removed);
        }
        None => {
            let entries = recovery::read_recovery_entries(&things_dir, args.limit);
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("recovery log is empty");
            } else {
                for entry in &entries {
                    print!("{}", entry.to_markdown());
                }
            }
        }
    }
    Ok(())
}
