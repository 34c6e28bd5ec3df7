//! Tracker command line entry point.
//!
//! # Responsibility
//! - Provide a small executable over the configured item store.
//! - Keep output deterministic: one `key=value` line per item.
//!
//! Store and logging are configured through `TRACKER_*` environment variables.

use clap::{Parser, Subcommand};
use log::error;
use std::io::Write;
use std::process::ExitCode;
use tracker_core::{Item, ItemId, ItemStore, StoreConfig, TrackerService};

#[derive(Parser, Debug)]
#[command(name = "tracker", version, about = "Item tracker over the configured store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print core health and version
    Ping,
    /// Add an item
    Add {
        /// Item name
        name: String,
    },
    /// Show one item
    Get {
        /// Item id
        id: ItemId,
    },
    /// List all items in insertion order
    List,
    /// List items whose name contains KEY (case-sensitive)
    Find {
        /// Substring to look for
        key: String,
    },
    /// Rename an item
    Replace {
        /// Item id
        id: ItemId,
        /// New item name
        name: String,
    },
    /// Delete an item; unknown ids are ignored
    Delete {
        /// Item id
        id: ItemId,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_command module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    let mut out = std::io::stdout().lock();
    if command == Command::Ping {
        writeln!(out, "tracker_core ping={}", tracker_core::ping())
            .map_err(|err| err.to_string())?;
        writeln!(out, "tracker_core version={}", tracker_core::core_version())
            .map_err(|err| err.to_string())?;
        return Ok(());
    }

    let config = StoreConfig::from_env().map_err(|err| err.to_string())?;
    config.init_logging().map_err(|err| err.to_string())?;
    let store = config.open_store().map_err(|err| err.to_string())?;
    let tracker = TrackerService::new(store);

    let outcome = execute(&tracker, command, &mut out);
    let closed = tracker.close().map_err(|err| err.to_string());
    outcome.and(closed)
}

fn execute<S: ItemStore>(
    tracker: &TrackerService<S>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), String> {
    let lines = match command {
        Command::Ping => Vec::new(),
        Command::Add { name } => {
            let saved = tracker.add_named(name).map_err(|err| err.to_string())?;
            vec![format_item(&saved)]
        }
        Command::Get { id } => match tracker.find_by_id(id).map_err(|err| err.to_string())? {
            Some(item) => vec![format_item(&item)],
            None => return Err(format!("item {id} not found")),
        },
        Command::List => format_items(tracker.find_all().map_err(|err| err.to_string())?),
        Command::Find { key } => {
            format_items(tracker.find_by_name(&key).map_err(|err| err.to_string())?)
        }
        Command::Replace { id, name } => {
            let request = Item::with_id(id, name).map_err(|err| err.to_string())?;
            if !tracker
                .replace(id, &request)
                .map_err(|err| err.to_string())?
            {
                return Err(format!("item {id} not found"));
            }
            vec![format!("replaced id={id}")]
        }
        Command::Delete { id } => {
            tracker.delete(id).map_err(|err| err.to_string())?;
            vec![format!("deleted id={id}")]
        }
    };

    for line in lines {
        writeln!(out, "{line}").map_err(|err| err.to_string())?;
    }
    Ok(())
}

fn format_items(items: Vec<Item>) -> Vec<String> {
    items.iter().map(format_item).collect()
}

fn format_item(item: &Item) -> String {
    format!(
        "id={} created={} name={:?}",
        item.id.unwrap_or_default(),
        item.created
            .map(|created| created.to_rfc3339())
            .unwrap_or_default(),
        item.name
    )
}

#[cfg(test)]
mod tests {
    use super::{execute, Cli, Command};
    use clap::error::ErrorKind;
    use clap::Parser;
    use tracker_core::{MemoryItemStore, TrackerService};

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("tracker").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    fn run_lines(
        tracker: &TrackerService<MemoryItemStore>,
        command: Command,
    ) -> Result<Vec<String>, String> {
        let mut out = Vec::new();
        execute(tracker, command, &mut out)?;
        Ok(String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect())
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(parse(&["ping"]).unwrap(), Command::Ping);
        assert_eq!(
            parse(&["add", "Beta Task"]).unwrap(),
            Command::Add {
                name: "Beta Task".to_string()
            }
        );
        assert_eq!(parse(&["get", "7"]).unwrap(), Command::Get { id: 7 });
        assert_eq!(parse(&["list"]).unwrap(), Command::List);
        assert_eq!(
            parse(&["find", "ta"]).unwrap(),
            Command::Find {
                key: "ta".to_string()
            }
        );
        assert_eq!(
            parse(&["replace", "3", "New Name"]).unwrap(),
            Command::Replace {
                id: 3,
                name: "New Name".to_string()
            }
        );
        assert_eq!(
            parse(&["delete", "99999"]).unwrap(),
            Command::Delete { id: 99999 }
        );
    }

    #[test]
    fn rejects_missing_and_malformed_arguments() {
        assert_eq!(
            parse(&[]).unwrap_err().kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
        assert_eq!(
            parse(&["get", "abc"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            parse(&["add"]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(
            parse(&["frobnicate"]).unwrap_err().kind(),
            ErrorKind::InvalidSubcommand
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn execute_add_list_and_find_print_items() {
        let tracker = TrackerService::new(MemoryItemStore::new());

        let added = run_lines(
            &tracker,
            Command::Add {
                name: "Beta Task".to_string(),
            },
        )
        .unwrap();
        assert_eq!(added.len(), 1);
        assert!(added[0].starts_with("id=1 created="));
        assert!(added[0].ends_with("name=\"Beta Task\""));

        run_lines(
            &tracker,
            Command::Add {
                name: "Alpha".to_string(),
            },
        )
        .unwrap();

        assert_eq!(run_lines(&tracker, Command::List).unwrap().len(), 2);
        let found = run_lines(
            &tracker,
            Command::Find {
                key: "ta".to_string(),
            },
        )
        .unwrap();
        assert_eq!(found, added);
    }

    #[test]
    fn execute_reports_unknown_ids() {
        let tracker = TrackerService::new(MemoryItemStore::new());

        assert_eq!(
            run_lines(&tracker, Command::Get { id: 99999 }).unwrap_err(),
            "item 99999 not found"
        );
        assert_eq!(
            run_lines(
                &tracker,
                Command::Replace {
                    id: 99999,
                    name: "Should Fail".to_string()
                }
            )
            .unwrap_err(),
            "item 99999 not found"
        );
        assert_eq!(
            run_lines(&tracker, Command::Delete { id: 99999 }).unwrap(),
            ["deleted id=99999"]
        );
    }

    #[test]
    fn execute_replace_renames_existing_item() {
        let tracker = TrackerService::new(MemoryItemStore::new());
        let saved = tracker.add_named("Old Name").unwrap();
        let id = saved.id.unwrap();

        assert_eq!(
            run_lines(
                &tracker,
                Command::Replace {
                    id,
                    name: "New Name".to_string()
                }
            )
            .unwrap(),
            [format!("replaced id={id}")]
        );
        let shown = run_lines(&tracker, Command::Get { id }).unwrap();
        assert!(shown[0].ends_with("name=\"New Name\""));
    }
}
