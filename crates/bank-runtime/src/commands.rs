//! # Console Commands
//!
//! Token dispatch onto the engine's exposed operations. Each command maps
//! to exactly one engine method; the reply is the user-facing text the
//! console prints. Unknown tokens change nothing and say so.

use shared_types::{IdentityKey, OwnerChoice};
use wb_01_session::SessionEngine;

/// Usage text for the `help` command.
const HELP: &str = "\
commands:
  scan-shared              scan the shared bank now
  scan-personal            scan this character's bank now
  force-scan               scan every reachable store (diagnostics)
  clear-caches             wipe all cached store data
  cache-stats              snapshot sizes and cache counters
  using-other              whether a competitor owns the bank UI
  favorite <Name-Realm>    toggle a character's favorite marker
  conflicts                competitor detection and choices
  resolve <ext> ours|theirs  answer the open conflict prompt
  reset-choices            forget all conflict choices and re-ask
  recovery                 reset transient state, keep saved data
  faults                   recent handler faults
  search <text>            find items by name across all owners
  tooltip <item-id>        who owns an item, and how many";

/// Executes one console line against the engine and returns the reply.
pub fn dispatch(engine: &mut SessionEngine, line: &str) -> String {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&command) = tokens.first() else {
        return String::new();
    };

    match command {
        "scan-shared" => match engine.scan_shared_store() {
            Ok(true) => "Shared bank scanned.".to_owned(),
            Ok(false) => "Shared bank is not available right now; nothing scanned.".to_owned(),
            Err(err) => format!("Scan failed: {err}"),
        },
        "scan-personal" => match engine.scan_personal_store() {
            Ok(true) => "Personal bank scanned.".to_owned(),
            Ok(false) => "No bank session open; nothing scanned.".to_owned(),
            Err(err) => format!("Scan failed: {err}"),
        },
        "force-scan" => match engine.force_scan() {
            Ok(stores) if stores.is_empty() => {
                "No store reachable; nothing scanned.".to_owned()
            }
            Ok(stores) => {
                let names: Vec<String> = stores.iter().map(ToString::to_string).collect();
                format!("Scanned stores: {}.", names.join(", "))
            }
            Err(err) => format!("Scan failed: {err}"),
        },
        "clear-caches" => match engine.clear_all_caches() {
            Ok(()) => "All cached store data cleared.".to_owned(),
            Err(err) => format!("Clear failed: {err}"),
        },
        "cache-stats" => match serde_json::to_string_pretty(&engine.cache_stats()) {
            Ok(json) => json,
            Err(err) => format!("Could not render stats: {err}"),
        },
        "using-other" => {
            if engine.is_using_other_owner() {
                "Yes; a competitor extension owns the bank UI.".to_owned()
            } else {
                "No; this engine owns the bank UI.".to_owned()
            }
        }
        "favorite" => favorite(engine, &tokens[1..]),
        "conflicts" => conflicts(engine),
        "resolve" => resolve(engine, &tokens[1..]),
        "reset-choices" => match engine.reset_all_conflict_choices() {
            Ok(()) => "All conflict choices forgotten; open questions will be asked again."
                .to_owned(),
            Err(err) => format!("Reset failed: {err}"),
        },
        "recovery" => {
            engine.emergency_recovery();
            "Session state reset. Saved data is untouched.".to_owned()
        }
        "faults" => faults(engine),
        "search" => search(engine, &tokens[1..]),
        "tooltip" => tooltip(engine, &tokens[1..]),
        "help" => HELP.to_owned(),
        unknown => format!("Unknown command: {unknown}. Try 'help'."),
    }
}

fn favorite(engine: &mut SessionEngine, args: &[&str]) -> String {
    let Some(&raw) = args.first() else {
        return "Usage: favorite <Name-Realm>".to_owned();
    };
    let key = match IdentityKey::parse(raw) {
        Ok(key) => key,
        Err(err) => return format!("Bad character key: {err}"),
    };
    match engine.toggle_favorite(&key) {
        Some(true) => format!("{key} is now a favorite."),
        Some(false) => format!("{key} is no longer a favorite."),
        None => format!("No record of {key}; favorites only apply to seen characters."),
    }
}

fn conflicts(engine: &SessionEngine) -> String {
    let mut lines = Vec::new();
    for status in engine.conflict_status() {
        let choice = match status.choice {
            Some(OwnerChoice::UseHost) => "ours",
            Some(OwnerChoice::UseOther) => "theirs",
            None => "unresolved",
        };
        let mut line = format!(
            "{}: active={} choice={choice}",
            status.extension, status.detected
        );
        if status.prompting {
            line.push_str(" [awaiting answer]");
        } else if status.queued {
            line.push_str(" [queued]");
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn resolve(engine: &mut SessionEngine, args: &[&str]) -> String {
    let (Some(&extension), Some(&side)) = (args.first(), args.get(1)) else {
        return "Usage: resolve <extension> ours|theirs".to_owned();
    };
    let choice = match side {
        "ours" => OwnerChoice::UseHost,
        "theirs" => OwnerChoice::UseOther,
        other => return format!("Unknown side '{other}'; say 'ours' or 'theirs'."),
    };
    match engine.resolve_conflict(extension, choice) {
        Ok(()) => format!("Recorded: {extension} -> {side}."),
        Err(err) => format!("Could not resolve: {err}"),
    }
}

fn faults(engine: &SessionEngine) -> String {
    let faults = engine.recent_faults();
    if faults.is_empty() {
        return "No faults recorded.".to_owned();
    }
    faults
        .iter()
        .map(|fault| format!("{} {}: {}", fault.at_ms, fault.context, fault.detail))
        .collect::<Vec<_>>()
        .join("\n")
}

fn search(engine: &mut SessionEngine, args: &[&str]) -> String {
    if args.is_empty() {
        return "Usage: search <text>".to_owned();
    }
    let needle = args.join(" ");
    let hits = engine.search_items(&needle);
    if hits.is_empty() {
        return format!("No items matching '{needle}'.");
    }
    hits.iter()
        .map(|hit| format!("{} x{} ({})", hit.name, hit.count, hit.owner))
        .collect::<Vec<_>>()
        .join("\n")
}

fn tooltip(engine: &mut SessionEngine, args: &[&str]) -> String {
    let Some(&raw) = args.first() else {
        return "Usage: tooltip <item-id>".to_owned();
    };
    let Ok(item_id) = raw.parse::<u64>() else {
        return format!("'{raw}' is not an item id.");
    };
    let lines = engine.tooltip_lines(item_id);
    if lines.is_empty() {
        return format!("Nobody owns item {item_id}.");
    }
    lines
        .iter()
        .map(|line| format!("{}: {}", line.owner, line.count))
        .collect::<Vec<_>>()
        .join("\n")
}
