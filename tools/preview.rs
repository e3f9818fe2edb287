/// Preview — interactive shell for exercising a variant catalog.
///
/// Usage: preview --catalog <path> [--account <id>] [--preset <id>]
///                [--level <tag>] [--day <YYYY-MM-DD>]
///
/// Commands:
///   pick                 — run one selection and show the outcome
///   decorate <text>      — decorate a payload whose field holds <text>
///   level <tag>          — set the active level
///   day <YYYY-MM-DD>     — set the day bucket
///   context <acct> <preset> — switch account/preset pair
///   history              — show the remembered picks for the pair
///   bulk <n>             — run n selections and print the distribution
///   reset                — clear the in-memory store
///   help                 — list commands
///   quit                 — exit

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

use variant_engine::core::pipeline::Decorator;
use variant_engine::core::store::{self, MemoryStore, StateStore};
use variant_engine::schema::preset::Preset;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut catalog_path = None;
    let mut account = "acct-preview".to_string();
    let mut preset_id = "preset-preview".to_string();
    let mut level = "L0".to_string();
    let mut day = "2024-01-01".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" if i + 1 < args.len() => {
                i += 1;
                catalog_path = Some(args[i].clone());
            }
            "--account" if i + 1 < args.len() => {
                i += 1;
                account = args[i].clone();
            }
            "--preset" if i + 1 < args.len() => {
                i += 1;
                preset_id = args[i].clone();
            }
            "--level" if i + 1 < args.len() => {
                i += 1;
                level = args[i].clone();
            }
            "--day" if i + 1 < args.len() => {
                i += 1;
                day = args[i].clone();
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(catalog_path) = catalog_path else {
        eprintln!("Missing required --catalog argument");
        print_usage();
        std::process::exit(1);
    };

    let mut decorator =
        match Decorator::from_json_file(Path::new(&catalog_path), MemoryStore::new()) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Failed to load catalog '{}': {}", catalog_path, e);
                std::process::exit(1);
            }
        };

    println!(
        "Loaded catalog: {} variants, inject target '{}', usable: {}",
        decorator.catalog().variants.len(),
        decorator.catalog().inject_target,
        decorator.catalog().is_usable()
    );
    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    loop {
        print!("{}/{}@{} {} > ", account, preset_id, level, day);
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let trimmed = line.trim();
        let (command, rest) = match trimmed.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (trimmed, ""),
        };

        match command {
            "pick" => {
                let preset = Preset::new(preset_id.clone(), account.clone(), level.clone());
                match decorator.select(&preset, &day) {
                    Some(selection) => println!(
                        "picked '{}' (sequence {}, retried: {})",
                        selection.key, selection.sequence, selection.retried
                    ),
                    None => println!("skipped (catalog unusable or no weights for {})", level),
                }
            }
            "decorate" => {
                let preset = Preset::new(preset_id.clone(), account.clone(), level.clone());
                let target = decorator.catalog().inject_target.clone();
                let mut fields = serde_json::Map::new();
                fields.insert(target.clone(), serde_json::Value::String(rest.to_string()));
                let out = decorator.decorate(&preset, &day, serde_json::Value::Object(fields));
                println!("--- {} ---", target);
                println!("{}", out[target.as_str()].as_str().unwrap_or(""));
                println!("---");
            }
            "level" if !rest.is_empty() => {
                level = rest.to_string();
            }
            "day" if !rest.is_empty() => {
                day = rest.to_string();
            }
            "context" => {
                let mut words = rest.split_whitespace();
                match (words.next(), words.next()) {
                    (Some(a), Some(p)) => {
                        account = a.to_string();
                        preset_id = p.to_string();
                    }
                    _ => println!("usage: context <account> <preset>"),
                }
            }
            "history" => {
                let key = store::history_key(&account, &preset_id);
                match decorator.store().get(&key) {
                    Ok(Some(raw)) => println!("history: {}", raw),
                    Ok(None) => println!("history: (empty)"),
                    Err(e) => println!("store error: {}", e),
                }
            }
            "bulk" => {
                let n: usize = rest.parse().unwrap_or(20);
                let preset = Preset::new(preset_id.clone(), account.clone(), level.clone());
                let mut counts: BTreeMap<String, usize> = BTreeMap::new();
                for _ in 0..n {
                    if let Some(selection) = decorator.select(&preset, &day) {
                        *counts.entry(selection.key).or_default() += 1;
                    }
                }
                for (key, count) in &counts {
                    println!(
                        "  {:<20} {:>5}  ({:.1}%)",
                        key,
                        count,
                        100.0 * *count as f64 / n as f64
                    );
                }
            }
            "reset" => {
                let fresh = match Decorator::from_json_file(
                    Path::new(&catalog_path),
                    MemoryStore::new(),
                ) {
                    Ok(d) => d,
                    Err(e) => {
                        eprintln!("Failed to reload catalog: {}", e);
                        break;
                    }
                };
                let old = std::mem::replace(&mut decorator, fresh);
                println!(
                    "store cleared ({} entries dropped)",
                    old.into_store().len()
                );
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            "" => {}
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }
}

fn print_usage() {
    println!(
        "Usage: preview --catalog <path> [--account <id>] [--preset <id>] \
         [--level <tag>] [--day <YYYY-MM-DD>]"
    );
}

fn print_help() {
    println!("  pick                    — run one selection and show the outcome");
    println!("  decorate <text>         — decorate a payload whose field holds <text>");
    println!("  level <tag>             — set the active level");
    println!("  day <YYYY-MM-DD>        — set the day bucket");
    println!("  context <acct> <preset> — switch account/preset pair");
    println!("  history                 — show the remembered picks for the pair");
    println!("  bulk <n>                — run n selections and print the distribution");
    println!("  reset                   — clear the in-memory store");
    println!("  quit                    — exit");
}
