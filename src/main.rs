//! CLI entry point for overbind-keymap
//!
//! Provides command-line interface for listing and checking binds,
//! adding binds and groups, and managing config backups.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use overbind_keymap::config::{
    default_records, ConfigManager, FileRecordStore, RecordStore, ValidationLevel,
    ValidationReport, DEFAULT_CONFIG_PATH,
};
use overbind_keymap::core::{
    Bind, BindId, BindKind, BindUpdate, ControllerOutputTable, KeyCodeTable, Side,
};
use overbind_keymap::session::Session;

#[derive(Parser)]
#[command(name = "overbind-keymap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the OverBind config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Show debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all binds
    List,

    /// Validate binds and check for input conflicts
    Check,

    /// Write the default config
    Init {
        /// Overwrite an existing config (a backup is kept)
        #[arg(long)]
        force: bool,
    },

    /// List key names, or controller actions with --controller
    Keys {
        /// List controller actions instead of key names
        #[arg(long)]
        controller: bool,
    },

    /// Map a key to a key or a controller action
    Bind {
        /// Key to intercept
        input: String,
        /// Key name or controller action ("LEFT STICK LEFT")
        output: String,
    },

    /// Add a SOCD pair: pressing either key cancels the other
    Socd {
        first: String,
        second: String,
    },

    /// Add the mash-trigger group
    Mash {
        #[arg(num_args = 3, required = true)]
        keys: Vec<String>,
    },

    /// Remove a bind (grouped binds take their group with them)
    Remove {
        id: BindId,
    },

    /// List or prune config backups
    Backups {
        /// Keep only the newest N backups
        #[arg(long)]
        prune: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let path = expand_path(&cli.config)?;

    match cli.command {
        Commands::List => list_binds(path)?,
        Commands::Check => check_binds(path)?,
        Commands::Init { force } => init_config(path, force)?,
        Commands::Keys { controller } => list_keys(controller),
        Commands::Bind { input, output } => add_bind(path, &input, &output)?,
        Commands::Socd { first, second } => add_socd(path, &first, &second)?,
        Commands::Mash { keys } => add_mash(path, &keys)?,
        Commands::Remove { id } => remove_bind(path, id)?,
        Commands::Backups { prune } => list_backups(path, prune)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn expand_path(path: &Path) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::tilde(
        path.to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?,
    );
    Ok(PathBuf::from(expanded.as_ref()))
}

fn open_session(path: PathBuf) -> anyhow::Result<Session<FileRecordStore>> {
    let store = FileRecordStore::open(path)?;
    Ok(Session::open(store)?)
}

fn key_name(raw: &str) -> anyhow::Result<&'static str> {
    KeyCodeTable::global()
        .normalize(raw)
        .ok_or_else(|| anyhow::anyhow!("Unknown key '{}' (see `keys`)", raw))
}

fn print_bind(bind: &Bind, partner: Option<BindId>) {
    let kind = bind
        .kind
        .map(|k| k.to_string())
        .unwrap_or_else(|| "unset".to_string());
    let input = if bind.input.is_empty() { "-" } else { bind.input.as_str() };
    let output = if bind.output.is_empty() { "-" } else { bind.output.as_str() };

    let link = partner
        .map(|p| format!(" (pair #{})", p).dimmed().to_string())
        .unwrap_or_default();

    println!(
        "  {} {} {} → {}{}",
        format!("#{:<3}", bind.id).dimmed(),
        format!("{:<13}", kind).magenta(),
        input.cyan().bold(),
        output.green(),
        link
    );
}

/// List all binds in the config
fn list_binds(path: PathBuf) -> anyhow::Result<()> {
    let session = open_session(path.clone())?;
    let model = session.model();

    println!("{}", format!("Binds from: {}\n", path.display()).bold());

    for bind in model.list() {
        print_bind(bind, model.socd_partner(bind.id));
    }

    println!("\n{} Total: {} binds", "✓".green(), model.len());
    Ok(())
}

/// Validate the config and report conflicts
fn check_binds(path: PathBuf) -> anyhow::Result<()> {
    println!("{} Loading config: {}", "→".cyan(), path.display());

    let session = open_session(path)?;
    println!("{} Found {} binds\n", "✓".green(), session.model().len());

    let report = session.validate();

    if report.issues.is_empty() {
        println!("{} {}", "✓".green().bold(), "No problems detected!".bold());
        return Ok(());
    }

    for line in issue_lines(&report) {
        println!("{}", line);
    }

    if report.has_errors() {
        println!("\n{}", "✗ This config cannot be saved as is!".red());
        std::process::exit(1);
    }

    println!("\n{}", "⚠ Some binds will shadow each other at runtime".yellow());
    Ok(())
}

/// One line per issue, plus its suggestion when there is one
///
/// Conflicts arrive as warning issues, so each is listed exactly once.
fn issue_lines(report: &ValidationReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.issues.len() * 2);

    for issue in &report.issues {
        let marker = match issue.validation_level {
            ValidationLevel::Error => "✗".red().bold(),
            ValidationLevel::Warning => "⚠".yellow().bold(),
        };
        lines.push(format!("{} {}", marker, issue.message));
        if let Some(suggestion) = &issue.suggestion {
            lines.push(format!("  {}", suggestion.dimmed()));
        }
    }

    lines
}

/// Write the default config
fn init_config(path: PathBuf, force: bool) -> anyhow::Result<()> {
    if path.exists() {
        if !force {
            println!(
                "{} Config already exists: {} (use --force to overwrite)",
                "⚠".yellow(),
                path.display()
            );
            return Ok(());
        }

        let mut store = FileRecordStore::open(path.clone())?;
        store.save_records(&default_records())?;
    } else {
        FileRecordStore::open_or_create(path.clone())?;
    }

    println!("{} Wrote default config: {}", "✓".green(), path.display());
    Ok(())
}

/// Print the symbol tables
fn list_keys(controller: bool) {
    if controller {
        for action in ControllerOutputTable::global().actions() {
            println!("{}", action);
        }
    } else {
        let keys = KeyCodeTable::global();
        for name in keys.names() {
            if let Some(code) = keys.name_to_code(name) {
                println!("{:<14} {}", name, format!("{:#04x}", code).dimmed());
            }
        }
    }
}

/// Add a keyboard or controller bind
fn add_bind(path: PathBuf, input: &str, output: &str) -> anyhow::Result<()> {
    let input = key_name(input)?;

    let action = output.to_uppercase();
    let (kind, output) = if ControllerOutputTable::global()
        .action_to_result(&action)
        .is_some()
    {
        (BindKind::Controller, action)
    } else {
        (BindKind::Keyboard, key_name(output)?.to_string())
    };

    let mut session = open_session(path)?;
    let bind = session.create(Some(kind))?;
    session.update(bind.id, BindUpdate::Input(input.to_string()))?;
    session.update(bind.id, BindUpdate::Output(output))?;
    session.save()?;

    print_bind(session.model().get(bind.id)?, None);
    Ok(())
}

/// Add a SOCD pair
fn add_socd(path: PathBuf, first: &str, second: &str) -> anyhow::Result<()> {
    let first = key_name(first)?;
    let second = key_name(second)?;

    let mut session = open_session(path)?;
    let (a, b) = session.add_socd_pair();
    session.set_socd_side(a.id, Side::Input, first)?;
    session.set_socd_side(a.id, Side::Output, second)?;
    session.save()?;

    let model = session.model();
    print_bind(model.get(a.id)?, Some(b.id));
    print_bind(model.get(b.id)?, Some(a.id));
    Ok(())
}

/// Add the mash-trigger group
fn add_mash(path: PathBuf, keys: &[String]) -> anyhow::Result<()> {
    let names = keys
        .iter()
        .map(|k| key_name(k))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut session = open_session(path)?;
    if !session.can_add_mash_trigger_group() {
        anyhow::bail!("The config already has a mash-trigger group");
    }

    let members = session.add_mash_trigger_group()?;
    for (member, name) in members.iter().zip(names) {
        session.set_mash_trigger_input(member.id, name)?;
    }
    session.save()?;

    for member in &members {
        print_bind(session.model().get(member.id)?, None);
    }
    Ok(())
}

/// Remove a bind and its group
fn remove_bind(path: PathBuf, id: BindId) -> anyhow::Result<()> {
    let mut session = open_session(path)?;
    let removed = session.remove(id)?;
    session.save()?;

    println!(
        "{} Removed {} bind{}",
        "✓".green(),
        removed.len(),
        if removed.len() == 1 { "" } else { "s" }
    );
    for bind in &removed {
        print_bind(bind, None);
    }
    Ok(())
}

/// List or prune backups
fn list_backups(path: PathBuf, prune: Option<usize>) -> anyhow::Result<()> {
    let manager = ConfigManager::new(path)?;

    if let Some(keep) = prune {
        let deleted = manager.cleanup_old_backups(keep)?;
        println!("{} Deleted {} old backups", "✓".green(), deleted);
    }

    let backups = manager.list_backups()?;
    println!(
        "{}",
        format!("Backups in: {}\n", manager.backup_dir().display()).bold()
    );
    for backup in &backups {
        println!("  {}", backup.display());
    }
    println!("\n{} Total: {} backups", "✓".green(), backups.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use overbind_keymap::config::MemoryRecordStore;
    use overbind_keymap::core::PersistedRecord;

    #[test]
    fn test_issue_lines_list_each_conflict_once() {
        let records = vec![
            PersistedRecord::new("51", "keyboard", 0x45),
            PersistedRecord::new("51", "thumb_lx", -32767),
        ];
        let session = Session::open(MemoryRecordStore::new(records)).unwrap();

        let lines = issue_lines(&session.validate());

        let mentions = lines.iter().filter(|l| l.contains("shares input 'Q'")).count();
        assert_eq!(mentions, 1);
        assert_eq!(lines.len(), 2, "Warning plus its suggestion");
    }

    #[test]
    fn test_issue_lines_empty_for_clean_config() {
        let session = Session::open(MemoryRecordStore::new(default_records())).unwrap();
        assert!(issue_lines(&session.validate()).is_empty());
    }
}
