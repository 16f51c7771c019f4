//! Stockroom save inspector
//!
//! Usage: `stockroom <store.json> [boxes|placeholders|clear]`
//!
//! Reads a `FileStore` save and prints its record sets, or clears them.
//! Set `RUST_LOG=debug` for repository diagnostics.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stockroom::persistence::{FileStore, RecordRepository};
use stockroom::{RestoreConfig, platform};

#[derive(Parser, Debug)]
#[command(about = "Inspect or clear a stockroom save file")]
struct Cli {
    /// Save file written by a FileStore
    path: PathBuf,
    /// Defaults to printing both record sets
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print saved boxes
    Boxes,
    /// Print saved shelf placeholders
    Placeholders,
    /// Delete both record sets
    Clear,
}

fn print_boxes(repo: &mut RecordRepository<FileStore>) {
    let boxes = repo.load_boxes();
    println!("{} boxes", boxes.len());
    for b in &boxes {
        let anchor = match b.anchor() {
            Some(p) => format!("docked at {}", p),
            None => "free".to_string(),
        };
        println!(
            "  {:<16} {:<10} product={:<8} stored={:<5} pos={} {}",
            b.template_name,
            b.category.as_str(),
            b.product_id,
            b.is_stored,
            b.position,
            anchor
        );
    }
}

fn print_placeholders(repo: &RecordRepository<FileStore>) {
    let placeholders = repo.load_placeholders();
    println!("{} placeholders", placeholders.len());
    for p in &placeholders {
        println!(
            "  {:<16} slot={:<6} {:<10} items={} pos={}",
            p.template_name,
            p.slot_id,
            p.category.as_str(),
            p.items.len(),
            p.position
        );
    }
}

fn main() {
    platform::init_logging();
    let cli = Cli::parse();

    let store = FileStore::open(&cli.path);
    let mut repo = RecordRepository::new(store, RestoreConfig::default());

    match cli.command {
        Some(Command::Boxes) => print_boxes(&mut repo),
        Some(Command::Placeholders) => print_placeholders(&repo),
        Some(Command::Clear) => {
            repo.clear_all();
            println!(
                "Cleared saved boxes and placeholders in {}",
                repo.store().path().display()
            );
        }
        None => {
            print_boxes(&mut repo);
            print_placeholders(&repo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_then_subcommand() {
        let cli = Cli::try_parse_from(["stockroom", "save.json", "clear"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("save.json"));
        assert_eq!(cli.command, Some(Command::Clear));
    }

    #[test]
    fn test_subcommand_optional() {
        let cli = Cli::try_parse_from(["stockroom", "save.json"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_help_is_not_a_store_path() {
        let err = Cli::try_parse_from(["stockroom", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_missing_path_rejected() {
        assert!(Cli::try_parse_from(["stockroom"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["stockroom", "save.json", "frobnicate"]).is_err());
    }
}
