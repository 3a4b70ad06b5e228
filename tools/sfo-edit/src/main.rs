//! PARAM.SFO editor
//!
//! Inspects and edits SFO files from the command line. Editing commands
//! rewrite the file in place.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sfo_format::ParamSfo;

const USAGE: &str = "Usage: sfo-edit <file> <command>

Commands:
  list                    Print every entry as `key: value`
  dump                    Print the header and section table
  get <key>               Print one value
  set <index> <value>     Set a value, parsed by the entry's type
  rename <index> <label>  Replace an entry's key";

fn main() {
    sfo_core::logging::init_default();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let (path, command, rest) = match args {
        [path, command, rest @ ..] => (PathBuf::from(path), command.as_str(), rest),
        _ => bail!("{}", USAGE),
    };

    let mut sfo =
        ParamSfo::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;

    match (command, rest) {
        ("list", []) => {
            for entry in sfo.entries() {
                println!("{}: {}", entry.label, entry.value);
            }
        }
        ("dump", []) => dump(&sfo),
        ("get", [key]) => println!("{}", sfo.get(key)?),
        ("set", [index, value]) => {
            let index = parse_index(index)?;
            sfo.set_value_from_str(index, value)
                .with_context(|| format!("Failed to set entry {}", index))?;
            save(&mut sfo)?;
        }
        ("rename", [index, label]) => {
            let index = parse_index(index)?;
            sfo.set_label(index, label.as_str())?;
            save(&mut sfo)?;
        }
        _ => bail!("{}", USAGE),
    }

    Ok(())
}

fn parse_index(text: &str) -> Result<usize> {
    text.parse()
        .with_context(|| format!("Invalid index: {}", text))
}

fn save(sfo: &mut ParamSfo) -> Result<()> {
    sfo.save().context("Failed to save SFO")?;
    tracing::info!("Saved {} entries", sfo.len());
    Ok(())
}

fn dump(sfo: &ParamSfo) {
    let header = sfo.header();
    println!("=== SFO Header ===");
    println!("Version: {:02X?}", header.version);
    println!("Label Table: 0x{:X}", header.label_table_offset);
    println!("Data Table: 0x{:X}", header.data_table_offset);
    println!("Sections: {}", header.section_count);
    println!("\n=== Sections ===");

    for (i, entry) in sfo.entries().enumerate() {
        let section = &entry.section;
        println!(
            "Section {:2}: {:20} Type={:8} Label=0x{:04X} Data=0x{:08X} Used={} Reserved={}",
            i,
            entry.label,
            entry.data_type().name(),
            section.label_offset,
            section.data_offset,
            section.used_size,
            section.reserved_size
        );
    }
}
