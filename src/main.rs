// Spellbook Archive - interactive command loop
//
// Reads one command per line from stdin, prints the reply, then a blank
// line. EXIT (or end of input) ends the session.

mod config;
mod logger;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

use config::ArchiveConfig;
use spellbook_archive::{collection, execute, Archive, Command, Flow};

const PROMPT: &str = "user: ";

fn main() -> Result<()> {
    let config = ArchiveConfig::load()?;
    logger::init(&config.log_level)?;
    info!(?config, "configuration loaded");

    let mut archive = Archive::new();

    if let Some(path) = &config.collection {
        let summary = collection::import_collection(&mut archive, path)
            .with_context(|| format!("Failed to preload collection {}", path.display()))?;
        info!(added = summary.added, "collection preloaded");
    }

    run_repl(&mut archive, io::stdin().lock(), io::stdout().lock())?;

    if let Some(path) = &config.journal {
        export_journal(&archive, path)?;
    }

    Ok(())
}

fn run_repl<R: BufRead, W: Write>(archive: &mut Archive, input: R, mut output: W) -> Result<()> {
    let mut lines = input.lines();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            warn!("input closed without EXIT");
            return Ok(());
        };
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        // Unrecognised lines print nothing but still get the separator
        if let Some(command) = Command::parse(&line) {
            let reply = execute(archive, command);
            for text in &reply.lines {
                writeln!(output, "{}", text)?;
            }
            if reply.flow == Flow::Exit {
                return Ok(());
            }
        }
        writeln!(output)?;
    }
}

fn export_journal(archive: &Archive, path: &std::path::Path) -> Result<()> {
    let json = archive
        .journal()
        .to_json()
        .context("Failed to serialize journal")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write journal {}", path.display()))?;

    info!(path = %path.display(), events = archive.events().len(), "journal exported");
    Ok(())
}
