//! Command-line interface for the versemap binary.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::error::Result;
use crate::reference::parse_reference;
use crate::ruleset::{LoadOptions, Overlap};
use crate::service::VerseMapService;
use crate::types::{Location, Translation, VerseKey};

/// Versemap - map Bible verse references between versification traditions.
#[derive(Debug, Parser)]
#[command(name = "versemap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Rule document (YAML)
    #[arg(short, long)]
    pub rules: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Map a verse to the other translation.
    Match {
        /// Source translation tag (e.g., kjv)
        from: String,

        /// Verse reference (e.g., "Ps. 23:1")
        reference: String,
    },

    /// Show the annotation cluster of a verse.
    Cluster {
        /// Translation tag of the reference
        translation: String,

        /// Verse reference (e.g., "Eph 3:17")
        reference: String,
    },

    /// Validate a rule document and report overlapping rules.
    Check {
        /// Fail if any two rules claim the same source verse
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Debug, Serialize)]
struct MatchReport<'a> {
    from: &'a Translation,
    to: &'a Translation,
    reference: VerseKey,
    results: Vec<VerseKey>,
    exists: bool,
}

#[derive(Debug, Serialize)]
struct ClusterReport<'a> {
    id: String,
    translation: &'a Translation,
    reference: VerseKey,
    members: Vec<Location>,
    siblings: Vec<VerseKey>,
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    translations: [&'a Translation; 2],
    rules: usize,
    fingerprint: &'a str,
    overlaps: Vec<Overlap>,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = execute(&cli)?;
    println!("{output}");
    Ok(())
}

/// Execute a parsed command, returning its JSON report.
pub fn execute(cli: &Cli) -> Result<String> {
    match &cli.command {
        Commands::Match { from, reference } => match_command(&cli.rules, from, reference),
        Commands::Cluster {
            translation,
            reference,
        } => cluster_command(&cli.rules, translation, reference),
        Commands::Check { strict } => check_command(&cli.rules, *strict),
    }
}

fn match_command(rules: &Path, from: &str, reference: &str) -> Result<String> {
    let service = VerseMapService::from_yaml_file(rules, LoadOptions::default())?;
    let from = service.translation(from)?;
    let key = parse_reference(reference)?;
    let to = service.pair().other(&from).unwrap_or(&from);

    let results = service.match_to_other(&from, &key);
    let report = MatchReport {
        from: &from,
        to,
        exists: !results.is_empty(),
        reference: key,
        results,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn cluster_command(rules: &Path, translation: &str, reference: &str) -> Result<String> {
    let service = VerseMapService::from_yaml_file(rules, LoadOptions::default())?;
    let translation = service.translation(translation)?;
    let key = parse_reference(reference)?;

    let members = service.cluster_members(&translation, &key);
    let report = ClusterReport {
        id: service.cluster_id(&translation, &key),
        translation: &translation,
        siblings: service.same_translation_siblings(&translation, &key),
        reference: key,
        members,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn check_command(rules: &Path, strict: bool) -> Result<String> {
    let service = VerseMapService::from_yaml_file(rules, LoadOptions { strict })?;
    let pair = service.pair();
    let report = CheckReport {
        translations: [pair.a(), pair.b()],
        rules: service.rules().len(),
        fingerprint: service.fingerprint(),
        overlaps: service.rules().overlaps(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
