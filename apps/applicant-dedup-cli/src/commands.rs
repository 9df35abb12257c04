//! Command definitions and handlers

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use applicant_dedup::record::{load_csv, load_json};
use applicant_dedup::{
    find_duplicates, normalize, similarity_breakdown, tokenize, ApplicationRecord, DedupConfig,
    DuplicateNotification, DuplicateReport, SimilarityBreakdown,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(
    name = "applicant-dedup",
    version,
    about = "Find job applications submitted more than once by the same person"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Group likely duplicate applications from a JSON or CSV file
    Scan {
        /// Input file, or `-` for stdin
        input: PathBuf,
        /// Input format (inferred from the file extension when omitted)
        #[arg(long, value_enum)]
        format: Option<InputFormat>,
        /// Similarity threshold, overrides the config file
        #[arg(long)]
        threshold: Option<f64>,
        /// TOML or JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
    /// Show how two names score against each other
    Score {
        name_a: String,
        name_b: String,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the normalized form and tokens of a name
    Normalize { name: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    groups: Vec<GroupOutput<'a>>,
    duplicate_ids: Vec<&'a str>,
    notification: DuplicateNotification,
}

#[derive(Serialize)]
struct GroupOutput<'a> {
    date_of_birth: &'a str,
    members: Vec<MemberOutput<'a>>,
}

#[derive(Serialize)]
struct MemberOutput<'a> {
    id: &'a str,
    full_name: &'a str,
}

impl<'a> ScanOutput<'a> {
    fn new(report: &DuplicateReport<'a>, notification: DuplicateNotification) -> Self {
        let groups = report
            .groups
            .iter()
            .map(|group| GroupOutput {
                date_of_birth: group.date_of_birth,
                members: group
                    .members
                    .iter()
                    .map(|&r| MemberOutput {
                        id: r.id.as_str(),
                        full_name: r.full_name.as_str(),
                    })
                    .collect(),
            })
            .collect();

        let mut duplicate_ids: Vec<&'a str> = report.duplicate_ids.iter().copied().collect();
        duplicate_ids.sort_unstable();

        Self {
            groups,
            duplicate_ids,
            notification,
        }
    }
}

#[derive(Serialize)]
struct ScoreOutput {
    #[serde(flatten)]
    breakdown: SimilarityBreakdown,
    threshold: f64,
    matches: bool,
}

#[derive(Serialize)]
struct NormalizeOutput {
    normalized: String,
    tokens: Vec<String>,
}

/// Dispatch a parsed command, writing its JSON output to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> CliResult<()> {
    match cli.command {
        Command::Scan {
            input,
            format,
            threshold,
            config,
            pretty,
        } => {
            let config = resolve_config(config.as_deref(), threshold)?;
            let records = read_records(&input, format)?;
            scan(&records, &config, pretty, out)
        }
        Command::Score {
            name_a,
            name_b,
            threshold,
            config,
        } => {
            let config = resolve_config(config.as_deref(), threshold)?;
            let breakdown = similarity_breakdown(&name_a, &name_b, &config);
            let output = ScoreOutput {
                matches: breakdown.score >= config.threshold,
                threshold: config.threshold,
                breakdown,
            };
            write_json(out, &output, true)
        }
        Command::Normalize { name } => {
            let output = NormalizeOutput {
                normalized: normalize(&name),
                tokens: tokenize(&name),
            };
            write_json(out, &output, true)
        }
    }
}

fn scan<W: Write>(
    records: &[ApplicationRecord],
    config: &DedupConfig,
    pretty: bool,
    out: &mut W,
) -> CliResult<()> {
    let report = find_duplicates(records, config);
    let notification = report.notification();

    if notification.has_duplicates {
        info!(groups = notification.count, "duplicates found");
    }

    write_json(out, &ScanOutput::new(&report, notification), pretty)
}

/// Config file first, then the command-line threshold on top.
fn resolve_config(path: Option<&Path>, threshold: Option<f64>) -> CliResult<DedupConfig> {
    let mut config = match path {
        Some(path) => DedupConfig::load(path)?,
        None => DedupConfig::default(),
    };

    if let Some(threshold) = threshold {
        config.threshold = threshold;
        config.validate()?;
    }

    info!(
        threshold = config.threshold,
        reverse_tokens = config.reverse_tokens,
        "using config"
    );
    Ok(config)
}

fn read_records(input: &Path, format: Option<InputFormat>) -> CliResult<Vec<ApplicationRecord>> {
    let format = format.unwrap_or_else(|| infer_format(input));

    let reader: Box<dyn Read> = if input == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(input)?))
    };

    let records = match format {
        InputFormat::Json => load_json(reader)?,
        InputFormat::Csv => load_csv(reader)?,
    };

    if records.is_empty() {
        warn!("no records in {}", input.display());
    } else {
        info!(count = records.len(), "loaded records from {}", input.display());
    }
    Ok(records)
}

fn infer_format(input: &Path) -> InputFormat {
    match input.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
        _ => InputFormat::Json,
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> CliResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> CliResult<serde_json::Value> {
        let argv = std::iter::once("applicant-dedup").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(serde_json::from_slice(&out)?)
    }

    #[test]
    fn test_scan_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applications.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "1", "full_name": "Ali Valiyev", "date_of_birth": "1990-01-01"},
                {"id": "2", "full_name": "Valiyev Ali", "date_of_birth": "1990-01-01"},
                {"id": "3", "full_name": "Botir Nazarov", "date_of_birth": "1990-01-01"}
            ]"#,
        )
        .unwrap();

        let value = run_args(&["scan", path.to_str().unwrap()]).unwrap();
        assert_eq!(value["groups"].as_array().unwrap().len(), 1);
        assert_eq!(value["groups"][0]["members"][1]["full_name"], "Valiyev Ali");
        assert_eq!(value["duplicate_ids"], serde_json::json!(["1", "2"]));
        assert_eq!(
            value["notification"],
            serde_json::json!({"has_duplicates": true, "count": 1})
        );
    }

    #[test]
    fn test_scan_csv_with_config_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("applications.csv");
        std::fs::write(
            &data,
            "id,full_name,date_of_birth\n1,Ali Valiyev,1990-01-01\n2,Vali Aliyev,1990-01-01\n",
        )
        .unwrap();
        let config = dir.path().join("dedup.toml");
        std::fs::write(&config, "threshold = 0.95\n").unwrap();

        // Dice is 0.9: below the file threshold
        let value = run_args(&[
            "scan",
            data.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(value["notification"]["has_duplicates"], false);

        let value = run_args(&[
            "scan",
            data.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--threshold",
            "0.7",
        ])
        .unwrap();
        assert_eq!(value["notification"]["count"], 1);
    }

    #[test]
    fn test_scan_without_duplicates_notifies_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applications.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "1", "full_name": "Ali Karimov", "date_of_birth": "1990-01-01"},
                {"id": "2", "full_name": "Ali Karimov", "date_of_birth": "1991-01-01"}
            ]"#,
        )
        .unwrap();

        let value = run_args(&["scan", path.to_str().unwrap()]).unwrap();
        assert!(value["groups"].as_array().unwrap().is_empty());
        assert_eq!(
            value["notification"],
            serde_json::json!({"has_duplicates": false, "count": 0})
        );
    }

    #[test]
    fn test_scan_rejects_bad_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applications.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(run_args(&["scan", path.to_str().unwrap(), "--threshold", "1.5"]).is_err());
    }

    #[test]
    fn test_scan_missing_file() {
        assert!(run_args(&["scan", "/nonexistent/applications.json"]).is_err());
    }

    #[test]
    fn test_score() {
        let value = run_args(&["score", "Ali Valiyev", "Valiyev Ali"]).unwrap();
        assert_eq!(value["score"], 1.0);
        assert_eq!(value["matches"], true);
        assert_eq!(value["threshold"], 0.7);
    }

    #[test]
    fn test_normalize() {
        let value = run_args(&["normalize", "  Valiyev,  Ali "]).unwrap();
        assert_eq!(value["normalized"], "valiyev ali");
        assert_eq!(value["tokens"], serde_json::json!(["valiyev", "ali"]));
    }

    #[test]
    fn test_infer_format() {
        assert_eq!(infer_format(Path::new("a.CSV")), InputFormat::Csv);
        assert_eq!(infer_format(Path::new("a.json")), InputFormat::Json);
        assert_eq!(infer_format(Path::new("-")), InputFormat::Json);
    }
}
