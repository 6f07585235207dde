//! Process command - classify a single document and suggest its filename.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use docsort_core::document::{DocumentEngine, ExternalGuess};
use docsort_core::models::ProcessOutcome;

use super::{csv_header, csv_record, load_config, read_document_text};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (.pdf text layer or .txt OCR output)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// External classifier response (JSON) to reconcile with the rules
    #[arg(short, long)]
    guess: Option<PathBuf>,

    /// Rename the input PDF to the suggested filename
    #[arg(long)]
    rename: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    pb.set_message("Reading text...");
    let text = read_document_text(&args.input, &config)?;

    let guess = match &args.guess {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            Some(ExternalGuess::from_response(&raw)?)
        }
        None => None,
    };

    pb.set_message("Classifying...");
    let engine = DocumentEngine::new(config);
    let outcome = match guess {
        Some(guess) => engine.process_with_guess(&text, Some(guess)),
        None => engine.process(&text),
    };

    pb.finish_and_clear();

    if !outcome.has_text {
        eprintln!(
            "{} Insufficient text in {}; fields may be incomplete",
            style("!").yellow(),
            args.input.display()
        );
    }

    let file_name = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let output = format_outcome(file_name, &outcome, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.rename {
        rename_input(&args.input, &outcome)?;
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn rename_input(input: &Path, outcome: &ProcessOutcome) -> anyhow::Result<()> {
    let is_pdf = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        anyhow::bail!("--rename only applies to PDF inputs");
    }
    if !outcome.has_text {
        warn!("Not renaming {}: insufficient text", input.display());
        return Ok(());
    }

    let target = input.with_file_name(&outcome.suggested_filename);
    if target == input {
        return Ok(());
    }
    if target.exists() {
        anyhow::bail!("Refusing to overwrite existing file: {}", target.display());
    }

    fs::rename(input, &target)?;
    println!(
        "{} Renamed to {}",
        style("✓").green(),
        target.display()
    );
    Ok(())
}

pub fn format_outcome(
    file_name: &str,
    outcome: &ProcessOutcome,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(outcome)?),
        OutputFormat::Csv => format_csv(file_name, outcome),
        OutputFormat::Text => Ok(format_text(outcome)),
    }
}

fn format_csv(file_name: &str, outcome: &ProcessOutcome) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(csv_header())?;
    wtr.write_record(csv_record(file_name, outcome))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(outcome: &ProcessOutcome) -> String {
    let fields = &outcome.fields;
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();

    let mut output = String::new();
    output.push_str(&format!("Filename: {}\n", outcome.suggested_filename));
    output.push_str(&format!(
        "Type:     {}\n",
        fields.doc_type.map_or("-".to_string(), |t| t.to_string())
    ));
    output.push_str(&format!("Issuer:   {}\n", or_dash(fields.issuer.as_deref())));
    output.push_str(&format!("Date:     {}\n", or_dash(fields.date_iso.as_deref())));
    output.push_str(&format!("Account:  {}\n", or_dash(fields.account_last4.as_deref())));
    output.push_str(&format!("ASX code: {}\n", or_dash(fields.asx_code.as_deref())));
    if !outcome.has_text {
        output.push_str("\nInsufficient text\n");
    }
    output
}
