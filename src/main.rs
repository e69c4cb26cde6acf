use anyhow::{Context, Result};
use bayes_enum::command::Command;
use bayes_enum::display::{self, TextTrace};
use bayes_enum::{load_network, InferenceEngine, InferenceError, Registry, RowPolicy};
use clap::Parser;
use rayon::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exact inference over a discrete Bayesian network by enumeration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Exact inference over a discrete Bayesian network by enumeration")]
struct Cli {
    /// Structure file, one `parent -> child` edge per line
    structure: PathBuf,

    /// CPT file with NODE / VALUES / PARENTS / TABLE / END blocks
    cpts: PathBuf,

    /// MOSTRAR:ESTRUCT, MOSTRAR:CPTS, MOSTRAR:FUENTE, MOSTRAR:JSON,
    /// "CONSULTAR: Var | A=a,B=b" or "CONSULTAR_TRACE: Var | A=a"
    commands: Vec<String>,

    /// Reject table rows whose probabilities do not sum to 1
    #[arg(long)]
    strict: bool,

    /// Allowed deviation of a row sum from 1
    #[arg(long, default_value_t = RowPolicy::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Print query results as JSON
    #[arg(long)]
    json: bool,

    /// Decimal places for probabilities
    #[arg(long, default_value_t = 6)]
    precision: usize,
}

impl Cli {
    fn policy(&self) -> RowPolicy {
        RowPolicy { tolerance: self.tolerance, strict: self.strict }
    }
}

/// Status returned when the network cannot be loaded.
const LOAD_FAILURE: u8 = 2;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let status = execute(&cli, &mut std::io::stdout().lock(), &mut std::io::stderr().lock())?;
    Ok(ExitCode::from(status))
}

/// Loads the network and runs every command, returning the process status.
///
/// Commands render in parallel but are written in the order given. A failing
/// command reports on `err` and the remaining commands still run.
fn execute(cli: &Cli, out: &mut impl Write, err: &mut impl Write) -> Result<u8> {
    let registry = match load_network(&cli.structure, &cli.cpts, cli.policy()) {
        Ok(registry) => registry,
        Err(e) => {
            writeln!(err, "Error loading network: {}", e)?;
            return Ok(LOAD_FAILURE);
        }
    };
    tracing::info!(variables = registry.count(), commands = cli.commands.len(), "network loaded");

    // Kept as a Result: a cyclic network can still print its snapshot.
    let engine = InferenceEngine::new(&registry);

    let rendered: Vec<(String, Result<()>)> = cli.commands
        .par_iter()
        .map(|raw| {
            let mut text = String::new();
            let result = render(raw, &registry, engine.as_ref(), cli, &mut text)
                .with_context(|| format!("Error in {}", raw.trim()));
            (text, result)
        })
        .collect();

    for (text, result) in rendered {
        out.write_all(text.as_bytes())?;
        if let Err(e) = result {
            out.flush()?;
            writeln!(err, "{:#}", e)?;
        }
    }
    out.flush()?;
    Ok(0)
}

/// Appends the output of one command to `text`. A failed traced query still
/// leaves the steps narrated before the failure in `text`.
fn render(
    raw: &str,
    registry: &Registry,
    engine: Result<&InferenceEngine<'_>, &InferenceError>,
    cli: &Cli,
    text: &mut String,
) -> Result<()> {
    match raw.parse::<Command>()? {
        Command::ShowStructure => text.push_str(&display::format_structure(registry)?),
        Command::ShowTables => text.push_str(&display::format_tables(registry)?),
        Command::ShowSource => text.push_str(&display::format_cpt_source(registry)?),
        Command::ShowJson => {
            text.push_str(&registry.to_json()?);
            text.push('\n');
        }
        Command::Query { variable, evidence, evidence_text, trace } => {
            let engine = engine.map_err(|e| e.clone())?;
            let mut narration = TextTrace::with_precision(cli.precision);
            let result = if trace {
                engine.query_traced(&variable, &evidence, &mut narration)
            } else {
                engine.query(&variable, &evidence)
            };
            text.push_str(narration.as_str());
            let distribution = result?;

            if cli.json {
                text.push_str(&serde_json::to_string_pretty(&distribution)?);
                text.push('\n');
            } else {
                text.push_str(&display::format_distribution(&distribution, &evidence_text, cli.precision));
            }
        }
    }
    Ok(())
}
