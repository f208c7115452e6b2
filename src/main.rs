use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use receipt_split::input::{InputError, ItemFormat, read_items};
use receipt_split::model::parse_names;
use receipt_split::{Charge, Edit, Session, TaxTip, report};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum InputFormat {
    Csv,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    /// Plain-text breakdown
    Text,
    /// One csv row per participant
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "receipt-split", version, about = "Split a receipt, tax and tip included")]
struct Cli {
    /// Item file: csv table or json from the receipt parser
    input: PathBuf,

    /// Comma separated participant names (default: the csv participant columns)
    #[arg(short = 'n', long = "names")]
    names: Option<String>,

    /// Tax as a percentage of the subtotal (`10%`) or a fixed amount (`2.50`)
    #[arg(long = "tax", default_value = "0%")]
    tax: Charge,

    /// Tip as a percentage of subtotal plus tax (`15%`) or a fixed amount (`5`)
    #[arg(long = "tip", default_value = "0%")]
    tip: Charge,

    /// Input format (default: from the file extension)
    #[arg(long = "in-format", value_enum)]
    in_format: Option<InputFormat>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let format = match cli.in_format {
        Some(InputFormat::Csv) => ItemFormat::Csv,
        Some(InputFormat::Json) => ItemFormat::Json,
        None => ItemFormat::from_path(&cli.input),
    };
    let table = read_items(&cli.input, format)?;

    let participants = match &cli.names {
        Some(names) => parse_names(names),
        None => table.participants,
    };
    if participants.is_empty() {
        warn!("no participants, only receipt totals will be shown");
    }

    let mut session = Session::new(participants, TaxTip::new(cli.tax, cli.tip));
    let (edit_sender, edit_receiver) = tokio::sync::mpsc::channel(16);
    let rows = table.rows;

    tokio::spawn(async move {
        for result in rows {
            match result {
                Ok(item) => {
                    if edit_sender.send(Edit::AddItem(item)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    session.run(ReceiverStream::new(edit_receiver)).await;

    let allocation = session.allocation();
    if !allocation.unassigned().is_zero() {
        warn!(
            amount = %allocation.unassigned(),
            "some items are not assigned to anyone"
        );
    }

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    match cli.format {
        OutputFormat::Text => writer.write_all(report::breakdown(&allocation).as_bytes())?,
        OutputFormat::Csv => receipt_split::csv::write_summary(&allocation, &mut writer)?,
    }

    writer.flush()?;
    Ok(())
}
