use clap::Parser;
use estimo::storage::save_result;
use estimo::{PipelineBuilder, PipelineError, QuoteDocument, RenderConfig};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Render a quote JSON file to PDF, falling back to HTML if every PDF tier fails.
#[derive(Parser, Debug)]
#[command(name = "estimo", version, about)]
struct Cli {
    /// Path to the quote JSON.
    quote: PathBuf,

    /// Output file. Defaults to a name derived from the quote title.
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory to write a uniquely named output file into.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// TOML configuration file. `ESTIMO__*` environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the headless browser tier.
    #[arg(long)]
    no_browser: bool,

    #[arg(long)]
    browser_timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = RenderConfig::load(cli.config.as_deref())?;
    if let Some(ms) = cli.browser_timeout_ms {
        config.browser.timeout_ms = ms;
    }

    let mut builder = PipelineBuilder::new().with_config(config);
    if cli.no_browser {
        builder = builder.without_browser();
    }
    let orchestrator = builder.build()?;

    println!("Loading quote from {}", cli.quote.display());
    let quote: QuoteDocument = serde_json::from_str(&fs::read_to_string(&cli.quote)?)?;

    let start = Instant::now();
    let result = orchestrator.render(&quote).await;

    let path = match (cli.output, cli.out_dir) {
        (Some(path), _) => {
            fs::write(&path, &result.bytes)?;
            path
        }
        (None, Some(dir)) => save_result(&dir, &result, &quote.title)?,
        (None, None) => {
            let path = PathBuf::from(result.suggested_filename(&quote.title));
            fs::write(&path, &result.bytes)?;
            path
        }
    };

    println!(
        "Wrote {} ({}, {} bytes) in {:.2?}",
        path.display(),
        result.content_kind.mime_type(),
        result.bytes.len(),
        start.elapsed()
    );
    if !result.is_pdf() {
        eprintln!("Warning: every PDF renderer failed; the output is HTML.");
    }
    Ok(())
}
