use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info};

use promptbatch::assemble::{assemble, write_json};
use promptbatch::input::{prompts_from_lines, prompts_from_text};
use promptbatch::{BatchEngine, EngineConfig, Error, Strategy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode
{   Concurrent
  , Sequential
}

/// Send a file of prompts to a chat completions endpoint
#[derive(Debug, Parser)]
#[command(name = "promptbatch", version)]
struct Args
{   /// Prompt file, prompts separated by blank lines
    #[arg(long)]
    prompts: PathBuf
  , /// Treat every non-empty line as its own prompt
    #[arg(long)]
    lines: bool
  , /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>
  , #[arg(long)]
    model: Option<String>
  , #[arg(long)]
    temperature: Option<f32>
  , #[arg(long)]
    seed: Option<i64>
  , /// Instructions prepended to every prompt
    #[arg(long)]
    instructions: Option<String>
  , #[arg(long)]
    batch_size: Option<usize>
  , #[arg(long, value_enum)]
    mode: Option<Mode>
  , /// Pause between groups (concurrent) or calls (sequential)
    #[arg(long)]
    delay_ms: Option<u64>
  , /// Record the system fingerprint with each answer
    #[arg(long)]
    fingerprint: bool
  , /// Output file, stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>
}

fn build_config(args: &Args) -> Result<EngineConfig, Error>
{   let mut config = match &args.config
    {   Some(path) => EngineConfig::from_json_file(path)?
      , None => EngineConfig::default()
    };

    if let Some(model) = &args.model
    {   config.request.model = model.clone();
    }
    if let Some(t) = args.temperature
    {   config.request.temperature = t;
    }
    if args.seed.is_some()
    {   config.request.seed = args.seed;
    }
    if let Some(i) = &args.instructions
    {   config.request.common_instructions = Some(i.clone());
    }
    if let Some(size) = args.batch_size
    {   config.batch_size = size;
    }
    if let Some(mode) = args.mode
    {   config.strategy = match mode
        {   Mode::Concurrent => Strategy::Concurrent
          , Mode::Sequential => Strategy::Sequential
        };
    }
    if let Some(ms) = args.delay_ms
    {   match config.strategy
        {   Strategy::Concurrent => config.group_delay_ms = ms
          , Strategy::Sequential => config.sequential_delay_ms = ms
        }
    }
    if args.fingerprint
    {   config.capture_fingerprint = true;
    }
    config.request.api_key
      = std::env::var("OPENAI_API_KEY").unwrap_or_default();

    config.validate()?;
    Ok(config)
}

async fn run(args: Args) -> Result<(), Error>
{   let config = build_config(&args)?;

    let text = std::fs::read_to_string(&args.prompts)?;
    let prompts = if args.lines
    {   prompts_from_lines(&text)
    } else
    {   prompts_from_text(&text)
    };
    info!("Loaded {} prompts", prompts.len());

    let engine = BatchEngine::new(config)?;
    let answers = engine
      .run(&prompts, |p| info!("Progress: {:.0}%", p * 100.0))
      .await?;

    let rows = assemble(&prompts, &answers)?;
    match &args.output
    {   Some(path) => {
          write_json(&rows, BufWriter::new(File::create(path)?))?;
          info!("Answers written to {}", path.display());
        }
      , None => write_json(&rows, std::io::stdout().lock())?
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode
{   env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    match run(Args::parse()).await
    {   Ok(()) => ExitCode::SUCCESS
      , Err(e) => {
          error!("{}", e);
          ExitCode::FAILURE
        }
    }
}
