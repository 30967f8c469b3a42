use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taskcrew::config::{self, Settings, DEFAULT_CONFIG_DIR};
use taskcrew::crew::{Crew, Runtime};
use taskcrew::template::PipelineInputs;
use taskcrew::{output, pipelines};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing config.json
    #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Override the configured model
    #[arg(long)]
    model: Option<String>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a topic for interview preparation
    Summarize {
        /// Topic name
        #[arg(long, default_value = pipelines::summarize::DEFAULT_TOPIC)]
        topic: String,

        /// File with the text to summarize (defaults to the built-in SQL primer)
        #[arg(long)]
        content_file: Option<PathBuf>,
    },
    /// Search the web for interview questions and tabulate them
    InterviewQuestions {
        #[arg(long, default_value = pipelines::interview::DEFAULT_TOPIC)]
        topic: String,
    },
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "taskcrew=warn" } else { "taskcrew=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn pipeline(command: &Command) -> Result<(Crew, PipelineInputs)> {
    match command {
        Command::Summarize { topic, content_file } => {
            let content = match content_file {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => pipelines::summarize::DEFAULT_TOPIC_CONTENT.to_string(),
            };
            Ok((
                pipelines::summarize::build()?,
                pipelines::summarize::inputs(topic.as_str(), content),
            ))
        }
        Command::InterviewQuestions { topic } => Ok((
            pipelines::interview::build()?,
            pipelines::interview::inputs(topic.as_str()),
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    config::load_dotenv();

    let mut settings = Settings::load(&cli.config_dir)?.with_env_credentials();
    if let Some(model) = &cli.model {
        settings = settings.with_model(model.as_str());
    }
    tracing::debug!(?settings, "settings");

    let (crew, inputs) = pipeline(&cli.command)?;
    let runtime = Runtime::from_settings(&settings)?.verbose(!cli.quiet);

    let result = crew.kickoff(&runtime, &inputs).await?;
    output::emit(&mut std::io::stdout().lock(), &result.to_string())
}
