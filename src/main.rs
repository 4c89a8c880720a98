mod api;
mod error;
mod server;

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use adify::config::{load_dotenv, Settings};
use adify::export::{format_score, variants_to_csv, EXPORT_FILENAME};
use adify::pipeline::{run_action, Outcome, VALIDATION_WARNING};
use adify::{format_float, CopyGenerator, CopyScorer, Platform, UserRequest, Variant};
use error::{Error, Result};

#[derive(Parser)]
#[command(name = "adify", about = "Ad copy variant generator and scorer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    Generate(GenerateArgs),
    Score(ScoreArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    #[arg(long, default_value = "")]
    product: String,
    #[arg(long, default_value = "")]
    audience: String,
    #[arg(long, default_value = "Facebook")]
    platform: String,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    no_export: bool,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct ScoreArgs {
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long, default_value = "static")]
    web_root: String,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            web_root: "static".to_string(),
            model: None,
            config: None,
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() {
    load_dotenv(Path::new(env!("CARGO_MANIFEST_DIR")));
    init_tracing();
    if let Err(err) = run().await {
        match &err {
            Error::Validation(message) => eprintln!("Warning: {}", message),
            _ => eprintln!("Error: {}", err),
        }
        std::process::exit(err.exit_code());
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve(ServeArgs::default()));

    match command {
        Command::Generate(args) => run_generate(args).await,
        Command::Score(args) => run_score(args),
        Command::Serve(args) => {
            let settings = Settings::load(args.config.clone(), args.model.clone())?;
            server::serve(args, settings).await
        }
    }
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    let platform = Platform::from_str(&args.platform)
        .ok_or_else(|| Error::Input(format!("invalid platform: {}", args.platform)))?;
    let request = UserRequest::new(args.product, args.audience, platform);
    if !request.is_complete() {
        return Err(Error::Validation(VALIDATION_WARNING.to_string()));
    }

    let settings = Settings::load(args.config, args.model)?;
    let generator = CopyGenerator::from_settings(&settings);
    let scorer = CopyScorer::new(settings.scoring.clone());

    let report = match run_action(&generator, &scorer, &request).await {
        Outcome::Ok(report) => report,
        Outcome::ValidationError(message) => return Err(Error::Validation(message)),
        failed => {
            if let Outcome::ParseEmpty { raw_text } = &failed {
                print_raw(raw_text);
            }
            let message = failed.message().unwrap_or_default().to_string();
            return Err(Error::Generation(message));
        }
    };

    print_raw(&report.raw_text);
    println!("\nRanked variants:");
    print_table(&report.variants);

    if !args.no_export {
        let path = args.output.unwrap_or_else(|| PathBuf::from(EXPORT_FILENAME));
        let bytes = variants_to_csv(&report.variants)?;
        std::fs::write(&path, bytes)?;
        println!("\nSaved results to {}", path.display());
    }

    println!(
        "\nBest performing ad copy ({}):\n{}",
        format_float(report.best.score, 2),
        report.best.text
    );

    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<()> {
    let text = read_text(args.text)?;
    let (file, _) = adify::config::FileConfig::load(args.config)?;
    let scorer = CopyScorer::new(file.scoring);
    let breakdown = scorer.breakdown(&text);

    println!("Score: {}", format_float(breakdown.total, 2));
    println!(
        "Readability: {} | length: {} | call-to-action: {}",
        format_float(breakdown.readability, 2),
        format_float(breakdown.length_score, 1),
        format_float(breakdown.cta_bonus, 1)
    );
    Ok(())
}

fn print_raw(raw_text: &str) {
    println!("Generated ad copies:\n{}", raw_text);
}

fn print_table(variants: &[Variant]) {
    let width = variants
        .iter()
        .map(|variant| variant.text.chars().count())
        .max()
        .unwrap_or(0)
        .max("Variant".len());

    println!("{:<width$}  Score", "Variant", width = width);
    for variant in variants {
        println!(
            "{:<width$}  {}",
            variant.text,
            format_score(variant.score),
            width = width
        );
    }
}

fn read_text(arg: Option<String>) -> Result<String> {
    if let Some(text) = arg {
        if !text.trim().is_empty() {
            return Ok(text);
        }
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err(Error::Input(
            "missing ad copy text: pass --text or pipe stdin".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
