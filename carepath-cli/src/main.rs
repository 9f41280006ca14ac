//! carepath binary: parses the question and options, runs the workflow, prints the answer.

use clap::Parser;
use carepath::GeoPoint;
use carepath_cli::{run_with_options, RunOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "carepath")]
#[command(about = "Medical consultation assistant: transcribe, route, answer, speak")]
struct Args {
    /// Question text (can also be given as trailing positional words)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Recorded question to transcribe
    #[arg(long, value_name = "FILE")]
    audio: Option<PathBuf>,

    /// Photo to analyze (symptom questions)
    #[arg(long, value_name = "FILE")]
    image: Option<PathBuf>,

    /// Latitude for the hospital lookup
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude for the hospital lookup
    #[arg(long, allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Look up hospitals near --lat/--lng instead of answering
    #[arg(long)]
    hospitals: bool,

    /// Use mock collaborators only (no API keys needed)
    #[arg(long)]
    offline: bool,

    /// Override KNOWLEDGE_DB
    #[arg(long, value_name = "FILE")]
    knowledge_db: Option<PathBuf>,

    /// Log node enter/exit
    #[arg(short, long)]
    verbose: bool,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,

    /// Question words (when -m/--message is not used)
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

fn get_message(args: &Args) -> String {
    if let Some(ref m) = args.message {
        return m.clone();
    }
    args.rest.join(" ").trim().to_string()
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,carepath=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn options(args: &Args) -> RunOptions {
    RunOptions {
        audio: args.audio.clone(),
        image: args.image.clone(),
        location: match (args.lat, args.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        },
        hospitals: args.hospitals,
        offline: args.offline,
        knowledge_db: args.knowledge_db.clone(),
        verbose: args.verbose,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let input = get_message(&args);

    let state = match run_with_options(&input, &options(&args)).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }
    if let Some(t) = &state.transcribed_text {
        println!("[You] {}", t);
    }
    println!("[Doctor] {}", state.response_text.as_deref().unwrap_or(""));
    if let Some(audio) = &state.response_audio {
        println!("[Audio] {}", audio.path().display());
    }
    Ok(())
}
