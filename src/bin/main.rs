use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use playlist_generator::config::Config;

#[derive(Parser, Debug)]
#[command(name = "playlist-server")]
#[command(about = "Genre playlist generator backed by Cohere", long_about = None)]
struct Args {
    /// Optional YAML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<String>,
    #[arg(short, long)]
    debug: bool,
}

fn init_logging(config: &Config) -> Result<(), std::io::Error> {
    let default_filter = if config.debug_logs {
        "playlist_generator=debug,tower_http=debug"
    } else {
        "playlist_generator=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.logfile.as_str() {
        "stdout" => registry.with(tracing_subscriber::fmt::layer()).init(),
        "stderr" => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        path => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    config.debug_logs = args.debug;

    if let Err(e) = init_logging(&config) {
        eprintln!("Error: failed to open log file {}: {}", config.logfile, e);
        std::process::exit(1);
    }

    if let Err(e) = playlist_generator::run(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
