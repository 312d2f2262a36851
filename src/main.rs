use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use popcorn::config::Config;

#[derive(Parser, Debug)]
#[command(name = "popcorn")]
#[command(about = "Search movies and keep a rated list of what you watched", long_about = None)]
struct Args {
    /// YAML config file
    #[arg(short, long)]
    config: Option<String>,
    /// OMDb API key, overrides OMDB_API_KEY
    #[arg(long)]
    api_key: Option<String>,
    /// Where the watched list is stored
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Search to start with
    #[arg(short, long)]
    query: Option<String>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "popcorn=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(key) = args.api_key {
        config.set_api_key(key);
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(query) = args.query {
        config.initial_query = query;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("popcorn-net")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start network runtime: {}", e);
            std::process::exit(1);
        }
    };

    popcorn::ui::run(config, runtime.handle().clone());
}
