use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use moviedash::dashboard::render_pass;
use moviedash::data::{DEFAULT_SOURCE, DataSource};
use moviedash::server::{self, DEFAULT_ADDR, DashboardConfig};
use moviedash::sidebar::SelectionInput;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Interactive movies dashboard
#[derive(Parser, Debug)]
#[command(name = "moviedash", version, about, long_about = None)]
struct Cli {
    /// CSV source: an http(s) URL or a local path
    #[arg(long, global = true, default_value = DEFAULT_SOURCE)]
    source: String,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboard over HTTP (default)
    Serve {
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
    },
    /// Run one render pass and print the result tables
    Report {
        #[arg(long)]
        year: Option<String>,

        /// Genre to include; repeat for several. Omit for the preset.
        #[arg(long = "genre", conflicts_with = "no_genres")]
        genres: Vec<String>,

        /// Select no genres at all, leaving the movie list empty
        #[arg(long)]
        no_genres: bool,

        #[arg(long)]
        score_min: Option<f64>,

        #[arg(long)]
        score_max: Option<f64>,
    },
}

/// `None` keeps the preset, `Some(vec![])` is an explicit empty selection.
fn report_genres(genres: Vec<String>, no_genres: bool) -> Option<Vec<String>> {
    if no_genres {
        Some(Vec::new())
    } else {
        (!genres.is_empty()).then_some(genres)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
    debug!(
        threads = polars_core::POOL.current_num_threads(),
        "polars thread pool"
    );

    let source = DataSource::from(cli.source.as_str());
    let command = cli.command.unwrap_or(Command::Serve {
        addr: DEFAULT_ADDR.parse()?,
    });

    match command {
        Command::Serve { addr } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(DashboardConfig { source, addr }))?;
        }
        Command::Report {
            year,
            genres,
            no_genres,
            score_min,
            score_max,
        } => {
            let input = SelectionInput {
                score_min,
                score_max,
                genres: report_genres(genres, no_genres),
                year,
            };
            let dashboard = render_pass(&source, &input)?;
            let selection = &dashboard.selection;

            println!(
                "year {:?}, genres {:?}, score {:.1}..={:.1}",
                selection.year, selection.genres, selection.score_range.0, selection.score_range.1
            );
            println!("{}", dashboard.movies);
            println!("{}", dashboard.score_counts);
            println!("{}", dashboard.budget_means);
        }
    }
    Ok(())
}
