//! trendscope CLI - trending topics and explore exports

use clap::Parser;

mod cli;
mod output;

use cli::args::GlobalOptions;
use cli::{Cli, Commands, ConfigCommands};
use trendscope::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `--debug` forces debug level; otherwise `RUST_LOG`, defaulting to warn
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Feed { geo, feed } => cli::feed::run(&opts, geo.as_deref(), &feed).await,
        Commands::Batch {
            geos,
            concurrency,
            serial,
            delay_ms,
            no_progress,
            feed,
        } => {
            cli::batch::run(
                &opts,
                cli::batch::BatchArgs {
                    geos: &geos,
                    concurrency,
                    serial,
                    delay_ms,
                    no_progress,
                    feed: &feed,
                },
            )
            .await
        }
        Commands::Explore {
            queries,
            geo,
            date_range,
            category,
            language,
            sections,
        } => {
            cli::explore::run(
                &opts,
                cli::explore::ExploreArgs {
                    queries: &queries,
                    geo: geo.as_deref(),
                    date_range: &date_range,
                    category: category.as_deref(),
                    language: &language,
                    sections: &sections,
                },
            )
            .await
        }
        Commands::Sections { file, sections } => cli::sections::run(&opts, &file, &sections),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show { strict } => cli::config::show(&opts, strict),
            ConfigCommands::Init { force } => cli::config::init(&opts, force),
            ConfigCommands::Path => cli::config::path(&opts),
        },
    }
}
