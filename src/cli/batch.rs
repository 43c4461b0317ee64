//! Multi-region feed command

use std::collections::BTreeMap;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;
use trendscope::{
    BatchMode, BatchResults, Completion, Error, FetchError, ProgressObserver, Result, TrendRecord,
};

use crate::cli::OutputFormat;
use crate::cli::args::{FeedArgs, GlobalOptions};
use crate::cli::context::CommandContext;
use crate::output::{json::format_json, pretty, table::format_table};

/// Batch scheduling flags, as given
pub struct BatchArgs<'a> {
    pub geos: &'a [String],
    pub concurrency: Option<usize>,
    pub serial: bool,
    pub delay_ms: Option<u64>,
    pub no_progress: bool,
    pub feed: &'a FeedArgs,
}

/// Progress bar advanced once per finished region
struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }
}

impl ProgressObserver for BarObserver {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_complete(&self, event: &Completion<'_>) {
        match event.error {
            None => self.bar.set_message(event.target.to_string()),
            Some(_) => self.bar.set_message(format!("{} failed", event.target)),
        }
        self.bar.inc(1);
    }

    fn on_finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Outcome<'a> {
    Ok { records: &'a [TrendRecord] },
    Err { error: ErrorInfo },
}

#[derive(Serialize)]
struct ErrorInfo {
    kind: &'static str,
    message: String,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "GEO")]
    geo: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "TOPICS")]
    topics: String,
    #[tabled(rename = "ERROR")]
    error: String,
}

fn render(results: &BatchResults<Vec<TrendRecord>>, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            let map: BTreeMap<&str, Outcome<'_>> = results
                .iter()
                .map(|(geo, outcome)| {
                    let outcome = match outcome {
                        Ok(records) => Outcome::Ok { records },
                        Err(e) => Outcome::Err {
                            error: ErrorInfo {
                                kind: e.kind(),
                                message: e.to_string(),
                            },
                        },
                    };
                    (geo, outcome)
                })
                .collect();
            format_json(&map)?
        }
        OutputFormat::Table => {
            let rows: Vec<OutcomeRow> = results
                .iter()
                .map(|(geo, outcome)| match outcome {
                    Ok(records) => OutcomeRow {
                        geo: geo.to_string(),
                        status: "ok".to_string(),
                        topics: records
                            .iter()
                            .map(|r| r.topic.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                        error: String::new(),
                    },
                    Err(e) => OutcomeRow {
                        geo: geo.to_string(),
                        status: e.kind().to_string(),
                        topics: String::new(),
                        error: e.to_string(),
                    },
                })
                .collect();
            format_table(&rows)
        }
        OutputFormat::Pretty => {
            let mut out = Vec::new();
            for (geo, outcome) in results.iter() {
                match outcome {
                    Ok(records) => {
                        out.push(format!("{}", geo.bold().underline()));
                        out.push(pretty::trends(records));
                    }
                    Err(e) => out.push(format!("{} {}", geo.bold().underline(), e.to_string().red())),
                }
                out.push(String::new());
            }
            out.push(format!(
                "{} succeeded, {} failed",
                results.succeeded().to_string().green(),
                results.failed().to_string().red()
            ));
            out.join("\n")
        }
    })
}

/// Run the batch command.
///
/// Per-region failures are reported but only fail the command when every
/// region failed.
pub async fn run(opts: &GlobalOptions, args: BatchArgs<'_>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let mode = if args.serial {
        BatchMode::Serial {
            delay: args
                .delay_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| ctx.config.batch_delay()),
        }
    } else {
        BatchMode::Concurrent {
            max_concurrent: args.concurrency.unwrap_or(ctx.config.batch.max_concurrent),
        }
    };

    let params = args
        .feed
        .to_params(&ctx.config.defaults.geo, ctx.config.defaults.max_articles);

    let observer = (!args.no_progress && ctx.format != OutputFormat::Json).then(BarObserver::new);
    let results = ctx
        .fetcher
        .fetch_feed_batch(
            args.geos,
            &params,
            mode,
            observer.as_ref().map(|o| o as &dyn ProgressObserver),
            ctx.use_cache,
        )
        .await?;
    ctx.log_cache_stats();

    println!("{}", render(&results, ctx.format)?);

    if results.succeeded() == 0 {
        let first = results
            .failures()
            .next()
            .map(|(_, e)| e.clone())
            .unwrap_or_else(|| FetchError::Download("no results".to_string()));
        return Err(Error::Other(format!(
            "All {} regions failed (first error: {})",
            results.len(),
            first
        )));
    }
    Ok(())
}
