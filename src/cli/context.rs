//! Command execution context
//!
//! Loads configuration and builds the fetcher once for commands that talk
//! to the network.

use trendscope::{Config, DefaultFetcher, Result, default_fetcher};

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;

/// Context for command execution containing config, fetcher and runtime options.
pub struct CommandContext {
    pub config: Config,
    pub fetcher: DefaultFetcher,
    pub format: OutputFormat,
    /// False under `--no-cache`
    pub use_cache: bool,
}

impl CommandContext {
    /// Load config (defaults when the file is absent) and build the fetcher.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_or_default(opts.config.as_deref())?;
        let fetcher = default_fetcher(&config)?;

        Ok(Self {
            config,
            fetcher,
            format: opts.format,
            use_cache: !opts.no_cache,
        })
    }

    /// Log cache counters at debug level
    pub fn log_cache_stats(&self) {
        let stats = self.fetcher.cache().stats();
        log::debug!(
            "Cache: {} hits, {} misses, {} evictions, {}/{} entries, ttl {}s, hit rate {:.2}",
            stats.hits,
            stats.misses,
            stats.evictions,
            stats.size,
            stats.max_size,
            stats.ttl_secs,
            stats.hit_rate()
        );
    }
}
