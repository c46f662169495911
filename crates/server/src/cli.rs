use clap::Parser;
use common::Config;

/// Serves the current top stories as a single HTML page.
///
/// Everything else is configured through the environment (`HN_API_BASE`,
/// `CACHE_TTL_SECS`, `REFRESH_INTERVAL_SECS`, `FETCH_TIMEOUT_SECS`, `OVER_FETCH`).
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Port to start the web server on [env: PORT, default: 8080]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Number of top stories to display [env: NUM_STORIES, default: 30]
    #[arg(short, long)]
    pub num_stories: Option<usize>,
}

impl Cli {
    /// Flags win over the environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(num_stories) = self.num_stories {
            config.num_stories = num_stories;
        }
    }
}
