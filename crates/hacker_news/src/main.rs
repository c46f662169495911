use anyhow::Result;
use common::Config;
use hacker_news::StoryProvider;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Assembles the current front page once and prints it, bypassing the cache.
#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    let api = hacker_news::HackerNewsAPI::new(&config.api_base)?;
    let assembler = hacker_news::Assembler::new(
        std::sync::Arc::new(api),
        config.fetch_timeout,
        config.over_fetch,
    );

    let started = std::time::Instant::now();
    let stories = assembler.top_stories(config.num_stories).await?;
    info!("Assembled {} stories in {:?}", stories.len(), started.elapsed());

    for (rank, story) in stories.iter().enumerate() {
        println!("{:>3}. {}", rank + 1, story.to_line());
    }

    Ok(())
}
