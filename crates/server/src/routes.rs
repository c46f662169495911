use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use hacker_news::{StoryCache, StoryProvider};
use time::OffsetDateTime;
use tracing::{error, info};

use crate::render::render_page;

pub fn router<P>(cache: Arc<StoryCache<P>>) -> Router
where
    P: StoryProvider + 'static,
{
    Router::new().route("/", get(index::<P>)).with_state(cache)
}

async fn index<P>(State(cache): State<Arc<StoryCache<P>>>) -> Response
where
    P: StoryProvider + 'static,
{
    let start = Instant::now();

    let stories = match cache.stories().await {
        Ok(stories) => stories,
        Err(e) => {
            error!("Failed to load top stories: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match render_page(&stories, start.elapsed(), OffsetDateTime::now_utc()) {
        Ok(page) => {
            info!("Served {} stories in {:?}", stories.len(), start.elapsed());
            Html(page).into_response()
        }
        Err(e) => {
            error!("Failed to process the template: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process the template").into_response()
        }
    }
}
