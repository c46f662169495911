use std::fmt::Write;
use std::time::Duration;

use common::{StoryError, StoryResult};
use hacker_news::DisplayStory;
use html_escape::{encode_double_quoted_attribute, encode_text};
use time::OffsetDateTime;

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Top Stories</title>
  <style>
    body { font-family: Verdana, Geneva, sans-serif; max-width: 960px; margin: 0 auto; }
    li { padding: 4px 0; }
    .host, .meta, .footer { color: #828282; font-size: 0.85em; }
  </style>
</head>
<body>
  <h1>Top Stories</h1>
  <ol>
"#;

const TAIL: &str = "</body>\n</html>\n";

/// Renders the page for `stories`; `elapsed` is how long the request took to serve.
pub fn render_page(
    stories: &[DisplayStory],
    elapsed: Duration,
    now: OffsetDateTime,
) -> StoryResult<String> {
    let mut page = String::with_capacity(HEAD.len() + stories.len() * 320);
    page.push_str(HEAD);

    for story in stories {
        write_story(&mut page, story, now).map_err(|e| StoryError::Render(e.to_string()))?;
    }

    write!(
        page,
        "  </ol>\n  <p class=\"footer\">This page was rendered in {:?}</p>\n",
        elapsed
    )
    .map_err(|e| StoryError::Render(e.to_string()))?;
    page.push_str(TAIL);
    Ok(page)
}

fn write_story(page: &mut String, story: &DisplayStory, now: OffsetDateTime) -> std::fmt::Result {
    let item = &story.item;
    write!(
        page,
        "    <li><a href=\"{}\">{}</a>",
        encode_double_quoted_attribute(item.link()),
        encode_text(&item.title)
    )?;
    if !story.host.is_empty() {
        write!(page, " <span class=\"host\">({})</span>", encode_text(&story.host))?;
    }
    writeln!(
        page,
        "<br><span class=\"meta\">{} points by {} {} | {} comments</span></li>",
        item.score,
        encode_text(&item.by),
        relative_age(item.time, now),
        item.descendants
    )
}

/// Human age of a unix timestamp relative to `now`.
pub fn relative_age(posted: i64, now: OffsetDateTime) -> String {
    let secs = (now.unix_timestamp() - posted).max(0);
    let (amount, unit) = match secs {
        s if s < 60 => return "just now".to_string(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s => (s / 86_400, "day"),
    };
    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}
