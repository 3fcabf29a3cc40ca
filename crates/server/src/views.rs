//! Inline HTML templates. Every interpolated value goes through [`html_escape`].

use ambiance::{RankedMatch, Recommendation, SentimentResult};
use axum::http::StatusCode;

const SITE_NAME: &str = "Ambiance";

const CSS_STYLES: &str = r#"
* { box-sizing: border-box; }
body { font-family: -apple-system, "Hiragino Sans", "Noto Sans JP", sans-serif; margin: 0; background: #faf7f2; color: #2b2b2b; }
.container { max-width: 760px; margin: 0 auto; padding: 2rem 1.25rem; }
h1 { margin-top: 0; }
a.button, button { display: inline-block; background: #b5542d; color: #fff; border: 0; border-radius: 6px; padding: 0.7rem 1.4rem; font-size: 1rem; text-decoration: none; cursor: pointer; }
textarea { width: 100%; min-height: 7rem; padding: 0.75rem; font-size: 1rem; border: 1px solid #ccc; border-radius: 6px; }
.flash { background: #fde8e4; border: 1px solid #e7a594; color: #8a2b14; padding: 0.75rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.card { background: #fff; border-radius: 8px; padding: 1.25rem; margin-bottom: 1.25rem; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
.card img { max-width: 100%; border-radius: 6px; }
.score { font-weight: 600; color: #b5542d; }
.muted { color: #777; font-size: 0.9rem; }
dl { display: grid; grid-template-columns: max-content 1fr; gap: 0.3rem 1rem; }
dt { font-weight: 600; }
dd { margin: 0; }
"#;

/// Escape text for use in element content and quoted attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {SITE_NAME}</title>
    <style>{CSS_STYLES}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#,
        title = html_escape(title),
    )
}

/// Landing page
pub fn landing_page() -> String {
    layout(
        "Welcome",
        r#"        <h1>Find a place that feels right</h1>
        <p>Describe the atmosphere you are in the mood for, lively or quiet, romantic or casual,
        and we will suggest the restaurant whose vibe matches it best.</p>
        <a href="/search" class="button">Start searching</a>"#,
    )
}

/// Search form, with the pending one-shot error if there is one
pub fn search_page(message: Option<&str>) -> String {
    let flash = message
        .map(|m| format!(r#"        <div class="flash" role="alert">{}</div>"#, html_escape(m)))
        .unwrap_or_default();

    layout(
        "Search",
        &format!(
            r#"        <h1>What atmosphere are you looking for?</h1>
{flash}
        <form method="post" action="/recommend">
            <p><label for="atmosphere">Atmosphere</label></p>
            <textarea id="atmosphere" name="atmosphere" placeholder="e.g. 友達とワイワイお酒を飲みたい"></textarea>
            <p><button type="submit">Recommend</button></p>
        </form>
        <p><a href="/">Back to top</a></p>"#
        ),
    )
}

/// Result page for a successful recommendation
pub fn result_page(query: &str, rec: &Recommendation) -> String {
    let runners_up = if rec.runners_up.is_empty() {
        r#"        <p class="muted">No other restaurants to compare.</p>"#.to_string()
    } else {
        rec.runners_up
            .iter()
            .map(runner_up_card)
            .collect::<Vec<_>>()
            .join("\n")
    };

    layout(
        "Recommendation",
        &format!(
            r#"        <h1>Your recommendation</h1>
        <p class="muted">You asked for: {query}</p>
{sentiment}
        <h2>Best match</h2>
{best}
        <h2>Runners-up</h2>
{runners_up}
        <p><a href="/search" class="button">Search again</a></p>"#,
            query = html_escape(query),
            sentiment = sentiment_card(&rec.sentiment),
            best = best_card(&rec.best),
        ),
    )
}

fn best_card(m: &RankedMatch) -> String {
    let r = &m.record;
    format!(
        r#"        <div class="card">
            <h3>{name} <span class="score">similarity {score:.4}</span></h3>
            <img src="{exterior}" alt="Exterior of {name}">
            <p>{atmosphere}</p>
            <dl>
                <dt>Menu</dt><dd>{menu}</dd>
                <dt>Average price</dt><dd>¥{price}</dd>
                <dt>Address</dt><dd>{address}</dd>
                <dt>Customer demographics score</dt><dd>{demographics}</dd>
            </dl>
            <img src="{product}" alt="Dish at {name}">
        </div>"#,
        name = html_escape(&r.name),
        score = m.similarity_score,
        exterior = html_escape(&r.exterior_image_url),
        atmosphere = html_escape(&r.atmosphere_description),
        menu = html_escape(&r.menu_text),
        price = format_yen(r.average_price),
        address = html_escape(&r.address),
        demographics = r.customer_demographics_score,
        product = html_escape(&r.product_image_url),
    )
}

fn runner_up_card(m: &RankedMatch) -> String {
    let r = &m.record;
    format!(
        r#"        <div class="card">
            <h3>{name} <span class="score">similarity {score:.4}</span></h3>
            <p>{atmosphere}</p>
            <p class="muted">¥{price} · {address}</p>
        </div>"#,
        name = html_escape(&r.name),
        score = m.similarity_score,
        atmosphere = html_escape(&r.atmosphere_description),
        price = format_yen(r.average_price),
        address = html_escape(&r.address),
    )
}

fn sentiment_card(s: &SentimentResult) -> String {
    let message = s
        .message
        .as_deref()
        .map(|m| format!(r#"<br><span class="muted">{}</span>"#, html_escape(m)))
        .unwrap_or_default();
    format!(
        r#"        <div class="card">
            <strong>Mood of your request:</strong> {label} <span class="muted">(score {score:.2})</span>{message}
        </div>"#,
        label = s.label,
        score = s.score,
    )
}

/// Error page for failures outside the search flow
pub fn error_page(status: StatusCode, code: &str, message: &str) -> String {
    layout(
        status.canonical_reason().unwrap_or("Error"),
        &format!(
            r#"        <h1>{status}</h1>
        <p>{message}</p>
        <p class="muted">{code}</p>
        <p><a href="/">Back to top</a></p>"#,
            status = html_escape(&status.to_string()),
            message = html_escape(message),
            code = html_escape(code),
        ),
    )
}

/// Thousands separators: 12000 -> "12,000".
fn format_yen(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(html_escape("静かなカフェ ☕"), "静かなカフェ ☕");
    }

    #[test]
    fn yen_grouping() {
        assert_eq!(format_yen(0), "0");
        assert_eq!(format_yen(800), "800");
        assert_eq!(format_yen(1500), "1,500");
        assert_eq!(format_yen(12000), "12,000");
        assert_eq!(format_yen(1_234_567), "1,234,567");
    }

    #[test]
    fn search_page_shows_escaped_message() {
        let page = search_page(Some("<b>oops</b>"));
        assert!(page.contains("&lt;b&gt;oops&lt;/b&gt;"));
        assert!(!page.contains("<b>oops</b>"));
        assert!(!search_page(None).contains("class=\"flash\""));
    }

    #[test]
    fn error_page_mentions_status() {
        let page = error_page(StatusCode::NOT_FOUND, "NOT_FOUND", "Not found");
        assert!(page.contains("404 Not Found"));
        assert!(page.contains("<title>Not Found - Ambiance</title>"));
    }
}
