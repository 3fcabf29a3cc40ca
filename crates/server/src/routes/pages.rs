use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::error::ServerResult;
use crate::flash::Flash;
use crate::state::AppState;
use crate::views;

/// Shown on the search page after an empty submission.
pub const EMPTY_QUERY_MESSAGE: &str = "Please describe the atmosphere you are looking for.";

/// Form body of `POST /recommend`.
#[derive(Debug, Deserialize)]
pub struct RecommendForm {
    #[serde(default)]
    pub atmosphere: String,
}

/// GET /
pub async fn landing() -> Html<String> {
    Html(views::landing_page())
}

/// GET /search
pub async fn search_form(flash: Flash) -> ServerResult<Html<String>> {
    let message = flash.take().await?;
    Ok(Html(views::search_page(message.as_deref())))
}

/// POST /recommend
///
/// A blank or unreadable form, a pipeline failure and running past the
/// request timeout all end in a redirect to `/search` with a one-shot message.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    flash: Flash,
    form: Result<Form<RecommendForm>, FormRejection>,
) -> ServerResult<Response> {
    let atmosphere = match form {
        Ok(Form(form)) => form.atmosphere,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable recommend form");
            String::new()
        }
    };

    if atmosphere.trim().is_empty() {
        flash.set(EMPTY_QUERY_MESSAGE).await?;
        return Ok(Redirect::to("/search").into_response());
    }

    let outcome = match tokio::time::timeout(
        state.config.timeout(),
        state.recommender.recommend(&atmosphere),
    )
    .await
    {
        Ok(result) => result.map_err(|err| err.to_string()),
        Err(_) => Err(format!("no result within {}s", state.config.timeout_secs)),
    };

    match outcome {
        Ok(recommendation) => {
            tracing::info!(
                best = %recommendation.best.record.name,
                score = recommendation.best.similarity_score,
                sentiment = %recommendation.sentiment.label,
                "Recommendation served"
            );
            Ok(Html(views::result_page(&atmosphere, &recommendation)).into_response())
        }
        Err(err) => {
            tracing::warn!(error = %err, "Recommendation failed");
            flash.set(format!("search failed: {err}")).await?;
            Ok(Redirect::to("/search").into_response())
        }
    }
}
