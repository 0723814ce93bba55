use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    content::articles::ArticleEdit,
    server::{ApiError, ApiReply, Ctx},
};

pub async fn handler_article_update(
    State(ctx): State<Ctx>,
    Path((theme_slug, article_slug)): Path<(String, String)>,
    input: Option<Json<ArticleEdit>>,
) -> Result<ApiReply, ApiError> {
    let edit = input.map(|Json(edit)| edit).unwrap_or_default();

    ctx.articles
        .update(&theme_slug, &article_slug, edit)
        .await?;

    Ok(ApiReply::new(StatusCode::ACCEPTED).msg("Successful"))
}
