use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::server::{ApiError, ApiReply, Ctx};

pub async fn handler_article_delete(
    State(ctx): State<Ctx>,
    Path((theme_slug, article_slug)): Path<(String, String)>,
) -> Result<ApiReply, ApiError> {
    ctx.articles.delete(&theme_slug, &article_slug).await?;

    Ok(ApiReply::new(StatusCode::OK).msg("Successful"))
}
