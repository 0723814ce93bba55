use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    content::ContentError,
    server::{ApiError, ApiReply, Ctx},
};

pub async fn handler_theme_delete(
    State(ctx): State<Ctx>,
    Path(theme_slug): Path<String>,
) -> Result<ApiReply, ApiError> {
    match ctx.themes.delete(&theme_slug).await {
        Ok(count) => Ok(ApiReply::new(StatusCode::ACCEPTED)
            .field("delCount", count)
            .msg("Successful.")),
        Err(err @ ContentError::NothingToDelete(_)) => {
            Err(ApiError::from(err).field("delCount", 0))
        }
        Err(err) => Err(err.into()),
    }
}
