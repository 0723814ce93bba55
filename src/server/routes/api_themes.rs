use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    content::{ContentError, ErrorKind, Theme},
    server::{ApiError, Ctx},
};

pub const PATH_API_THEMES: &str = "/api/themes";

pub async fn handler_api_theme_list(State(ctx): State<Ctx>) -> Result<Json<Vec<Theme>>, ApiError> {
    let themes = ctx.themes.list().await?;

    Ok(Json(themes))
}

pub async fn handler_api_theme(
    State(ctx): State<Ctx>,
    Path(theme_slug): Path<String>,
) -> Result<Json<Theme>, ApiError> {
    let theme = ctx.themes.get(&theme_slug).await.map_err(read_error)?;

    Ok(Json(theme))
}

fn read_error(err: ContentError) -> ApiError {
    match err.kind() {
        ErrorKind::NotFound => ApiError::msg(err.to_string(), StatusCode::NOT_FOUND),
        _ => ApiError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use crate::server::test_client;

    #[tokio::test]
    async fn test_api_theme_not_found() {
        let (client, _dir) = test_client().await;

        let res = client.get("/api/themes/nope").send().await;
        assert_eq!(res.status().as_u16(), 404);

        let body: serde_json::Value = res.json().await;
        assert_eq!(body["err"], "No such theme 'nope'");
    }

    #[tokio::test]
    async fn test_api_theme_list_empty() {
        let (client, _dir) = test_client().await;

        let res = client.get("/api/themes").send().await;
        assert_eq!(res.status().as_u16(), 200);
        let body: serde_json::Value = res.json().await;
        assert_eq!(body, serde_json::json!([]));
    }
}
