use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    content::{articles::NewArticle, ContentError},
    server::{ApiError, ApiReply, Ctx},
};

/// Request fields echoed back in the reply.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Echo {
    title: Option<String>,
    body: Option<String>,
    article_slug: Option<String>,
    theme_slug: String,
}

pub async fn handler_article_create(
    State(ctx): State<Ctx>,
    Path(theme_slug): Path<String>,
    input: Option<Json<NewArticle>>,
) -> Result<ApiReply, ApiError> {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let echo = Echo {
        title: input.title.clone(),
        body: input.body.clone(),
        article_slug: input.slug.clone(),
        theme_slug: theme_slug.clone(),
    };

    match ctx.articles.create(&theme_slug, input).await {
        Ok(article) => Ok(ApiReply::new(StatusCode::CREATED)
            .echo(&echo)
            .field("correctArticleSlug", article.slug)
            .msg("Successful")),
        Err(err) => {
            let normalized = match &err {
                ContentError::ArticleSlugTaken(slug) => Some(slug.clone()),
                _ => None,
            };

            let mut api_err = ApiError::from(err).echo(&echo);
            if let Some(slug) = normalized {
                api_err = api_err.field("correctArticleSlug", slug);
            }
            Err(api_err)
        }
    }
}
