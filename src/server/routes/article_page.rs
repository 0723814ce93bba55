use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::{
    auth::Viewer,
    server::{ui, Ctx, HtmlErrorPage},
};

pub async fn handler_article_page(
    State(ctx): State<Ctx>,
    Path((theme_slug, article_slug)): Path<(String, String)>,
    viewer: Viewer,
) -> Result<Html<String>, HtmlErrorPage> {
    let (theme, article) = ctx.articles.get(&theme_slug, &article_slug).await?;

    let html = ui::render_article_page(&theme, &article, &viewer);

    Ok(Html(html))
}
