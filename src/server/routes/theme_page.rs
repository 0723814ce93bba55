use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::{
    auth::Viewer,
    server::{ui, Ctx, HtmlErrorPage},
};

pub async fn handler_theme_page(
    State(ctx): State<Ctx>,
    Path(theme_slug): Path<String>,
    viewer: Viewer,
) -> Result<Html<String>, HtmlErrorPage> {
    let theme = ctx.themes.get(&theme_slug).await?;

    let html = ui::render_theme_page(&theme, &viewer);

    Ok(Html(html))
}
