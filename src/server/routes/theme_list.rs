use axum::{extract::State, response::Html};

use crate::{
    auth::Viewer,
    server::{ui, Ctx, HtmlErrorPage},
};

pub async fn handler_theme_list(
    State(ctx): State<Ctx>,
    viewer: Viewer,
) -> Result<Html<String>, HtmlErrorPage> {
    let themes = ctx.themes.list().await?;

    let html = ui::render_theme_list(&themes, &viewer);

    Ok(Html(html))
}
