use axum::{extract::State, http::StatusCode, Json};

use crate::{
    content::themes::NewTheme,
    server::{theme_page_uri, ApiError, ApiReply, Ctx},
};

pub const PATH_THEMES: &str = "/themes";

/// Request fields echoed back in the reply.
#[derive(serde::Serialize)]
struct Echo {
    name: Option<String>,
    slug: Option<String>,
}

pub async fn handler_theme_create(
    State(ctx): State<Ctx>,
    input: Option<Json<NewTheme>>,
) -> Result<ApiReply, ApiError> {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let echo = Echo {
        name: input.name.clone(),
        slug: input.slug.clone(),
    };

    let theme = match ctx.themes.create(input).await {
        Ok(theme) => theme,
        Err(err) => return Err(ApiError::from(err).echo(&echo)),
    };

    let link = theme_page_uri(&theme.slug);

    Ok(ApiReply::new(StatusCode::CREATED)
        .echo(&echo)
        .msg("Successful")
        .field("themeDetailLink", link.clone())
        .field("themeDeleteLink", link))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::server::test_client;

    #[tokio::test]
    async fn test_create_theme_normalizes_slug() {
        let (client, _dir) = test_client().await;

        let res = client
            .post("/themes")
            .json(&json!({ "themeName": "Robotics Lab", "themeSlug": "Robotics Lab!" }))
            .send()
            .await;
        assert_eq!(res.status().as_u16(), 201);

        let body: serde_json::Value = res.json().await;
        assert_eq!(
            body,
            json!({
                "name": "Robotics Lab",
                "slug": "Robotics Lab!",
                "msg": "Successful",
                "themeDetailLink": "/themes/robotics_lab",
                "themeDeleteLink": "/themes/robotics_lab",
            })
        );

        let res = client.get("/api/themes/robotics_lab").send().await;
        assert_eq!(res.status().as_u16(), 200);
        let body: serde_json::Value = res.json().await;
        assert_eq!(
            body,
            json!({ "name": "Robotics Lab", "slug": "robotics_lab", "articles": {} })
        );
    }

    #[tokio::test]
    async fn test_create_theme_conflict_leaves_store_unchanged() {
        let (client, _dir) = test_client().await;

        let res = client
            .post("/themes")
            .json(&json!({ "themeName": "Robotics Lab", "themeSlug": "robotics lab" }))
            .send()
            .await;
        assert_eq!(res.status().as_u16(), 201);

        let res = client
            .post("/themes")
            .json(&json!({ "themeName": "Impostor", "themeSlug": "Robotics-Lab" }))
            .send()
            .await;
        assert_eq!(res.status().as_u16(), 400);
        let body: serde_json::Value = res.json().await;
        assert_eq!(body["err"], "Slug 'robotics_lab' is used already.");
        assert_eq!(body["name"], "Impostor");

        let res = client.get("/api/themes").send().await;
        let body: serde_json::Value = res.json().await;
        assert_eq!(
            body,
            json!([{ "name": "Robotics Lab", "slug": "robotics_lab", "articles": {} }])
        );
    }

    #[tokio::test]
    async fn test_create_theme_missing_fields() {
        let (client, _dir) = test_client().await;

        let res = client
            .post("/themes")
            .json(&json!({ "themeName": "Robotics Lab" }))
            .send()
            .await;
        assert_eq!(res.status().as_u16(), 400);
        let body: serde_json::Value = res.json().await;
        assert_eq!(
            body,
            json!({
                "name": "Robotics Lab",
                "slug": null,
                "err": "Some fields are not provided",
            })
        );

        // No JSON body at all.
        let res = client.post("/themes").send().await;
        assert_eq!(res.status().as_u16(), 400);
    }
}
