use cercis::prelude::*;

use crate::{
    auth::Viewer,
    content::{Article, Theme},
    markdown::render_body,
};

use super::{
    article_create_uri, article_page_uri, routes::theme_create::PATH_THEMES, theme_page_uri,
    HtmlError, CLIENT_SCRIPT,
};

const SITE_NAME: &str = "portfolio";

struct UnescapedHtml(String);

impl cercis::html::Render for UnescapedHtml {
    fn render(&self) -> String {
        self.0.clone()
    }
}

/// Loads the editing script with the verified token attached.
#[component]
fn ClientScript<'a>(viewer: &'a Viewer) -> Element {
    if let Some(token) = &viewer.token {
        rsx! {
            script {
                src: "{CLIENT_SCRIPT}",
                "data-token": "{token}",
                defer: "true",
            }
        }
    } else {
        rsx! {}
    }
}

#[component]
pub fn PageLayout<'a>(title: &'a str, viewer: &'a Viewer, children: Element<'a>) -> Element {
    rsx! {
        html {
            head {
                meta {
                    charset: "utf-8",
                }
                link {
                    rel: "stylesheet",
                    href: "https://cdn.jsdelivr.net/npm/bulma@1.0.1/css/bulma.min.css",
                }

                title {
                    "{title}"
                }
            }

            body {
                NavBar {}

                section {
                    class: "section",
                    children
                }

                footer {
                    class: "footer",
                    div {
                        class: "content has-text-centered",
                        p {
                            "{SITE_NAME}"
                        }
                    }
                }

                ClientScript {
                    viewer: viewer,
                }
            }
        }
    }
}

#[component]
fn NavBar() -> Element {
    rsx! {
        nav {
            class: "navbar",
            role: "navigation",
            aria_label: "main navigation",

            div {
                class: "navbar-brand",

                a {
                    class: "navbar-item",
                    href: "/",
                    "{SITE_NAME}"
                }
            }

            div {
                class: "navbar-menu",

                div {
                    class: "navbar-start",
                    a {
                        class: "navbar-item",
                        href: "/",
                        "Themes"
                    }
                }
            }
        }
    }
}

#[component]
fn ThemeCreateForm() -> Element {
    rsx! {
        form {
            id: "theme-create-form",
            class: "box",
            "data-endpoint": "{PATH_THEMES}",
            "data-method": "POST",

            h4 {
                class: "title is-4",
                "New theme"
            }

            div {
                class: "field",
                label {
                    class: "label",
                    "Name"
                }
                input {
                    class: "input",
                    name: "themeName",
                    r#type: "text",
                }
            }

            div {
                class: "field",
                label {
                    class: "label",
                    "Slug"
                }
                input {
                    class: "input",
                    name: "themeSlug",
                    r#type: "text",
                }
            }

            button {
                class: "button is-primary",
                r#type: "submit",
                "Create"
            }
        }
    }
}

#[component]
fn ThemeList<'a>(themes: &'a [Theme], viewer: &'a Viewer) -> Element {
    let create_form = if viewer.is_authenticated() {
        rsx! {
            ThemeCreateForm {}
        }
    } else {
        rsx! {}
    };

    rsx! {
        div {
            h1 {
                class: "title is-1",
                "Themes"
            }

            if themes.is_empty() {
                p {
                    class: "notification",
                    "No themes yet."
                }
            } else {
            }

            div {
                class: "columns is-multiline",

                for theme in themes.iter() {
                    ThemeBox {
                        theme: theme,
                    }
                }
            }

            create_form
        }
    }
}

fn article_count(count: usize) -> String {
    match count {
        1 => "1 article".to_string(),
        n => format!("{} articles", n),
    }
}

#[component]
fn ThemeBox<'a>(theme: &'a Theme) -> Element {
    let link = theme_page_uri(&theme.slug);
    let count = article_count(theme.articles.len());

    rsx! {
        div {
            class: "column is-one-third",
            div {
                class: "box",

                a {
                    href: "{link}",
                    class: "has-text-black is-underlined",
                    style: "font-size: 1.4rem;",
                    "{theme.name}"
                }

                p {
                    class: "mt-2",
                    "{count}"
                }
            }
        }
    }
}

pub fn render_theme_list(themes: &[Theme], viewer: &Viewer) -> String {
    rsx! {
        PageLayout {
            title: "Themes",
            viewer: viewer,
            ThemeList {
                themes: themes,
                viewer: viewer,
            }
        }
    }
    .render()
}

#[component]
fn ArticleCreateForm<'a>(theme: &'a Theme) -> Element {
    let endpoint = article_create_uri(&theme.slug);
    let delete_endpoint = theme_page_uri(&theme.slug);

    rsx! {
        form {
            id: "article-create-form",
            class: "box",
            "data-endpoint": "{endpoint}",
            "data-method": "POST",

            h4 {
                class: "title is-4",
                "New article"
            }

            div {
                class: "field",
                label {
                    class: "label",
                    "Title"
                }
                input {
                    class: "input",
                    name: "title",
                    r#type: "text",
                }
            }

            div {
                class: "field",
                label {
                    class: "label",
                    "Slug"
                }
                input {
                    class: "input",
                    name: "slug",
                    r#type: "text",
                }
            }

            div {
                class: "field",
                label {
                    class: "label",
                    "Body"
                }
                textarea {
                    class: "textarea",
                    name: "body",
                }
            }

            div {
                class: "buttons",
                button {
                    class: "button is-primary",
                    r#type: "submit",
                    "Create"
                }
                button {
                    id: "theme-delete",
                    class: "button is-danger is-outlined",
                    r#type: "button",
                    "data-endpoint": "{delete_endpoint}",
                    "data-method": "DELETE",
                    "data-redirect": "/",
                    "Delete theme"
                }
            }
        }
    }
}

#[component]
fn ThemeDetail<'a>(theme: &'a Theme, viewer: &'a Viewer) -> Element {
    let editor = if viewer.is_authenticated() {
        rsx! {
            ArticleCreateForm {
                theme: theme,
            }
        }
    } else {
        rsx! {}
    };

    rsx! {
        div {
            h1 {
                class: "title is-1",
                "{theme.name}"
            }

            div {
                class: "box",

                if theme.articles.is_empty() {
                    p {
                        "No articles yet."
                    }
                } else {
                }

                ul {
                    for article in theme.articles.values() {
                        li {
                            a {
                                href: "{article_page_uri(&theme.slug, &article.slug)}",
                                "{article.title}"
                            }
                        }
                    }
                }
            }

            editor
        }
    }
}

pub fn render_theme_page(theme: &Theme, viewer: &Viewer) -> String {
    rsx! {
        PageLayout {
            title: &theme.name,
            viewer: viewer,
            ThemeDetail {
                theme: theme,
                viewer: viewer,
            }
        }
    }
    .render()
}

/// Editor initialised with the stored title and body.
#[component]
fn ArticleEditor<'a>(theme: &'a Theme, article: &'a Article) -> Element {
    let endpoint = article_page_uri(&theme.slug, &article.slug);
    let theme_link = theme_page_uri(&theme.slug);

    rsx! {
        form {
            id: "article-edit-form",
            class: "box",
            "data-endpoint": "{endpoint}",
            "data-method": "PUT",

            div {
                class: "field",
                label {
                    class: "label",
                    "Title"
                }
                input {
                    class: "input",
                    name: "title",
                    r#type: "text",
                    value: "{article.title}",
                }
            }

            div {
                class: "field",
                label {
                    class: "label",
                    "Body"
                }
                textarea {
                    class: "textarea wysiwyg",
                    name: "body",
                    rows: "20",
                    "{article.body}"
                }
            }

            div {
                class: "buttons",
                button {
                    class: "button is-primary",
                    r#type: "submit",
                    "Save"
                }
                button {
                    id: "article-delete",
                    class: "button is-danger is-outlined",
                    r#type: "button",
                    "data-endpoint": "{endpoint}",
                    "data-method": "DELETE",
                    "data-redirect": "{theme_link}",
                    "Delete article"
                }
            }
        }
    }
}

#[component]
fn ArticleDetail<'a>(theme: &'a Theme, article: &'a Article, viewer: &'a Viewer) -> Element {
    let theme_link = theme_page_uri(&theme.slug);

    let content = if viewer.is_authenticated() {
        rsx! {
            ArticleEditor {
                theme: theme,
                article: article,
            }
        }
    } else {
        let article_html = UnescapedHtml(render_body(&article.body));
        rsx! {
            div {
                class: "box content",
                article_html
            }
        }
    };

    rsx! {
        div {
            nav {
                class: "breadcrumb",
                aria_label: "breadcrumbs",
                ul {
                    li {
                        a {
                            href: "{theme_link}",
                            "{theme.name}"
                        }
                    }
                    li {
                        class: "is-active",
                        a {
                            href: "#",
                            "{article.title}"
                        }
                    }
                }
            }

            h1 {
                class: "title is-1",
                "{article.title}"
            }

            content
        }
    }
}

pub fn render_article_page(theme: &Theme, article: &Article, viewer: &Viewer) -> String {
    rsx! {
        PageLayout {
            title: &article.title,
            viewer: viewer,
            ArticleDetail {
                theme: theme,
                article: article,
                viewer: viewer,
            }
        }
    }
    .render()
}

#[component]
fn HtmlErrorView<'a>(error: &'a HtmlError) -> Element {
    let details = if let Some(err) = &error.source {
        let content = format!("{:#?}", err);

        rsx! {
            hr {}
            pre {
                "{content}"
            }
        }
    } else {
        rsx! {}
    };

    rsx! {
        p {
            class: "notification is-danger",

            "{error.message}"

            details
        }
    }
}

pub fn render_html_error_page(error: &HtmlError) -> String {
    let viewer = Viewer::default();
    let output = rsx! {
        PageLayout {
            title: "Error",
            viewer: &viewer,
            HtmlErrorView {
                error: error,
            }
        }
    };
    output.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_count() {
        assert_eq!(article_count(0), "0 articles");
        assert_eq!(article_count(1), "1 article");
        assert_eq!(article_count(12), "12 articles");
    }

    #[test]
    fn test_theme_box_count() {
        let mut theme = Theme::new("Robotics Lab", "robotics_lab");
        theme.articles.insert(
            "intro".to_string(),
            Article {
                title: "Intro".to_string(),
                body: String::new(),
                slug: "intro".to_string(),
            },
        );

        let html = render_theme_list(&[theme], &Viewer::default());
        assert!(html.contains("1 article<"));
    }
}
