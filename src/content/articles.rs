use crate::{slug, storage::Storage};

use super::{required, Article, ContentError, Theme};

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default)]
pub struct NewArticle {
    pub title: Option<String>,
    pub body: Option<String>,
    pub slug: Option<String>,
}

/// Replacement title and body. Empty strings are accepted.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default)]
pub struct ArticleEdit {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ArticleService<S> {
    store: S,
}

impl<S> ArticleService<S>
where
    S: Storage + Send + Sync,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Add an article to an existing theme.
    ///
    /// The parent theme is checked before the input, so a request against an
    /// unknown theme reports the theme regardless of its fields.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, theme_slug: &str, input: NewArticle) -> Result<Article, ContentError> {
        let Some(theme) = self.store.theme(theme_slug.to_string()).await? else {
            return Err(ContentError::ThemeNotFound(theme_slug.to_string()));
        };

        let (Some(title), Some(body), Some(raw_slug)) = (
            required(input.title),
            required(input.body),
            required(input.slug),
        ) else {
            return Err(ContentError::MissingFields);
        };

        let slug = slug::article_slug(&raw_slug);
        if slug.is_empty() {
            return Err(ContentError::MissingFields);
        }

        if theme.article(&slug).is_some() {
            return Err(ContentError::ArticleSlugTaken(slug));
        }

        let article = Article { title, body, slug };
        if !self
            .store
            .article_insert(theme_slug.to_string(), article.clone())
            .await?
        {
            // Either a concurrent create took the slug or the theme vanished
            // in between; re-check to tell which.
            return match self.store.theme(theme_slug.to_string()).await? {
                Some(_) => Err(ContentError::ArticleSlugTaken(article.slug)),
                None => Err(ContentError::ThemeNotFound(theme_slug.to_string())),
            };
        }

        tracing::info!(theme = theme_slug, slug = %article.slug, "article created");
        Ok(article)
    }

    /// Load an article and its parent theme.
    pub async fn get(
        &self,
        theme_slug: &str,
        article_slug: &str,
    ) -> Result<(Theme, Article), ContentError> {
        let not_found = || ContentError::ArticleNotFound {
            theme: theme_slug.to_string(),
            article: article_slug.to_string(),
        };

        let theme = self
            .store
            .theme_with_article(theme_slug.to_string(), article_slug.to_string())
            .await?
            .ok_or_else(not_found)?;

        let article = theme.article(article_slug).cloned().ok_or_else(not_found)?;

        Ok((theme, article))
    }

    /// Replace title and body of an existing article. The slug never changes.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        theme_slug: &str,
        article_slug: &str,
        edit: ArticleEdit,
    ) -> Result<(), ContentError> {
        let (Some(title), Some(body)) = (edit.title, edit.body) else {
            return Err(ContentError::MissingFields);
        };

        let matched = self
            .store
            .article_update(
                theme_slug.to_string(),
                article_slug.to_string(),
                title,
                body,
            )
            .await?;

        if !matched {
            return Err(ContentError::ArticleNotFound {
                theme: theme_slug.to_string(),
                article: article_slug.to_string(),
            });
        }

        tracing::info!(theme = theme_slug, slug = article_slug, "article updated");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, theme_slug: &str, article_slug: &str) -> Result<(), ContentError> {
        let matched = self
            .store
            .article_remove(theme_slug.to_string(), article_slug.to_string())
            .await?;

        if !matched {
            return Err(ContentError::NoArticleToDelete {
                theme: theme_slug.to_string(),
                article: article_slug.to_string(),
            });
        }

        tracing::info!(theme = theme_slug, slug = article_slug, "article deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        content::{test_support::fs_store, ErrorKind},
        storage::{Storage, Store},
    };

    async fn setup() -> (ArticleService<Store>, Store, tempfile::TempDir) {
        let (store, dir) = fs_store();
        store
            .theme_insert(Theme::new("Robotics Lab", "robotics_lab"))
            .await
            .unwrap();
        (ArticleService::new(store.clone()), store, dir)
    }

    fn new_article(title: &str, body: &str, slug: &str) -> NewArticle {
        NewArticle {
            title: Some(title.into()),
            body: Some(body.into()),
            slug: Some(slug.into()),
        }
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let (articles, _store, _dir) = setup().await;

        let err = articles.get("robotics_lab", "first-steps").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let created = articles
            .create("robotics_lab", new_article("First Steps", "Hello", "First Steps"))
            .await
            .unwrap();
        assert_eq!(created.slug, "first-steps");

        let (theme, article) = articles.get("robotics_lab", "first-steps").await.unwrap();
        assert_eq!(theme.slug, "robotics_lab");
        assert_eq!(
            article,
            Article {
                title: "First Steps".into(),
                body: "Hello".into(),
                slug: "first-steps".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_create_unknown_theme_checked_first() {
        let (articles, _store, _dir) = setup().await;

        let err = articles
            .create("nope", NewArticle::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No such theme 'nope'");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_missing_fields() {
        let (articles, store, _dir) = setup().await;

        let err = articles
            .create("robotics_lab", new_article("t", "", "s"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let theme = store.theme("robotics_lab".into()).await.unwrap().unwrap();
        assert!(theme.articles.is_empty());
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let (articles, _store, _dir) = setup().await;

        articles
            .create("robotics_lab", new_article("A", "a", "intro"))
            .await
            .unwrap();
        let err = articles
            .create("robotics_lab", new_article("B", "b", "Intro"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let (_, article) = articles.get("robotics_lab", "intro").await.unwrap();
        assert_eq!(article.title, "A");
    }

    #[tokio::test]
    async fn test_same_slug_in_different_themes() {
        let (articles, store, _dir) = setup().await;
        store
            .theme_insert(Theme::new("Other", "other"))
            .await
            .unwrap();

        articles
            .create("robotics_lab", new_article("A", "a", "intro"))
            .await
            .unwrap();
        articles
            .create("other", new_article("B", "b", "intro"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update() {
        let (articles, _store, _dir) = setup().await;
        articles
            .create("robotics_lab", new_article("A", "a", "intro"))
            .await
            .unwrap();

        let err = articles
            .update(
                "robotics_lab",
                "intro",
                ArticleEdit {
                    title: Some("B".into()),
                    body: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        articles
            .update(
                "robotics_lab",
                "intro",
                ArticleEdit {
                    title: Some("B".into()),
                    body: Some(String::new()),
                },
            )
            .await
            .unwrap();

        let (_, article) = articles.get("robotics_lab", "intro").await.unwrap();
        assert_eq!(article.title, "B");
        assert_eq!(article.body, "");
        assert_eq!(article.slug, "intro");
    }

    #[tokio::test]
    async fn test_update_unknown_mutates_nothing() {
        let (articles, store, _dir) = setup().await;
        let before = store.theme_list().await.unwrap();

        let edit = ArticleEdit {
            title: Some("B".into()),
            body: Some("b".into()),
        };
        let err = articles
            .update("robotics_lab", "missing", edit.clone())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot find such article 'robotics_lab'.'missing'"
        );

        let err = articles.update("nope", "missing", edit).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert_eq!(store.theme_list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (articles, _store, _dir) = setup().await;
        articles
            .create("robotics_lab", new_article("A", "a", "intro"))
            .await
            .unwrap();

        articles.delete("robotics_lab", "intro").await.unwrap();

        let err = articles.delete("robotics_lab", "intro").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);

        let err = articles.get("robotics_lab", "intro").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_missing_theme() {
        let (articles, _store, _dir) = setup().await;

        let err = articles.get("nope", "x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Cannot find such article 'nope'.'x'");

        let err = articles.delete("nope", "x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(
            err.to_string(),
            "No such article slug 'x' or no theme with the slug 'nope'"
        );
    }
}
