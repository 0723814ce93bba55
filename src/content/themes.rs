use crate::{slug, storage::Storage};

use super::{required, ContentError, Theme};

/// Input of theme creation. Absent fields are validation failures.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default)]
pub struct NewTheme {
    #[serde(rename = "themeName")]
    pub name: Option<String>,
    #[serde(rename = "themeSlug")]
    pub slug: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ThemeService<S> {
    store: S,
}

impl<S> ThemeService<S>
where
    S: Storage + Send + Sync,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Theme>, ContentError> {
        Ok(self.store.theme_list().await?)
    }

    /// Create a theme under the normalized form of the requested slug.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, input: NewTheme) -> Result<Theme, ContentError> {
        let (Some(name), Some(raw_slug)) = (required(input.name), required(input.slug)) else {
            return Err(ContentError::MissingFields);
        };

        let slug = slug::theme_slug(&raw_slug);
        if slug.is_empty() {
            return Err(ContentError::MissingFields);
        }

        if self.store.theme(slug.clone()).await?.is_some() {
            return Err(ContentError::ThemeSlugTaken(slug));
        }

        let theme = Theme::new(name, slug.clone());
        if !self.store.theme_insert(theme.clone()).await? {
            // Lost a race against a concurrent create.
            return Err(ContentError::ThemeSlugTaken(slug));
        }

        tracing::info!(slug = %theme.slug, "theme created");
        Ok(theme)
    }

    /// Load a theme together with its articles.
    pub async fn get(&self, slug: &str) -> Result<Theme, ContentError> {
        self.store
            .theme(slug.to_string())
            .await?
            .ok_or_else(|| ContentError::ThemeNotFound(slug.to_string()))
    }

    /// Delete a theme and every article in it. Returns the deleted count.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, slug: &str) -> Result<u64, ContentError> {
        let count = self.store.theme_delete(slug.to_string()).await?;
        if count == 0 {
            return Err(ContentError::NothingToDelete(slug.to_string()));
        }

        tracing::info!(slug, "theme deleted");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::content::{test_support::fs_store, ErrorKind};

    fn new_theme(name: &str, slug: &str) -> NewTheme {
        NewTheme {
            name: Some(name.to_string()),
            slug: Some(slug.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_slug() {
        let (store, _dir) = fs_store();
        let themes = ThemeService::new(store);

        let theme = themes
            .create(new_theme("Robotics Lab", "Robotics Lab!"))
            .await
            .unwrap();
        assert_eq!(theme.slug, "robotics_lab");

        let stored = themes.get("robotics_lab").await.unwrap();
        assert_eq!(stored, Theme::new("Robotics Lab", "robotics_lab"));
    }

    #[tokio::test]
    async fn test_create_missing_fields() {
        let (store, _dir) = fs_store();
        let themes = ThemeService::new(store);

        for input in [
            NewTheme::default(),
            NewTheme {
                name: Some("A".into()),
                slug: None,
            },
            new_theme("", "a"),
            new_theme("A", "!!!"),
        ] {
            let err = themes.create(input).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }

        assert!(themes.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_conflict_after_normalization() {
        let (store, _dir) = fs_store();
        let themes = ThemeService::new(store);

        themes
            .create(new_theme("Robotics Lab", "robotics lab"))
            .await
            .unwrap();

        let err = themes
            .create(new_theme("Other", "Robotics-Lab"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.to_string(), "Slug 'robotics_lab' is used already.");

        let list = themes.list().await.unwrap();
        assert_eq!(list, vec![Theme::new("Robotics Lab", "robotics_lab")]);
    }

    #[tokio::test]
    async fn test_get_unknown() {
        let (store, _dir) = fs_store();
        let themes = ThemeService::new(store);

        let err = themes.get("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _dir) = fs_store();
        let themes = ThemeService::new(store);
        themes.create(new_theme("A", "a")).await.unwrap();

        assert_eq!(themes.delete("a").await.unwrap(), 1);

        let err = themes.delete("a").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(err.to_string(), "No such slug 'a'");
    }
}
