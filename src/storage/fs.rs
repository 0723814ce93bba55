use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use tokio::sync::Mutex;

use crate::{
    content::{Article, Theme},
    slug::is_slug_like,
};

/// Stores each theme as a JSON file named after its slug.
///
/// Mutations hold a shared lock for their whole read-modify-write cycle, so
/// clones of one store never interleave updates of the same document.
#[derive(Clone, Debug)]
pub struct FsStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FsStore {
    pub fn new(root: PathBuf) -> Result<Self, anyhow::Error> {
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create root directory: '{}'", root.display()))?;

        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn themes_dir(&self) -> PathBuf {
        self.root.join("themes")
    }

    /// Slugs that could not have been produced by normalization never map to
    /// a file.
    fn theme_path(&self, slug: &str) -> Option<PathBuf> {
        if !is_slug_like(slug) {
            return None;
        }
        Some(self.themes_dir().join(format!("{slug}.json")))
    }

    async fn read_theme(&self, slug: &str) -> Result<Option<Theme>, anyhow::Error> {
        let Some(path) = self.theme_path(slug) else {
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(data) => {
                let theme = serde_json::from_slice(&data)
                    .with_context(|| format!("invalid theme file: '{}'", path.display()))?;
                Ok(Some(theme))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context(format!("failed to read file: '{}'", path.display())),
        }
    }

    async fn write_theme(&self, theme: &Theme) -> Result<(), anyhow::Error> {
        let path = self
            .theme_path(&theme.slug)
            .with_context(|| format!("invalid theme slug: '{}'", theme.slug))?;
        let data = serde_json::to_vec(theme)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create directory: '{}'", parent.display()))?;
        }

        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("failed to write file: '{}'", path.display()))?;

        Ok(())
    }

    /// Apply `f` to the stored theme under the write lock.
    ///
    /// The theme is written back only if `f` returns true.
    async fn modify_theme<F>(&self, slug: &str, f: F) -> Result<bool, anyhow::Error>
    where
        F: FnOnce(&mut Theme) -> bool + Send,
    {
        let _guard = self.write_lock.lock().await;

        let Some(mut theme) = self.read_theme(slug).await? else {
            return Ok(false);
        };

        if !f(&mut theme) {
            return Ok(false);
        }

        self.write_theme(&theme).await?;
        Ok(true)
    }
}

impl super::Storage for FsStore {
    async fn theme_list(&self) -> Result<Vec<Theme>, anyhow::Error> {
        let mut list = Vec::new();
        let dir = self.themes_dir();

        let mut iter = match tokio::fs::read_dir(&dir).await {
            Ok(iter) => iter,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(list),
            Err(e) => {
                return Err(e).context(format!("failed to read directory: '{}'", dir.display()))
            }
        };

        while let Some(entry) = iter.next_entry().await? {
            let path = entry.path();
            let is_json = path.extension().map_or(false, |ext| ext == "json");
            if !is_json {
                continue;
            }

            let data = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read file: '{}'", path.display()))?;

            match serde_json::from_slice::<Theme>(&data) {
                Ok(theme) => {
                    list.push(theme);
                }
                Err(e) => {
                    tracing::error!(
                        "failed to parse theme json file: '{}': {}",
                        path.display(),
                        e
                    );
                }
            }
        }

        list.sort_by(|a, b| a.slug.cmp(&b.slug));

        Ok(list)
    }

    async fn theme(&self, slug: String) -> Result<Option<Theme>, anyhow::Error> {
        self.read_theme(&slug).await
    }

    async fn theme_insert(&self, theme: Theme) -> Result<bool, anyhow::Error> {
        let _guard = self.write_lock.lock().await;

        if self.read_theme(&theme.slug).await?.is_some() {
            return Ok(false);
        }

        self.write_theme(&theme).await?;
        Ok(true)
    }

    async fn theme_delete(&self, slug: String) -> Result<u64, anyhow::Error> {
        let Some(path) = self.theme_path(&slug) else {
            return Ok(0);
        };

        let _guard = self.write_lock.lock().await;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(1),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e).context(format!("failed to remove file: '{}'", path.display())),
        }
    }

    async fn theme_with_article(
        &self,
        theme_slug: String,
        article_slug: String,
    ) -> Result<Option<Theme>, anyhow::Error> {
        let theme = self.read_theme(&theme_slug).await?;
        Ok(theme.filter(|t| t.articles.contains_key(&article_slug)))
    }

    async fn article_insert(
        &self,
        theme_slug: String,
        article: Article,
    ) -> Result<bool, anyhow::Error> {
        self.modify_theme(&theme_slug, move |theme| {
            if theme.articles.contains_key(&article.slug) {
                return false;
            }
            theme.articles.insert(article.slug.clone(), article);
            true
        })
        .await
    }

    async fn article_update(
        &self,
        theme_slug: String,
        article_slug: String,
        title: String,
        body: String,
    ) -> Result<bool, anyhow::Error> {
        self.modify_theme(&theme_slug, move |theme| {
            match theme.articles.get_mut(&article_slug) {
                Some(article) => {
                    article.title = title;
                    article.body = body;
                    true
                }
                None => false,
            }
        })
        .await
    }

    async fn article_remove(
        &self,
        theme_slug: String,
        article_slug: String,
    ) -> Result<bool, anyhow::Error> {
        self.modify_theme(&theme_slug, move |theme| {
            theme.articles.remove(&article_slug).is_some()
        })
        .await
    }
}
