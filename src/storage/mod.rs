pub mod fs;
pub mod mongo;

use std::future::Future;

use crate::content::{Article, Theme};

/// Access to the theme collection.
///
/// Every mutation is a single atomic operation on one theme document. The
/// conditional variants report whether a document matched; they never
/// create a theme as a side effect.
pub trait Storage {
    fn theme_list(&self) -> impl Future<Output = Result<Vec<Theme>, anyhow::Error>> + Send;

    fn theme(
        &self,
        slug: String,
    ) -> impl Future<Output = Result<Option<Theme>, anyhow::Error>> + Send;

    /// Insert a new theme. Returns `false` if the slug is already taken.
    fn theme_insert(&self, theme: Theme)
        -> impl Future<Output = Result<bool, anyhow::Error>> + Send;

    /// Delete the theme with the given slug, returning the deleted count.
    fn theme_delete(&self, slug: String)
        -> impl Future<Output = Result<u64, anyhow::Error>> + Send;

    /// Load a theme only if it contains the given article key.
    fn theme_with_article(
        &self,
        theme_slug: String,
        article_slug: String,
    ) -> impl Future<Output = Result<Option<Theme>, anyhow::Error>> + Send;

    /// Set `articles.<slug>` if the theme exists and the key is absent.
    fn article_insert(
        &self,
        theme_slug: String,
        article: Article,
    ) -> impl Future<Output = Result<bool, anyhow::Error>> + Send;

    /// Set title and body of an existing article.
    fn article_update(
        &self,
        theme_slug: String,
        article_slug: String,
        title: String,
        body: String,
    ) -> impl Future<Output = Result<bool, anyhow::Error>> + Send;

    /// Unset `articles.<slug>` if it exists.
    fn article_remove(
        &self,
        theme_slug: String,
        article_slug: String,
    ) -> impl Future<Output = Result<bool, anyhow::Error>> + Send;
}

#[derive(Clone, Debug)]
pub enum Store {
    Fs(fs::FsStore),
    Mongo(mongo::MongoStore),
}

impl From<fs::FsStore> for Store {
    fn from(fs: fs::FsStore) -> Self {
        Store::Fs(fs)
    }
}

impl From<mongo::MongoStore> for Store {
    fn from(mongo: mongo::MongoStore) -> Self {
        Store::Mongo(mongo)
    }
}

impl Storage for Store {
    async fn theme_list(&self) -> Result<Vec<Theme>, anyhow::Error> {
        match self {
            Store::Fs(fs) => fs.theme_list().await,
            Store::Mongo(mongo) => mongo.theme_list().await,
        }
    }

    async fn theme(&self, slug: String) -> Result<Option<Theme>, anyhow::Error> {
        match self {
            Store::Fs(fs) => fs.theme(slug).await,
            Store::Mongo(mongo) => mongo.theme(slug).await,
        }
    }

    async fn theme_insert(&self, theme: Theme) -> Result<bool, anyhow::Error> {
        match self {
            Store::Fs(fs) => fs.theme_insert(theme).await,
            Store::Mongo(mongo) => mongo.theme_insert(theme).await,
        }
    }

    async fn theme_delete(&self, slug: String) -> Result<u64, anyhow::Error> {
        match self {
            Store::Fs(fs) => fs.theme_delete(slug).await,
            Store::Mongo(mongo) => mongo.theme_delete(slug).await,
        }
    }

    async fn theme_with_article(
        &self,
        theme_slug: String,
        article_slug: String,
    ) -> Result<Option<Theme>, anyhow::Error> {
        match self {
            Store::Fs(fs) => fs.theme_with_article(theme_slug, article_slug).await,
            Store::Mongo(mongo) => mongo.theme_with_article(theme_slug, article_slug).await,
        }
    }

    async fn article_insert(
        &self,
        theme_slug: String,
        article: Article,
    ) -> Result<bool, anyhow::Error> {
        match self {
            Store::Fs(fs) => fs.article_insert(theme_slug, article).await,
            Store::Mongo(mongo) => mongo.article_insert(theme_slug, article).await,
        }
    }

    async fn article_update(
        &self,
        theme_slug: String,
        article_slug: String,
        title: String,
        body: String,
    ) -> Result<bool, anyhow::Error> {
        match self {
            Store::Fs(fs) => {
                fs.article_update(theme_slug, article_slug, title, body)
                    .await
            }
            Store::Mongo(mongo) => {
                mongo
                    .article_update(theme_slug, article_slug, title, body)
                    .await
            }
        }
    }

    async fn article_remove(
        &self,
        theme_slug: String,
        article_slug: String,
    ) -> Result<bool, anyhow::Error> {
        match self {
            Store::Fs(fs) => fs.article_remove(theme_slug, article_slug).await,
            Store::Mongo(mongo) => mongo.article_remove(theme_slug, article_slug).await,
        }
    }
}
