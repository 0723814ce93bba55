//! MongoDB backend.
//!
//! All themes live in one collection. Articles are embedded under
//! `articles.<slug>` and mutated with conditional `$set`/`$unset` updates.

use anyhow::Context;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Collection, IndexModel,
};

use crate::{
    content::{article_key, Article, Theme},
    slug::is_slug_like,
};

pub const DEFAULT_DATABASE: &str = "web_portfolio";
pub const DEFAULT_COLLECTION: &str = "computerWorkshop";

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone, Debug)]
pub struct MongoStore {
    themes: Collection<Theme>,
}

impl MongoStore {
    /// Connect, verify the connection and ensure the unique slug index.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
    ) -> Result<Self, anyhow::Error> {
        tracing::info!(database, collection, "connecting to MongoDB");

        let client = Client::with_uri_str(uri)
            .await
            .context("failed to connect to MongoDB")?;

        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;

        let store = Self {
            themes: db.collection::<Theme>(collection),
        };
        store.apply_indexes().await?;

        tracing::info!(database, collection, "connected to MongoDB");

        Ok(store)
    }

    async fn apply_indexes(&self) -> Result<(), anyhow::Error> {
        let index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.themes
            .create_index(index)
            .await
            .context("failed to create slug index")?;

        Ok(())
    }

    fn article_filter(theme_slug: &str, article_slug: &str, exists: bool) -> Document {
        let mut filter = doc! { "slug": theme_slug };
        filter.insert(article_key(article_slug), doc! { "$exists": exists });
        filter
    }
}

/// Article slugs become part of a key path; anything that is not a
/// normalized slug could address a different field.
fn guard_article_slug(article_slug: &str) -> bool {
    is_slug_like(article_slug)
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        *e.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref we)) if we.code == DUPLICATE_KEY
    )
}

impl super::Storage for MongoStore {
    async fn theme_list(&self) -> Result<Vec<Theme>, anyhow::Error> {
        let cursor = self
            .themes
            .find(doc! {})
            .await
            .context("failed to query themes")?;

        cursor
            .try_collect::<Vec<Theme>>()
            .await
            .context("failed to read theme documents")
    }

    async fn theme(&self, slug: String) -> Result<Option<Theme>, anyhow::Error> {
        self.themes
            .find_one(doc! { "slug": &slug })
            .await
            .with_context(|| format!("failed to load theme '{slug}'"))
    }

    async fn theme_insert(&self, theme: Theme) -> Result<bool, anyhow::Error> {
        match self.themes.insert_one(&theme).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(e).with_context(|| format!("failed to insert theme '{}'", theme.slug)),
        }
    }

    async fn theme_delete(&self, slug: String) -> Result<u64, anyhow::Error> {
        let res = self
            .themes
            .delete_one(doc! { "slug": &slug })
            .await
            .with_context(|| format!("failed to delete theme '{slug}'"))?;

        Ok(res.deleted_count)
    }

    async fn theme_with_article(
        &self,
        theme_slug: String,
        article_slug: String,
    ) -> Result<Option<Theme>, anyhow::Error> {
        if !guard_article_slug(&article_slug) {
            return Ok(None);
        }

        self.themes
            .find_one(Self::article_filter(&theme_slug, &article_slug, true))
            .await
            .with_context(|| format!("failed to load article '{theme_slug}'.'{article_slug}'"))
    }

    async fn article_insert(
        &self,
        theme_slug: String,
        article: Article,
    ) -> Result<bool, anyhow::Error> {
        if !guard_article_slug(&article.slug) {
            return Ok(false);
        }

        let mut set = Document::new();
        set.insert(article_key(&article.slug), bson::to_bson(&article)?);

        let res = self
            .themes
            .find_one_and_update(
                Self::article_filter(&theme_slug, &article.slug, false),
                doc! { "$set": set },
            )
            .await
            .with_context(|| format!("failed to insert article '{theme_slug}'.'{}'", article.slug))?;

        Ok(res.is_some())
    }

    async fn article_update(
        &self,
        theme_slug: String,
        article_slug: String,
        title: String,
        body: String,
    ) -> Result<bool, anyhow::Error> {
        if !guard_article_slug(&article_slug) {
            return Ok(false);
        }

        let key = article_key(&article_slug);
        let mut set = Document::new();
        set.insert(format!("{key}.title"), title);
        set.insert(format!("{key}.body"), body);

        let res = self
            .themes
            .find_one_and_update(
                Self::article_filter(&theme_slug, &article_slug, true),
                doc! { "$set": set },
            )
            .await
            .with_context(|| format!("failed to update article '{theme_slug}'.'{article_slug}'"))?;

        Ok(res.is_some())
    }

    async fn article_remove(
        &self,
        theme_slug: String,
        article_slug: String,
    ) -> Result<bool, anyhow::Error> {
        if !guard_article_slug(&article_slug) {
            return Ok(false);
        }

        let mut unset = Document::new();
        unset.insert(article_key(&article_slug), "");

        let res = self
            .themes
            .find_one_and_update(
                Self::article_filter(&theme_slug, &article_slug, true),
                doc! { "$unset": unset },
            )
            .await
            .with_context(|| format!("failed to remove article '{theme_slug}'.'{article_slug}'"))?;

        Ok(res.is_some())
    }
}
