use std::collections::BTreeMap;

pub mod articles;
pub mod themes;

/// A top-level content grouping, stored as one document.
///
/// Articles are embedded and keyed by their slug.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub articles: BTreeMap<String, Article>,
}

impl Theme {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            articles: BTreeMap::new(),
        }
    }

    pub fn article(&self, slug: &str) -> Option<&Article> {
        self.articles.get(slug)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub body: String,
    pub slug: String,
}

/// Nested key path of an article inside its theme document.
pub fn article_key(article_slug: &str) -> String {
    format!("articles.{article_slug}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field is missing.
    Validation,
    /// A slug is already taken.
    Conflict,
    NotFound,
    /// The request named something that does not exist, reported by a
    /// mutation.
    Client,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Some fields are not provided")]
    MissingFields,
    #[error("Slug '{0}' is used already.")]
    ThemeSlugTaken(String),
    #[error("Article with slug '{0}' exists already")]
    ArticleSlugTaken(String),
    #[error("No such theme '{0}'")]
    ThemeNotFound(String),
    #[error("Cannot find such article '{theme}'.'{article}'")]
    ArticleNotFound { theme: String, article: String },
    #[error("No such slug '{0}'")]
    NothingToDelete(String),
    #[error("No such article slug '{article}' or no theme with the slug '{theme}'")]
    NoArticleToDelete { theme: String, article: String },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ContentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::MissingFields => ErrorKind::Validation,
            ContentError::ThemeSlugTaken(_) | ContentError::ArticleSlugTaken(_) => {
                ErrorKind::Conflict
            }
            ContentError::ThemeNotFound(_) | ContentError::ArticleNotFound { .. } => {
                ErrorKind::NotFound
            }
            ContentError::NothingToDelete(_) | ContentError::NoArticleToDelete { .. } => {
                ErrorKind::Client
            }
            ContentError::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Returns the value if it is present and non-empty.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
