pub mod api_themes;
pub mod article_create;
pub mod article_delete;
pub mod article_page;
pub mod article_update;
pub mod theme_create;
pub mod theme_delete;
pub mod theme_list;
pub mod theme_page;
