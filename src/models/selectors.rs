// src/models/selectors.rs

//! CSS selectors for scraping a comment thread.

use serde::{Deserialize, Serialize};

/// CSS selectors for scraping a comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSelectors {
    /// Selector that must match once for the page to count as a thread
    #[serde(default = "defaults::thread")]
    pub thread_selector: String,

    /// Selector for each comment row
    #[serde(default = "defaults::comment")]
    pub comment_selector: String,

    /// Selector for the indentation cell within a comment row
    #[serde(default = "defaults::indent")]
    pub indent_selector: String,

    /// Attribute on the indentation cell holding the nesting depth
    #[serde(default = "defaults::indent_attr")]
    pub indent_attr: String,

    /// Selector for the comment text container
    #[serde(default = "defaults::body")]
    pub body_selector: String,

    /// Selector for the author link
    #[serde(default = "defaults::author")]
    pub author_selector: String,

    /// Selector for the permalink carrying the comment id
    #[serde(default = "defaults::permalink")]
    pub permalink_selector: String,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "defaults::attr_name")]
    pub attr_name: String,
}

impl Default for CommentSelectors {
    fn default() -> Self {
        Self {
            thread_selector: defaults::thread(),
            comment_selector: defaults::comment(),
            indent_selector: defaults::indent(),
            indent_attr: defaults::indent_attr(),
            body_selector: defaults::body(),
            author_selector: defaults::author(),
            permalink_selector: defaults::permalink(),
            attr_name: defaults::attr_name(),
        }
    }
}

mod defaults {
    pub fn thread() -> String {
        "table.comment-tree, table.fatitem".into()
    }
    pub fn comment() -> String {
        "tr.athing.comtr".into()
    }
    pub fn indent() -> String {
        "td.ind".into()
    }
    pub fn indent_attr() -> String {
        "indent".into()
    }
    pub fn body() -> String {
        "div.commtext".into()
    }
    pub fn author() -> String {
        "a.hnuser".into()
    }
    pub fn permalink() -> String {
        "span.age a".into()
    }
    pub fn attr_name() -> String {
        "href".into()
    }
}
