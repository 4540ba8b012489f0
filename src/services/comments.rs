// src/services/comments.rs

//! Comment extraction.
//!
//! Walks a thread page and turns every top-level comment into a
//! [`Candidate`]. Replies are recognised by their indentation marker and
//! skipped. No content filtering happens here.

use std::num::IntErrorKind;

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Candidate, CommentSelectors};
use crate::utils::url::extract_item_id;

/// A parsed thread page.
pub struct ThreadDocument {
    html: Html,
}

impl ThreadDocument {
    /// Parse raw HTML. Parsing itself never fails; structure is checked by
    /// [`CommentExtractor::load`].
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

/// One comment row, before reply filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub candidate: Candidate,

    /// Nesting depth from the indent marker, if one was present and numeric
    pub indent: Option<u32>,
}

impl Comment {
    /// Replies carry an indent greater than zero.
    pub fn is_reply(&self) -> bool {
        self.indent.is_some_and(|depth| depth > 0)
    }
}

/// Extracts candidate postings from thread pages.
pub struct CommentExtractor {
    thread: Selector,
    comment: Selector,
    indent: Selector,
    body: Selector,
    author: Selector,
    permalink: Selector,
    indent_attr: String,
    attr_name: String,
}

impl CommentExtractor {
    /// Compile the configured selectors.
    pub fn new(selectors: &CommentSelectors) -> Result<Self> {
        Ok(Self {
            thread: Self::parse_selector(&selectors.thread_selector)?,
            comment: Self::parse_selector(&selectors.comment_selector)?,
            indent: Self::parse_selector(&selectors.indent_selector)?,
            body: Self::parse_selector(&selectors.body_selector)?,
            author: Self::parse_selector(&selectors.author_selector)?,
            permalink: Self::parse_selector(&selectors.permalink_selector)?,
            indent_attr: selectors.indent_attr.clone(),
            attr_name: selectors.attr_name.clone(),
        })
    }

    /// Parse a page and check that it is a comment thread.
    pub fn load(&self, source: &str) -> Result<ThreadDocument> {
        let document = ThreadDocument::parse(source);
        if document.html.select(&self.thread).next().is_none() {
            return Err(AppError::malformed(
                "no comment thread found in the document",
            ));
        }
        Ok(document)
    }

    /// Every comment on the page, replies included, in document order.
    pub fn comments<'a>(&'a self, document: &'a ThreadDocument) -> impl Iterator<Item = Comment> + 'a {
        document
            .html
            .select(&self.comment)
            .map(move |row| self.parse_comment(&row))
    }

    /// Top-level comments as candidate postings.
    ///
    /// Lazy and restartable: calling it again on the same document yields
    /// the same sequence.
    pub fn extract<'a>(&'a self, document: &'a ThreadDocument) -> impl Iterator<Item = Candidate> + 'a {
        self.comments(document)
            .filter(|comment| !comment.is_reply())
            .map(|comment| comment.candidate)
    }

    fn parse_comment(&self, row: &ElementRef) -> Comment {
        let indent = row
            .select(&self.indent)
            .next()
            .and_then(|cell| cell.value().attr(&self.indent_attr))
            .and_then(|raw| match raw.trim().parse::<u32>() {
                Ok(depth) => Some(depth),
                // Deeper than any real thread, still a reply
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
                Err(_) => {
                    log::debug!("Ignoring non-numeric indent marker '{}'", raw);
                    None
                }
            });

        let body = row
            .select(&self.body)
            .next()
            .map(|container| container.inner_html())
            .unwrap_or_default();

        let author = row
            .select(&self.author)
            .next()
            .map(|link| link.text().collect::<String>().trim().to_string())
            .filter(|name| !name.is_empty());

        let external_id = row
            .select(&self.permalink)
            .next()
            .and_then(|link| link.value().attr(&self.attr_name))
            .and_then(extract_item_id);

        Comment {
            candidate: Candidate {
                body,
                author,
                external_id,
            },
            indent,
        }
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}
