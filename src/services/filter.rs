//! Pluggable acceptance rules applied to extracted candidates.
//!
//! The extractor never drops comments on content. Callers that want to
//! skip non-posting chatter plug a [`CandidateFilter`] into ingestion.

use crate::models::{Candidate, ExtractorConfig};

/// Decides whether an extracted candidate should be stored.
pub trait CandidateFilter {
    fn accept(&self, candidate: &Candidate) -> bool;
}

/// Keeps every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CandidateFilter for AcceptAll {
    fn accept(&self, _candidate: &Candidate) -> bool {
        true
    }
}

/// Keeps candidates whose body contains the given text.
#[derive(Debug, Clone)]
pub struct RequireSubstring(pub String);

impl CandidateFilter for RequireSubstring {
    fn accept(&self, candidate: &Candidate) -> bool {
        candidate.body.contains(&self.0)
    }
}

impl<F> CandidateFilter for F
where
    F: Fn(&Candidate) -> bool,
{
    fn accept(&self, candidate: &Candidate) -> bool {
        self(candidate)
    }
}

/// Build the filter described by the extractor configuration.
pub fn from_config(config: &ExtractorConfig) -> Box<dyn CandidateFilter> {
    match &config.require_substring {
        Some(needle) => Box::new(RequireSubstring(needle.clone())),
        None => Box::new(AcceptAll),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(body: &str) -> Candidate {
        Candidate {
            body: body.to_string(),
            author: None,
            external_id: None,
        }
    }

    #[test]
    fn test_default_config_accepts_everything() {
        let filter = from_config(&ExtractorConfig::default());
        assert!(filter.accept(&candidate("We are hiring, no pipes here")));
    }

    #[test]
    fn test_require_substring() {
        let config = ExtractorConfig {
            require_substring: Some("|".to_string()),
            ..ExtractorConfig::default()
        };
        let filter = from_config(&config);
        assert!(filter.accept(&candidate("Acme | Rust")));
        assert!(!filter.accept(&candidate("Great thread, thanks!")));
    }

    #[test]
    fn test_closure_filter() {
        let has_author = |c: &Candidate| c.author.is_some();
        assert!(!has_author.accept(&candidate("x")));
    }
}
