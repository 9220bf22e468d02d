//! Caller-supplied query expressions and pagination arithmetic.
//!
//! Filters and sort keys are opaque callables: the repository never inspects
//! record internals, it only applies what the caller handed it. Both must be
//! pure and deterministic for a given record.

use std::cmp::Ordering;
use std::sync::Arc;

/// An opaque boolean predicate over a record.
pub struct Filter<T>(Arc<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Filter<T> {
    /// Wrap a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Apply the predicate to one record.
    pub fn matches(&self, record: &T) -> bool {
        (self.0)(record)
    }
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// An opaque ordering over records, built from a key extractor.
///
/// The caller supplies a function projecting each record onto a comparable
/// key; records are ordered ascending by that key.
pub struct SortKey<T>(Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>);

impl<T> SortKey<T> {
    /// Order records ascending by the extracted key.
    pub fn by<K, F>(extract: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self(Arc::new(move |a, b| extract(a).cmp(&extract(b))))
    }

    /// Compare two records under this ordering.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

impl<T> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// Compute the `(skip, take)` window for a paginated list.
///
/// A window exists only when both `page` and `page_size` are supplied;
/// values below 1 are clamped up to 1. When either parameter is absent no
/// window applies and the full result is returned. Pages are 1-based.
pub fn page_window(page: Option<i64>, page_size: Option<i64>) -> Option<(usize, usize)> {
    match (page, page_size) {
        (Some(page), Some(page_size)) => {
            let page = page.max(1) as usize;
            let page_size = page_size.max(1) as usize;
            Some(((page - 1) * page_size, page_size))
        }
        _ => None,
    }
}
