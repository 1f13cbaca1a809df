//! Declarative fetch queries.
//!
//! A query is a plain value describing filter and order; building one
//! performs no I/O. Executing it through the store (or the facade) does.
//! The movie/actor relationship is always eagerly loaded into the
//! resulting snapshots, so callers never trigger per-row fetches later.

use marquee_core::{contains_normalized, search_key, Actor, Movie, TitleSort};

/// Filter + sort descriptor for movie fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieQuery {
    sort: Option<TitleSort>,
    search: String,
}

impl MovieQuery {
    /// Unfiltered, unordered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Order results by the precomputed sort key, or leave the order
    /// unspecified with `None`.
    pub fn with_sort(mut self, sort: Option<TitleSort>) -> Self {
        self.sort = sort;
        self
    }

    /// Keep only movies whose title contains the search string, case- and
    /// diacritic-insensitively. An empty string applies no filter.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sort(&self) -> Option<TitleSort> {
        self.sort
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub(crate) fn matches(&self, title: &str) -> bool {
        contains_normalized(title, &self.search)
    }

    pub(crate) fn order(&self, movies: &mut [Movie]) {
        let Some(sort) = self.sort else {
            return;
        };
        movies.sort_by(|a, b| {
            (a.sortable_title.as_str(), a.title.as_str())
                .cmp(&(b.sortable_title.as_str(), b.title.as_str()))
        });
        if sort == TitleSort::Descending {
            movies.reverse();
        }
    }
}

/// Filter + sort descriptor for actor fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorQuery {
    sort: Option<TitleSort>,
    search: String,
}

impl ActorQuery {
    /// Unfiltered, unordered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Order results by folded name, or leave the order unspecified.
    pub fn with_sort(mut self, sort: Option<TitleSort>) -> Self {
        self.sort = sort;
        self
    }

    /// Keep only actors whose name contains the search string.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sort(&self) -> Option<TitleSort> {
        self.sort
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub(crate) fn matches(&self, name: &str) -> bool {
        contains_normalized(name, &self.search)
    }

    pub(crate) fn order(&self, actors: &mut [Actor]) {
        let Some(sort) = self.sort else {
            return;
        };
        actors.sort_by_key(|actor| (search_key(&actor.name), actor.name.clone()));
        if sort == TitleSort::Descending {
            actors.reverse();
        }
    }
}
