//! Access to MagicPod test cases and shared steps.
//!
//! The pipeline only depends on the [`RemoteSource`] trait: one call fetches
//! a page of a collection starting at a minimum record number, another
//! fetches a single record. [`MagicPodClient`] implements it over HTTP;
//! tests substitute in-memory sources.
//!
//! Listing endpoints return abbreviated records, so [`fetch_shared_steps`] and
//! [`fetch_test_cases`] list numbers first and then fetch each full record.

mod client;
mod error;

pub use client::{ClientConfig, MagicPodClient};
pub use error::ApiError;

use std::fmt;

use tracing::debug;

use crate::model::{Record, SharedStep, TestCase, record_number};

/// Paginated collections exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    /// Reusable shared-step groups.
    SharedSteps,
    /// Test cases.
    TestCases,
}

impl Collection {
    /// Path segment of the collection endpoint.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::SharedSteps => "shared-steps",
            Self::TestCases => "test-cases",
        }
    }

    /// Query parameter carrying the pagination cursor.
    #[must_use]
    pub const fn cursor_param(self) -> &'static str {
        match self {
            Self::SharedSteps => "min_shared_step_number",
            Self::TestCases => "min_test_case_number",
        }
    }

    /// Key of the item array in a listing response.
    #[must_use]
    pub const fn list_key(self) -> &'static str {
        match self {
            Self::SharedSteps => "shared_steps",
            Self::TestCases => "test_cases",
        }
    }

    /// Singular noun used in messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::SharedSteps => "shared step",
            Self::TestCases => "test case",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Paged, number-addressed access to a project's records.
pub trait RemoteSource {
    /// Fetch the page of `collection` whose records are numbered at least
    /// `min_number`. An empty page marks the end of the collection.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the response is
    /// malformed.
    fn fetch_page(&self, collection: Collection, min_number: u64) -> Result<Vec<Record>, ApiError>;

    /// Fetch the full record numbered `number`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the response is
    /// malformed.
    fn fetch_one(&self, collection: Collection, number: u64) -> Result<Record, ApiError>;
}

/// Iterator over every record of a collection, one page at a time.
///
/// Created by [`list_all`]. Pages are requested lazily; after each non-empty
/// page the cursor moves one past the number of its last record. An empty
/// page ends the iteration. A page that would not move the cursor forward
/// yields [`ApiError::StalledPagination`]. The first error is yielded once
/// and ends the iteration too.
#[derive(Debug)]
pub struct ListAll<'s, S: ?Sized> {
    source: &'s S,
    collection: Collection,
    cursor: u64,
    pending: std::vec::IntoIter<Record>,
    finished: bool,
}

impl<S: RemoteSource + ?Sized> ListAll<'_, S> {
    fn next_page(&mut self) -> Result<bool, ApiError> {
        let page = self.source.fetch_page(self.collection, self.cursor)?;
        let Some(last) = page.last() else {
            debug!(collection = %self.collection, cursor = self.cursor, "reached empty page");
            return Ok(false);
        };
        let last_number = record_number(last, self.collection.noun())?;
        debug!(
            collection = %self.collection,
            cursor = self.cursor,
            items = page.len(),
            "fetched page"
        );
        let cursor = self.cursor;
        self.cursor = last_number
            .checked_add(1)
            .filter(|&next| next > cursor)
            .ok_or(ApiError::StalledPagination {
                collection: self.collection.noun(),
                cursor,
                last_number,
            })?;
        self.pending = page.into_iter();
        Ok(true)
    }
}

impl<S: RemoteSource + ?Sized> Iterator for ListAll<'_, S> {
    type Item = Result<Record, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.next() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }
            match self.next_page() {
                Ok(true) => {}
                Ok(false) => self.finished = true,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<S: RemoteSource + ?Sized> std::iter::FusedIterator for ListAll<'_, S> {}

/// List every record of `collection`, starting from number 1.
pub fn list_all<S: RemoteSource + ?Sized>(source: &S, collection: Collection) -> ListAll<'_, S> {
    ListAll {
        source,
        collection,
        cursor: 1,
        pending: Vec::new().into_iter(),
        finished: false,
    }
}

/// Fetch the full record numbered `number` from `collection`.
///
/// # Errors
///
/// Propagates the source's [`ApiError`].
pub fn get_one<S: RemoteSource + ?Sized>(
    source: &S,
    collection: Collection,
    number: u64,
) -> Result<Record, ApiError> {
    debug!(%collection, number, "fetching record");
    source.fetch_one(collection, number)
}

fn list_numbers<S: RemoteSource + ?Sized>(
    source: &S,
    collection: Collection,
) -> Result<Vec<u64>, ApiError> {
    list_all(source, collection)
        .map(|record| record.and_then(|r| record_number(&r, collection.noun())))
        .collect()
}

/// Fetch every shared step of the project with its full step text.
///
/// # Errors
///
/// Returns the first [`ApiError`] encountered; no further requests are made
/// after a failure.
pub fn fetch_shared_steps<S: RemoteSource + ?Sized>(
    source: &S,
) -> Result<Vec<SharedStep>, ApiError> {
    let numbers = list_numbers(source, Collection::SharedSteps)?;
    numbers
        .into_iter()
        .map(|number| {
            get_one(source, Collection::SharedSteps, number).and_then(SharedStep::from_record)
        })
        .collect()
}

/// Fetch test cases with their full step text.
///
/// An empty `numbers` slice fetches every test case of the project, in
/// listing order; otherwise the given numbers are fetched in the given order.
///
/// # Errors
///
/// Returns the first [`ApiError`] encountered; no further requests are made
/// after a failure.
pub fn fetch_test_cases<S: RemoteSource + ?Sized>(
    source: &S,
    numbers: &[u64],
) -> Result<Vec<TestCase>, ApiError> {
    let listed;
    let wanted = if numbers.is_empty() {
        listed = list_numbers(source, Collection::TestCases)?;
        listed.as_slice()
    } else {
        numbers
    };
    wanted
        .iter()
        .map(|&number| get_one(source, Collection::TestCases, number).and_then(TestCase::from_record))
        .collect()
}
