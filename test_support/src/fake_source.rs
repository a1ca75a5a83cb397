//! In-memory stand-in for the MagicPod API.
//!
//! [`FakeSource`] serves shared steps and test cases from maps, paginates
//! listings with a configurable page size, and records every call so tests
//! can assert on request order. Listings return abbreviated records, like the
//! real service, so callers must fetch each record to see its steps.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use magicpod_steps::api::{ApiError, Collection, RemoteSource};
use magicpod_steps::model::Record;
use serde_json::{Value, json};

/// A call made against a [`FakeSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeRequest {
    /// `fetch_page(collection, min_number)`.
    Page(Collection, u64),
    /// `fetch_one(collection, number)`.
    One(Collection, u64),
}

/// Records served from memory.
#[derive(Debug)]
pub struct FakeSource {
    shared_steps: BTreeMap<u64, Record>,
    test_cases: BTreeMap<u64, Record>,
    page_size: usize,
    failing: BTreeSet<(Collection, u64)>,
    requests: RefCell<Vec<FakeRequest>>,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self {
            shared_steps: BTreeMap::new(),
            test_cases: BTreeMap::new(),
            page_size: 2,
            failing: BTreeSet::new(),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl FakeSource {
    /// Create an empty source with a page size of 2.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve listings `size` records at a time.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Register a shared step.
    pub fn with_shared_step(mut self, number: u64, name: &str, steps: &str) -> Self {
        self.shared_steps.insert(
            number,
            object(json!({
                "number": number,
                "name": name,
                "human_readable_steps": steps,
            })),
        );
        self
    }

    /// Register a test case with a generated name.
    pub fn with_test_case(self, number: u64, steps: &str) -> Self {
        self.with_test_case_record(object(json!({
            "number": number,
            "name": format!("Test case {number}"),
            "human_readable_steps": steps,
        })))
    }

    /// Register an arbitrary test case record keyed by its `number`.
    ///
    /// # Panics
    ///
    /// Panics if the record has no numeric `number` field.
    pub fn with_test_case_record(mut self, record: Record) -> Self {
        let number = record
            .get("number")
            .and_then(Value::as_u64)
            .expect("test case record needs a number");
        self.test_cases.insert(number, record);
        self
    }

    /// Make `fetch_one` for this record fail with a 404 status error.
    pub fn failing(mut self, collection: Collection, number: u64) -> Self {
        self.failing.insert((collection, number));
        self
    }

    /// Every call made so far, in order.
    pub fn requests(&self) -> Vec<FakeRequest> {
        self.requests.borrow().clone()
    }

    fn records(&self, collection: Collection) -> &BTreeMap<u64, Record> {
        match collection {
            Collection::SharedSteps => &self.shared_steps,
            Collection::TestCases => &self.test_cases,
        }
    }
}

impl RemoteSource for FakeSource {
    fn fetch_page(&self, collection: Collection, min_number: u64) -> Result<Vec<Record>, ApiError> {
        self.requests
            .borrow_mut()
            .push(FakeRequest::Page(collection, min_number));
        Ok(self
            .records(collection)
            .range(min_number..)
            .take(self.page_size)
            .map(|(number, record)| {
                let mut summary = Record::new();
                summary.insert("number".to_owned(), Value::from(*number));
                if let Some(name) = record.get("name") {
                    summary.insert("name".to_owned(), name.clone());
                }
                summary
            })
            .collect())
    }

    fn fetch_one(&self, collection: Collection, number: u64) -> Result<Record, ApiError> {
        self.requests
            .borrow_mut()
            .push(FakeRequest::One(collection, number));
        let url = format!("fake://{collection}/{number}/");
        if self.failing.contains(&(collection, number)) {
            return Err(ApiError::Status {
                url,
                status: 404,
                reason: "Not Found".to_owned(),
            });
        }
        self.records(collection)
            .get(&number)
            .cloned()
            .ok_or(ApiError::Status {
                url,
                status: 404,
                reason: "Not Found".to_owned(),
            })
    }
}

/// Unwrap a JSON object literal into a [`Record`].
///
/// # Panics
///
/// Panics if `value` is not an object.
pub fn object(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
