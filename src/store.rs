//! Owned response collection handing out immutable snapshots.
//!
//! Every mutation builds a new snapshot, so an `Arc` obtained earlier keeps
//! seeing the records as they were when it was taken.

use std::sync::Arc;

use crate::survey::SurveyResponse;

#[derive(Debug, Clone, Default)]
pub struct ResponseStore {
    records: Arc<[SurveyResponse]>,
}

impl ResponseStore {
    pub fn new(records: Vec<SurveyResponse>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn snapshot(&self) -> Arc<[SurveyResponse]> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SurveyResponse> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Adds `response`, replacing any record with the same id in place.
    pub fn insert(&mut self, response: SurveyResponse) -> Arc<[SurveyResponse]> {
        let mut next = self.records.to_vec();
        match next.iter().position(|r| r.id == response.id) {
            Some(index) => next[index] = response,
            None => next.push(response),
        }
        self.records = next.into();
        self.snapshot()
    }

    /// Removes the record with `id`. An unknown id leaves the current
    /// snapshot (and its identity) untouched.
    pub fn remove(&mut self, id: &str) -> Arc<[SurveyResponse]> {
        if self.get(id).is_some() {
            let next: Vec<SurveyResponse> =
                self.records.iter().filter(|r| r.id != id).cloned().collect();
            self.records = next.into();
        }
        self.snapshot()
    }

    pub fn replace_all(&mut self, records: Vec<SurveyResponse>) -> Arc<[SurveyResponse]> {
        self.records = records.into();
        self.snapshot()
    }
}
