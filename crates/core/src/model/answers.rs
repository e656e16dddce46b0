use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// Per-question answer text. Keys are only ever inserted or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    entries: BTreeMap<QuestionId, String>,
}

impl AnswerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the answer for `id`. Text is not validated.
    pub fn set(&mut self, id: QuestionId, text: impl Into<String>) {
        self.entries.insert(id, text.into());
    }

    /// Stored text, or `""` for a question that has no answer yet.
    #[must_use]
    pub fn get(&self, id: &QuestionId) -> &str {
        self.entries.get(id).map_or("", String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.entries.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> AnswerSnapshot {
        AnswerSnapshot {
            answers: self.entries.clone(),
        }
    }
}

/// Immutable copy of every saved answer, taken at completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSnapshot {
    answers: BTreeMap<QuestionId, String>,
}

impl AnswerSnapshot {
    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&str> {
        self.answers.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &str)> {
        self.answers.iter().map(|(id, text)| (id, text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_empty_for_missing() {
        let store = AnswerStore::new();
        assert_eq!(store.get(&QuestionId::new("q1")), "");
        assert!(!store.contains(&QuestionId::new("q1")));
    }

    #[test]
    fn set_overwrites_latest_value() {
        let mut store = AnswerStore::new();
        let id = QuestionId::new("q1");
        store.set(id.clone(), "first");
        store.set(id.clone(), "second");
        assert_eq!(store.get(&id), "second");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let mut store = AnswerStore::new();
        let id = QuestionId::new("q1");
        store.set(id.clone(), "kept");
        let snapshot = store.snapshot();
        store.set(id.clone(), "changed later");
        assert_eq!(snapshot.get(&id), Some("kept"));
    }

    #[test]
    fn empty_answer_is_a_stored_value() {
        let mut store = AnswerStore::new();
        let id = QuestionId::new("q1");
        store.set(id.clone(), "");
        assert!(store.contains(&id));
        assert_eq!(store.snapshot().get(&id), Some(""));
    }
}
