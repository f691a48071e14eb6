use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Reserved key whose value answers every query that has no exact match.
pub const DEFAULT_KEY: &str = "default";

const BUILTIN_RESPONSES: &[(&str, &str)] = &[
    ("hi", "Hello! How can I help you today?"),
    ("hello", "Hi there! How can I assist you?"),
    ("how are you", "I'm just code, but thanks for asking!"),
    (
        "help",
        "You can ask me about your utilities, purchases, or general info.",
    ),
    (
        "what is my electricity bill",
        "Your last electricity bill was R120.",
    ),
    ("what is my water bill", "Your last water bill was R45."),
    (
        "pay my bill",
        "Sure! Which bill would you like to pay? Electricity or water?",
    ),
    (
        "track my order",
        "Please provide your order ID, and I'll track it for you.",
    ),
    (
        "subscribe to notifications",
        "You are now subscribed to notifications for bills and updates.",
    ),
    (
        "change my address",
        "Please provide the new address and I'll update your account.",
    ),
    (
        "what services do you offer",
        "I help manage your utility bills, track orders, and provide reminders.",
    ),
    (
        DEFAULT_KEY,
        "Sorry, I don't understand that. Can you rephrase?",
    ),
];

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("response table has no \"default\" entry")]
    MissingDefault,

    #[error("failed to read response table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse response table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable phrase -> response mapping. Always holds a `default` entry.
#[derive(Debug, Clone)]
pub struct ResponseTable {
    entries: HashMap<String, String>,
}

impl ResponseTable {
    /// The utility assistant's built-in phrases.
    pub fn builtin() -> Self {
        let entries = BUILTIN_RESPONSES
            .iter()
            .map(|(phrase, response)| (phrase.to_string(), response.to_string()))
            .collect();
        Self { entries }
    }

    /// Build a table from arbitrary pairs.
    ///
    /// Keys are lowercased on the way in, otherwise a mixed-case key could
    /// never be reached by a lowercased query. When two keys collapse to the
    /// same lowercase form the later pair wins.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries: HashMap<String, String> = entries
            .into_iter()
            .map(|(phrase, response)| (phrase.as_ref().to_lowercase(), response.into()))
            .collect();

        if !entries.contains_key(DEFAULT_KEY) {
            return Err(TableError::MissingDefault);
        }

        Ok(Self { entries })
    }

    /// Load a table from a JSON object of `"phrase": "response"` pairs.
    ///
    /// Pairs are applied in file order, so of two keys that differ only by
    /// case the one written last wins.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let OrderedEntries(entries) = serde_json::from_str(&raw)?;
        log::info!(
            "Loaded {} response entries from {}",
            entries.len(),
            path.as_ref().display()
        );
        Self::from_entries(entries)
    }

    pub fn get(&self, phrase: &str) -> Option<&str> {
        self.entries.get(phrase).map(String::as_str)
    }

    pub fn default_response(&self) -> &str {
        // Every constructor checks for the default entry.
        self.entries
            .get(DEFAULT_KEY)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Number of entries, the `default` entry included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Matchable phrases, sorted, without the `default` entry.
    pub fn phrases(&self) -> Vec<&str> {
        let mut phrases: Vec<&str> = self
            .entries
            .keys()
            .map(String::as_str)
            .filter(|phrase| *phrase != DEFAULT_KEY)
            .collect();
        phrases.sort_unstable();
        phrases
    }
}

/// A JSON object's string pairs in document order.
struct OrderedEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedEntriesVisitor;

        impl<'de> Visitor<'de> for OrderedEntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of phrases to responses")
            }

            fn visit_map<M>(self, mut map: M) -> Result<OrderedEntries, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, String>()? {
                    entries.push(entry);
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(OrderedEntriesVisitor)
    }
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Answers queries from a [`ResponseTable`].
///
/// The only normalization applied is lowercasing: whitespace and punctuation
/// are significant, so `" hi "` and `"hi!"` fall through to the default.
#[derive(Debug, Clone, Default)]
pub struct Responder {
    table: ResponseTable,
}

impl Responder {
    pub fn new(table: ResponseTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ResponseTable {
        &self.table
    }

    pub fn respond(&self, query: &str) -> &str {
        let normalized = query.to_lowercase();
        match self.table.get(&normalized) {
            Some(response) => response,
            None => {
                tracing::trace!(query = %normalized, "no exact match, using default response");
                self.table.default_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_has_default() {
        let table = ResponseTable::builtin();
        assert_eq!(
            table.default_response(),
            "Sorry, I don't understand that. Can you rephrase?"
        );
        assert_eq!(table.len(), 12);
        assert_eq!(table.phrases().len(), 11);
    }

    #[test]
    fn test_from_entries_requires_default() {
        let result = ResponseTable::from_entries([("hi", "hello")]);
        assert!(matches!(result, Err(TableError::MissingDefault)));
    }

    #[test]
    fn test_from_entries_lowercases_keys() {
        let table = ResponseTable::from_entries([("Good Morning", "Morning!"), ("DEFAULT", "?")])
            .unwrap();
        assert_eq!(table.get("good morning"), Some("Morning!"));
        assert_eq!(table.default_response(), "?");
    }

    #[test]
    fn test_respond_is_case_insensitive() {
        let responder = Responder::default();
        assert_eq!(responder.respond("Hi"), "Hello! How can I help you today?");
        assert_eq!(responder.respond("HELLO"), "Hi there! How can I assist you?");
    }

    #[test]
    fn test_respond_falls_back_to_default() {
        let responder = Responder::default();
        let default = responder.table().default_response();
        assert_eq!(responder.respond("banana"), default);
        assert_eq!(responder.respond(""), default);
        assert_eq!(responder.respond(" hi "), default);
        assert_eq!(responder.respond("hi!"), default);
    }
}
