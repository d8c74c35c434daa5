//! Attribute stores: the key/value view of one header.

use crate::value::Literal;

/// Read-only access to one record's header.
///
/// Keys are case-sensitive. Implementations backed by a real file format
/// only need these three operations.
pub trait AttributeStore {
    /// Whether `key` is present.
    fn contains(&self, key: &str) -> bool;

    /// Value for `key`, if present.
    fn get(&self, key: &str) -> Option<Literal>;

    /// Distinct keys in header order.
    fn keys(&self) -> Vec<&str>;
}

/// One header card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub key: String,
    pub value: Literal,
}

/// In-memory header: an ordered list of cards.
///
/// Free-text keys such as `COMMENT` and `HISTORY` may repeat; lookup
/// returns the first card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a card, keeping any earlier card with the same key.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Literal>) {
        self.cards.push(Card {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Builder-style [`Header::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.push(key, value);
        self
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl AttributeStore for Header {
    fn contains(&self, key: &str) -> bool {
        self.cards.iter().any(|c| c.key == key)
    }

    fn get(&self, key: &str) -> Option<Literal> {
        self.cards
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.value.clone())
    }

    fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::with_capacity(self.cards.len());
        for card in &self.cards {
            if !keys.contains(&card.key.as_str()) {
                keys.push(&card.key);
            }
        }
        keys
    }
}

impl<K: Into<String>, V: Into<Literal>> FromIterator<(K, V)> for Header {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut header = Header::new();
        for (key, value) in iter {
            header.push(key, value);
        }
        header
    }
}
