//! Custom analytics events.

/// A single typed attribute attached to a [`CustomEvent`].
///
/// Only the two kinds the analytics pipeline accepts: free text and numbers.
/// Everything else is dropped before an event is assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum EventAttribute {
    Text(String),
    Number(f64),
}

/// A named analytics event plus its attributes, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEvent {
    name: String,
    attributes: Vec<(String, EventAttribute)>,
}

impl CustomEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn put_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes
            .push((key.into(), EventAttribute::Text(value.into())));
    }

    pub fn put_number(&mut self, key: impl Into<String>, value: f64) {
        self.attributes
            .push((key.into(), EventAttribute::Number(value)));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, EventAttribute)] {
        &self.attributes
    }
}
