//! Validation outcomes

use std::fmt;

use serde::Serialize;

/// One failed field rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field the failing rule was declared for
    pub key: String,
    /// Message returned by the rule (or its override)
    pub message: String,
}

/// Failed rules of one validation call, in rule declaration order.
///
/// Empty means the object is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages in rule order
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.message.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Violations reported for `key`
    pub fn for_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.0.iter().filter(move |v| v.key == key)
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0.into_iter().map(|v| v.message).collect()
    }

    pub(crate) fn push(&mut self, key: &str, message: String) {
        self.0.push(Violation {
            key: key.to_string(),
            message,
        });
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// One message per line
impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", violation.message)?;
        }
        Ok(())
    }
}
