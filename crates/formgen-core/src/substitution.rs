//! Ordered placeholder substitution over raw template lines.
//!
//! A [`SubstitutionMap`] holds `(token, value)` pairs in insertion order and applies
//! them one key after another, like a chain of `replace` calls. Text produced by an
//! earlier key is opaque to later keys, so a value that happens to contain another
//! token stays literal.
//!
//! Lines are handled as bytes: templates are not required to be UTF-8.

/// Placeholder replaced by the interface's class name.
pub const CLASS_NAME_TOKEN: &str = "%class_name%";

/// Placeholder replaced by the namespace containing the interface.
pub const NAMESPACE_TOKEN: &str = "%namespace_name%";

/// Ordered token -> value mapping applied to every template line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    entries: Vec<(String, String)>,
}

impl SubstitutionMap {
    /// The standard two-entry map: class name first, then namespace.
    pub fn new(class_name: &str, namespace: &str) -> Self {
        Self::default()
            .with(CLASS_NAME_TOKEN, class_name)
            .with(NAMESPACE_TOKEN, namespace)
    }

    /// Add a token after the existing ones.
    ///
    /// Re-adding a known token replaces its value but keeps its position. Empty tokens
    /// are ignored since they would match everywhere.
    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            return self;
        }
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token, value)),
        }
        self
    }

    /// Value mapped to `token`, if any.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    /// Entries in application order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substitute every token occurrence in `line`, appending the result to `out`.
    ///
    /// Returns the number of replacements made.
    pub fn apply_into(&self, line: &[u8], out: &mut Vec<u8>) -> usize {
        let mut replaced = 0;
        let mut segments = vec![Segment::Literal(line)];

        for (token, value) in &self.entries {
            let mut next = Vec::with_capacity(segments.len());
            for segment in segments {
                match segment {
                    Segment::Literal(text) => {
                        replaced += split_on_token(text, token.as_bytes(), value, &mut next);
                    }
                    done @ Segment::Replaced(_) => next.push(done),
                }
            }
            segments = next;
        }

        for segment in &segments {
            match segment {
                Segment::Literal(text) => out.extend_from_slice(text),
                Segment::Replaced(value) => out.extend_from_slice(value.as_bytes()),
            }
        }
        replaced
    }

    /// Substitute every token occurrence in `line`.
    pub fn apply(&self, line: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(line.len());
        self.apply_into(line, &mut out);
        out
    }
}

/// Part of a line during substitution: still open to later keys, or already replaced.
enum Segment<'a> {
    Literal(&'a [u8]),
    Replaced(&'a str),
}

/// Split `text` around non-overlapping occurrences of `token`, leftmost first.
fn split_on_token<'a>(
    text: &'a [u8],
    token: &[u8],
    value: &'a str,
    out: &mut Vec<Segment<'a>>,
) -> usize {
    let mut count = 0;
    let mut start = 0;
    let mut i = 0;
    while i + token.len() <= text.len() {
        if text[i..].starts_with(token) {
            if start < i {
                out.push(Segment::Literal(&text[start..i]));
            }
            out.push(Segment::Replaced(value));
            count += 1;
            i += token.len();
            start = i;
        } else {
            i += 1;
        }
    }
    if start < text.len() {
        out.push(Segment::Literal(&text[start..]));
    }
    count
}
