//! Inline style properties.
//!
//! Elements carry their presentation as an ordered list of `name:value;` declarations, the
//! same shape the host stores. The engine only interprets `margin-left`; every other
//! declaration is kept verbatim and in order so that a load/save cycle is lossless.

use std::fmt;

/// Ordered set of inline style declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleProps {
    props: Vec<(String, String)>,
}

impl StyleProps {
    /// Create an empty property list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `name:value;name:value` declaration list.
    ///
    /// Declarations without a `:` are dropped. Names are trimmed; values are trimmed too, so
    /// `margin-left: 40px` and `margin-left:40px` parse to the same thing.
    pub fn parse(text: &str) -> Self {
        let props = text
            .split(';')
            .filter_map(|decl| {
                let (name, value) = decl.split_once(':')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { props }
    }

    /// Look up a declaration value by property name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a declaration with `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a declaration, replacing an existing one in place.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.props.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.props.push((name.to_string(), value)),
        }
    }

    /// Remove a declaration, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.props.iter().position(|(n, _)| n == name)?;
        Some(self.props.remove(idx).1)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Whether there are no declarations.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Iterate declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Render back to `name:value;` form (no spaces, trailing `;`).
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.props {
            out.push_str(name);
            out.push(':');
            out.push_str(value);
            out.push(';');
        }
        out
    }
}

impl fmt::Display for StyleProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for StyleProps {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}
