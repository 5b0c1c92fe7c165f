//! Directory path patterns.

use std::fmt;

use super::tuple::Variable;

/// A single segment of a directory pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirElement {
    /// A literal directory name.
    Name(String),
    /// Matches any single child name at this level.
    Variable(Variable),
    /// Invalid sentinel.
    Nil,
}

impl DirElement {
    #[must_use]
    pub fn name(s: impl Into<String>) -> Self {
        Self::Name(s.into())
    }

    #[must_use]
    pub const fn var() -> Self {
        Self::Variable(Variable::any())
    }
}

impl fmt::Display for DirElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Variable(v) => write!(f, "{v}"),
            Self::Nil => f.write_str("nil"),
        }
    }
}

/// A directory path pattern.
///
/// Segments are resolved left to right. Any number of `Variable` segments
/// may appear; each one expands to the children present in the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Directory(pub Vec<DirElement>);

impl Directory {
    /// Build a fully literal directory from path names.
    #[must_use]
    pub fn from_path<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(path.into_iter().map(|s| DirElement::Name(s.into())).collect())
    }

    /// Convert to a list of names.
    ///
    /// Returns `None` if any segment is not a literal name.
    #[must_use]
    pub fn to_path(&self) -> Option<Vec<String>> {
        self.0
            .iter()
            .map(|element| match element {
                DirElement::Name(name) => Some(name.as_str().to_owned()),
                DirElement::Variable(_) | DirElement::Nil => None,
            })
            .collect()
    }

    /// Index of the first `Variable` segment, if any.
    #[must_use]
    pub fn first_variable(&self) -> Option<usize> {
        self.0
            .iter()
            .position(|element| matches!(element, DirElement::Variable(_)))
    }

    #[must_use]
    pub fn elements(&self) -> &[DirElement] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<DirElement>> for Directory {
    fn from(elements: Vec<DirElement>) -> Self {
        Self(elements)
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for element in &self.0 {
            write!(f, "/{element}")?;
        }
        Ok(())
    }
}

/// Format a literal path the same way a `Directory` displays.
#[must_use]
pub fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        return "/".to_owned();
    }
    path.iter().map(|name| format!("/{name}")).collect()
}
