use std::fmt;

use super::types::SourceKind;

/// Why a field could not be resolved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Unavailable {
    /// Nothing tried to resolve the field.
    NotResolved,

    /// The source answered but did not carry the field.
    Missing {
        /// Source that was consulted
        source: SourceKind,
        /// Strategy that came up empty
        strategy: &'static str,
    },

    /// The source itself could not be fetched.
    SourceFailed {
        /// Source that failed
        source: SourceKind,
        /// Error reported by the provider
        message: String,
    },
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotResolved => write!(f, "not resolved"),
            Self::Missing { source, strategy } => {
                write!(f, "{} missing from {}", strategy, source)
            }
            Self::SourceFailed { source, message } => {
                write!(f, "{} failed: {}", source, message)
            }
        }
    }
}

/// A resolved value, or the reason it is unavailable.
///
/// Used instead of a bare `Option` so that every consumer has to decide what
/// an unavailable field means, and so the reason can be logged.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup<T> {
    Value(T),
    Unavailable(Unavailable),
}

impl<T> Lookup<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unavailable(_) => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unavailable(_) => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn reason(&self) -> Option<&Unavailable> {
        match self {
            Self::Value(_) => None,
            Self::Unavailable(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Value(v) => Lookup::Value(f(v)),
            Self::Unavailable(reason) => Lookup::Unavailable(reason),
        }
    }
}

impl<T: Copy> Lookup<T> {
    /// Copy the value out, if there is one.
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

impl<T> Default for Lookup<T> {
    fn default() -> Self {
        Self::Unavailable(Unavailable::NotResolved)
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Value(v),
            None => Self::default(),
        }
    }
}
