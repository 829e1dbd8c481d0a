use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Non-fatal advisory attached to a computed result.
///
/// Degenerate-but-valid numeric situations (zero volatility, zero beta,
/// substituted risk-free rate) resolve to a defined sentinel value and one
/// of these, never to an error or a global warning stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub code: String,
    pub message: String,
}

impl Notice {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A computed value together with the advisory notices accumulated while
/// computing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Computed<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

impl<T> Computed<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            notices: Vec::new(),
        }
    }

    pub fn with_notices(value: T, notices: Vec<Notice>) -> Self {
        Self { value, notices }
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn extend(&mut self, notices: impl IntoIterator<Item = Notice>) {
        self.notices.extend(notices);
    }

    /// Map the value while carrying the notices along.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Computed<U> {
        Computed {
            value: f(self.value),
            notices: self.notices,
        }
    }

    /// Consume the carrier, folding its notices into an external collector.
    pub fn unwrap_into(self, collector: &mut Vec<Notice>) -> T {
        collector.extend(self.notices);
        self.value
    }
}
