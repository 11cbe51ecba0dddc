use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Memory layout convention of a tensor buffer.
///
/// Serialized as its single-character tag; deserializing goes through
/// [`Order::from_char`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum Order {
    /// Row-major: last dimension varies fastest.
    #[default]
    C,
    /// Column-major: first dimension varies fastest.
    F,
}

impl Order {
    /// Parse the single-character ordering tag (`'c'` or `'f'`, any case).
    pub fn from_char(c: char) -> Result<Self, CoreError> {
        match c.to_ascii_lowercase() {
            'c' => Ok(Order::C),
            'f' => Ok(Order::F),
            _ => Err(CoreError::InvalidOrder(c)),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Order::C => 'c',
            Order::F => 'f',
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Order {
    type Error = CoreError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Order::from_char(c)
    }
}

impl From<Order> for char {
    fn from(order: Order) -> Self {
        order.as_char()
    }
}
