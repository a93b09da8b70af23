//! Untyped log arguments.
//!
//! The unformatted logging calls take a list of loosely typed operands and glue
//! them into one message. Strings are joined as-is; a space is inserted between
//! two neighbours only when neither of them is a string, so `["id", 7]` renders
//! as `id7` while `[1, 2]` renders as `1 2`.

use std::fmt::{self, Write};

/// One operand of an unformatted log call.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// Pre-rendered `Debug` output of an arbitrary value.
    Debug(String),
}

impl Value {
    /// Captures any `Debug` value, e.g. a struct passed to `info!`.
    pub fn debug(value: &impl fmt::Debug) -> Self {
        Self::Debug(format!("{value:?}"))
    }

    /// Captures any `Display` value as a string operand.
    pub fn display(value: &impl fmt::Display) -> Self {
        Self::Str(value.to_string())
    }

    const fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) | Self::Debug(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => f.write_char(*c),
        }
    }
}

/// Joins operands into one message.
#[must_use]
pub fn concat(values: &[Value]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 && !value.is_str() && !values[i - 1].is_str() {
            out.push(' ');
        }
        let _ = write!(out, "{value}");
    }
    out
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::$variant(<$target>::from(n))
                }
            }
        )*
    };
}

impl_from_int!(Int, i64, i8, i16, i32, i64);
impl_from_int!(Uint, u64, u8, u16, u32, u64);
impl_from_int!(Float, f64, f32, f64);

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Uint(n as u64)
    }
}

impl From<isize> for Value {
    fn from(n: isize) -> Self {
        Self::Int(n as i64)
    }
}
