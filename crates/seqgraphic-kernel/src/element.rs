//! Row/column identifiers.
//!
//! An element names one line of the matrix. The raw integer encoding used by
//! decomposition code maps row `r` to `-(r+1)`, column `c` to `c+1` and keeps
//! `0` for "no element"; here "no element" is `Option::None`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A row or a column of the matrix (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    Row(usize),
    Column(usize),
}

impl Element {
    pub fn is_row(self) -> bool {
        matches!(self, Element::Row(_))
    }

    pub fn is_column(self) -> bool {
        matches!(self, Element::Column(_))
    }

    /// The same index viewed from the transposed matrix.
    pub fn transpose(self) -> Self {
        match self {
            Element::Row(r) => Element::Column(r),
            Element::Column(c) => Element::Row(c),
        }
    }

    /// Raw signed encoding: rows negative, columns positive.
    pub fn to_raw(self) -> i64 {
        match self {
            Element::Row(r) => -(r as i64) - 1,
            Element::Column(c) => c as i64 + 1,
        }
    }

    /// Inverse of [`Element::to_raw`]; `0` is "none".
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => None,
            r if r < 0 => Some(Element::Row((-r - 1) as usize)),
            c => Some(Element::Column((c - 1) as usize)),
        }
    }

    /// Identity element maps `r0..r{n-1}`.
    pub fn rows(count: usize) -> Vec<Self> {
        (0..count).map(Element::Row).collect()
    }

    /// Identity element maps `c0..c{n-1}`.
    pub fn columns(count: usize) -> Vec<Self> {
        (0..count).map(Element::Column).collect()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Row(r) => write!(f, "r{}", r + 1),
            Element::Column(c) => write!(f, "c{}", c + 1),
        }
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, digits) = s.split_at(s.find(|ch: char| ch.is_ascii_digit()).unwrap_or(s.len()));
        let index: usize = digits
            .parse()
            .map_err(|_| format!("element `{s}` has no 1-based index"))?;
        if index == 0 {
            return Err(format!("element `{s}` must be 1-based"));
        }
        match kind {
            "r" => Ok(Element::Row(index - 1)),
            "c" => Ok(Element::Column(index - 1)),
            _ => Err(format!("element `{s}` must start with `r` or `c`")),
        }
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
