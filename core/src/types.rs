//! Arity, lifecycle and value types shared by options, registries and the
//! parser.
//!
//! These are plain data types. They carry no parsing behavior of their own
//! beyond the arity arithmetic in [`ValueCount`], and they serialize with
//! [`serde`] so that the declared option surface and parse results can be
//! written out as JSON or YAML.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How many raw values an option, or the positional list, may accept.
///
/// For an option this only matters once the option is given: an absent
/// option never has values, whatever its count. For positionals the count is
/// checked after every argument has been consumed.
///
/// # Examples
///
/// ```
/// use argspec_core::ValueCount;
///
/// assert!(ValueCount::OneOrMore.accepts(3));
/// assert!(!ValueCount::Two.accepts(3));
/// assert_eq!(ValueCount::Two.minimum(), 2);
/// assert_eq!(ValueCount::ZeroOrMore.maximum(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueCount {
    /// No values at all (flags; a parser that forbids positionals).
    Zero,
    /// At most one value.
    ZeroOrOne,
    /// Any number of values (the default positional policy).
    #[default]
    ZeroOrMore,
    /// Exactly one value.
    One,
    /// At least one value.
    OneOrMore,
    /// Exactly two values.
    Two,
    /// Exactly three values.
    Three,
    /// Exactly four values.
    Four,
}

impl ValueCount {
    /// Smallest number of values that satisfies this count.
    pub const fn minimum(self) -> usize {
        match self {
            Self::Zero | Self::ZeroOrOne | Self::ZeroOrMore => 0,
            Self::One | Self::OneOrMore => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Largest number of values allowed, or `None` when unbounded.
    pub const fn maximum(self) -> Option<usize> {
        match self {
            Self::Zero => Some(0),
            Self::ZeroOrOne | Self::One => Some(1),
            Self::Two => Some(2),
            Self::Three => Some(3),
            Self::Four => Some(4),
            Self::ZeroOrMore | Self::OneOrMore => None,
        }
    }

    /// Returns `true` if `count` values satisfy this count.
    pub fn accepts(self, count: usize) -> bool {
        count >= self.minimum() && self.maximum().is_none_or(|max| count <= max)
    }

    /// Returns `true` while fewer than the maximum number of values are held.
    pub fn has_room(self, count: usize) -> bool {
        self.maximum().is_none_or(|max| count < max)
    }

    /// The wording used in error messages, e.g. `"one or more"`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Zero => "no",
            Self::ZeroOrOne => "zero or one",
            Self::ZeroOrMore => "zero or more",
            Self::One => "one",
            Self::OneOrMore => "one or more",
            Self::Two => "two",
            Self::Three => "three",
            Self::Four => "four",
        }
    }
}

impl fmt::Display for ValueCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of a single option during one parse.
///
/// Every option starts [`NotGiven`](OptionState::NotGiven), becomes
/// [`Given`](OptionState::Given) the moment its name is recognized, and
/// [`HadValue`](OptionState::HadValue) once at least one value is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptionState {
    #[default]
    NotGiven,
    Given,
    HadValue,
}

impl fmt::Display for OptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotGiven => "not given",
            Self::Given => "given",
            Self::HadValue => "had value",
        })
    }
}

/// The kind of value an option produces. Fixed when the option is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Flag,
    Int,
    Real,
    Str,
    StrList,
    IntList,
    RealList,
}

impl ValueType {
    /// Returns `true` for the list kinds.
    pub const fn is_list(self) -> bool {
        matches!(self, Self::StrList | Self::IntList | Self::RealList)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flag => "flag",
            Self::Int => "int",
            Self::Real => "real",
            Self::Str => "str",
            Self::StrList => "str list",
            Self::IntList => "int list",
            Self::RealList => "real list",
        })
    }
}

/// A typed option value as read back after parsing.
///
/// Reading never produces a "missing" marker: an option with no bound value
/// reads as its default, and list options read as an empty list.
///
/// # Examples
///
/// ```
/// use argspec_core::Value;
///
/// assert_eq!(Value::Int(7).to_string(), "7");
/// assert_eq!(Value::StrList(vec!["a".into(), "b".into()]).to_string(), "a b");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Flag(bool),
    Int(i64),
    Real(f64),
    Str(String),
    StrList(Vec<String>),
    IntList(Vec<i64>),
    RealList(Vec<f64>),
}

impl Value {
    /// The [`ValueType`] this value belongs to.
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Flag(_) => ValueType::Flag,
            Self::Int(_) => ValueType::Int,
            Self::Real(_) => ValueType::Real,
            Self::Str(_) => ValueType::Str,
            Self::StrList(_) => ValueType::StrList,
            Self::IntList(_) => ValueType::IntList,
            Self::RealList(_) => ValueType::RealList,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(items: &[T]) -> String {
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        }

        match self {
            Self::Flag(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
            Self::StrList(values) => f.write_str(&join(values)),
            Self::IntList(values) => f.write_str(&join(values)),
            Self::RealList(values) => f.write_str(&join(values)),
        }
    }
}
