//! The option model: one [`ArgOption`] per declared flag or value option.
//!
//! Option kinds form a closed set, so each kind is an arm of [`OptionKind`]
//! carrying its own typed default, bound value and validator. Everything the
//! parser needs ("does it want a value", "bind this text", "is the final
//! count acceptable") is answered by matching on that arm.

use std::fmt;
use std::marker::PhantomData;

use crate::types::{OptionState, Value, ValueCount, ValueType};
use crate::validate::Validator;

/// State of a single-value option (int, real or string).
pub(crate) struct Single<T> {
    pub(crate) default: T,
    pub(crate) allow_implicit: bool,
    pub(crate) validator: Validator<T>,
    pub(crate) value: Option<T>,
}

impl<T> Single<T> {
    pub(crate) fn new(default: T, validator: Validator<T>) -> Self {
        Self {
            default,
            allow_implicit: false,
            validator,
            value: None,
        }
    }
}

/// State of a multi-value option.
pub(crate) struct Multi<T> {
    pub(crate) count: ValueCount,
    pub(crate) validator: Validator<T>,
    pub(crate) values: Vec<T>,
}

impl<T> Multi<T> {
    pub(crate) fn new(validator: Validator<T>) -> Self {
        Self {
            count: ValueCount::OneOrMore,
            validator,
            values: Vec::new(),
        }
    }
}

pub(crate) enum OptionKind {
    Flag { value: bool },
    Int(Single<i64>),
    Real(Single<f64>),
    Str(Single<String>),
    StrList(Multi<String>),
    IntList(Multi<i64>),
    RealList(Multi<f64>),
}

/// A declared option and its per-parse state.
pub struct ArgOption {
    long_name: String,
    short_name: Option<char>,
    help: String,
    var_name: String,
    hidden: bool,
    required: bool,
    state: OptionState,
    pub(crate) kind: OptionKind,
}

impl ArgOption {
    /// Creates an option whose short name is the first character of the long
    /// name and whose variable name is the upper-cased long name.
    pub(crate) fn new(long_name: &str, help: &str, kind: OptionKind) -> Self {
        Self {
            long_name: long_name.to_string(),
            short_name: long_name.chars().next(),
            help: help.to_string(),
            var_name: long_name.to_uppercase(),
            hidden: false,
            required: false,
            state: OptionState::NotGiven,
            kind,
        }
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Placeholder used for this option's values in usage text.
    pub fn var_name(&self) -> &str {
        &self.var_name
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn state(&self) -> OptionState {
        self.state
    }

    /// Returns `true` once the option's name has been seen in this parse.
    pub fn given(&self) -> bool {
        self.state != OptionState::NotGiven
    }

    pub fn value_type(&self) -> ValueType {
        match &self.kind {
            OptionKind::Flag { .. } => ValueType::Flag,
            OptionKind::Int(_) => ValueType::Int,
            OptionKind::Real(_) => ValueType::Real,
            OptionKind::Str(_) => ValueType::Str,
            OptionKind::StrList(_) => ValueType::StrList,
            OptionKind::IntList(_) => ValueType::IntList,
            OptionKind::RealList(_) => ValueType::RealList,
        }
    }

    /// The effective arity: `Zero` for flags, `ZeroOrOne` for single-value
    /// options that allow an implicit value, `One` for the other single-value
    /// options, and the declared count for list options.
    pub fn value_count(&self) -> ValueCount {
        match &self.kind {
            OptionKind::Flag { .. } => ValueCount::Zero,
            OptionKind::Int(single) => single_count(single.allow_implicit),
            OptionKind::Real(single) => single_count(single.allow_implicit),
            OptionKind::Str(single) => single_count(single.allow_implicit),
            OptionKind::StrList(multi) => multi.count,
            OptionKind::IntList(multi) => multi.count,
            OptionKind::RealList(multi) => multi.count,
        }
    }

    /// Returns `true` if a single-value option may be given without a value.
    pub fn allows_implicit(&self) -> bool {
        match &self.kind {
            OptionKind::Int(single) => single.allow_implicit,
            OptionKind::Real(single) => single.allow_implicit,
            OptionKind::Str(single) => single.allow_implicit,
            _ => false,
        }
    }

    /// Number of values bound in this parse.
    pub fn bound_count(&self) -> usize {
        match &self.kind {
            OptionKind::Flag { .. } => 0,
            OptionKind::Int(single) => usize::from(single.value.is_some()),
            OptionKind::Real(single) => usize::from(single.value.is_some()),
            OptionKind::Str(single) => usize::from(single.value.is_some()),
            OptionKind::StrList(multi) => multi.values.len(),
            OptionKind::IntList(multi) => multi.values.len(),
            OptionKind::RealList(multi) => multi.values.len(),
        }
    }

    /// Returns `true` while the option is given and can still bind values.
    pub fn wants_value(&self) -> bool {
        self.given() && self.value_count().has_room(self.bound_count())
    }

    /// Returns `true` if the option is acceptable as it stands, without any
    /// further value.
    pub fn can_stand(&self) -> bool {
        self.value_count().accepts(self.bound_count())
    }

    /// Marks the option as seen. An option that already holds a value keeps
    /// its `HadValue` state.
    pub(crate) fn mark_given(&mut self) {
        if self.state == OptionState::NotGiven {
            self.state = OptionState::Given;
        }
        if let OptionKind::Flag { value } = &mut self.kind {
            *value = true;
        }
    }

    /// Runs the validator over `raw` and binds the result.
    ///
    /// On failure the option keeps its current state and the validator's
    /// message is returned.
    ///
    /// # Panics
    ///
    /// Panics if called on a flag: flags never bind values.
    pub(crate) fn add_value(&mut self, raw: &str) -> Result<(), String> {
        let name = self.long_name.as_str();
        match &mut self.kind {
            OptionKind::Flag { .. } => {
                panic!("BUG: flag --{name} cannot bind the value {raw:?}")
            }
            OptionKind::Int(single) => single.value = Some((single.validator)(name, raw)?),
            OptionKind::Real(single) => single.value = Some((single.validator)(name, raw)?),
            OptionKind::Str(single) => single.value = Some((single.validator)(name, raw)?),
            OptionKind::StrList(multi) => multi.values.push((multi.validator)(name, raw)?),
            OptionKind::IntList(multi) => multi.values.push((multi.validator)(name, raw)?),
            OptionKind::RealList(multi) => multi.values.push((multi.validator)(name, raw)?),
        }
        self.state = OptionState::HadValue;
        Ok(())
    }

    /// Checks the bound value count against the option's arity.
    ///
    /// Options that were never given always pass.
    ///
    /// # Panics
    ///
    /// Panics if a flag has somehow reached `HadValue`.
    pub(crate) fn check(&self) -> Result<(), String> {
        let count = self.value_count();
        if count == ValueCount::Zero {
            if self.state == OptionState::HadValue {
                panic!("BUG: flag --{} holds a value", self.long_name);
            }
            return Ok(());
        }
        if !self.given() {
            return Ok(());
        }

        let bound = self.bound_count();
        if count.accepts(bound) {
            return Ok(());
        }
        if count == ValueCount::One && bound == 0 {
            return Err(format!(
                "expected exactly one value for {}, got none",
                self.long_name
            ));
        }
        Err(format!(
            "expected {count} values for {}, got {bound}",
            self.long_name
        ))
    }

    /// The bound value, else the default, else the kind's empty value.
    pub fn value(&self) -> Value {
        match &self.kind {
            OptionKind::Flag { value } => Value::Flag(*value),
            OptionKind::Int(single) => Value::Int(single.value.unwrap_or(single.default)),
            OptionKind::Real(single) => Value::Real(single.value.unwrap_or(single.default)),
            OptionKind::Str(single) => Value::Str(
                single
                    .value
                    .clone()
                    .unwrap_or_else(|| single.default.clone()),
            ),
            OptionKind::StrList(multi) => Value::StrList(multi.values.clone()),
            OptionKind::IntList(multi) => Value::IntList(multi.values.clone()),
            OptionKind::RealList(multi) => Value::RealList(multi.values.clone()),
        }
    }

    /// The default rendered for help text, if the kind has one worth showing.
    pub fn default_text(&self) -> Option<String> {
        match &self.kind {
            OptionKind::Int(single) => Some(single.default.to_string()),
            OptionKind::Real(single) => Some(single.default.to_string()),
            OptionKind::Str(single) if !single.default.is_empty() => {
                Some(single.default.clone())
            }
            _ => None,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.state = OptionState::NotGiven;
        match &mut self.kind {
            OptionKind::Flag { value } => *value = false,
            OptionKind::Int(single) => single.value = None,
            OptionKind::Real(single) => single.value = None,
            OptionKind::Str(single) => single.value = None,
            OptionKind::StrList(multi) => multi.values.clear(),
            OptionKind::IntList(multi) => multi.values.clear(),
            OptionKind::RealList(multi) => multi.values.clear(),
        }
    }

    pub(crate) fn set_short_name(&mut self, short: Option<char>) {
        self.short_name = short;
    }

    pub(crate) fn set_var_name(&mut self, var_name: &str) {
        self.var_name = var_name.to_string();
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub(crate) fn set_required(&mut self, required: bool) {
        self.required = required;
    }
}

impl fmt::Debug for ArgOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgOption")
            .field("long_name", &self.long_name)
            .field("short_name", &self.short_name)
            .field("value_type", &self.value_type())
            .field("value_count", &self.value_count())
            .field("state", &self.state)
            .field("value", &self.value())
            .finish_non_exhaustive()
    }
}

const fn single_count(allow_implicit: bool) -> ValueCount {
    if allow_implicit {
        ValueCount::ZeroOrOne
    } else {
        ValueCount::One
    }
}

/// Location of an option: registry index (0 is the main registry) and
/// declaration index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionId {
    pub command: usize,
    pub index: usize,
}

/// Typed handle returned by the option factories.
///
/// The handle stays valid for the lifetime of the parser that issued it and
/// reads back as `T` through [`Parser::value`](crate::Parser::value).
pub struct Arg<T> {
    id: OptionId,
    marker: PhantomData<fn() -> T>,
}

impl<T> Arg<T> {
    pub(crate) const fn new(id: OptionId) -> Self {
        Self {
            id,
            marker: PhantomData,
        }
    }

    pub const fn id(&self) -> OptionId {
        self.id
    }

    /// Drops the static type; the handle then reads back as a [`Value`].
    pub const fn untyped(self) -> Arg<Value> {
        Arg::new(self.id)
    }
}

impl<T> Clone for Arg<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Arg<T> {}

impl<T> fmt::Debug for Arg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Arg").field(&self.id).finish()
    }
}

/// Conversion from a [`Value`] into the Rust type behind an [`Arg`] handle.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Flag(value) => Some(value),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(value) => Some(value),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Real(value) => Some(value),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl FromValue for Vec<String> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::StrList(values) => Some(values),
            _ => None,
        }
    }
}

impl FromValue for Vec<i64> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::IntList(values) => Some(values),
            _ => None,
        }
    }
}

impl FromValue for Vec<f64> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::RealList(values) => Some(values),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{int_range_validator, int_validator, str_validator};

    fn int_option(name: &str) -> ArgOption {
        ArgOption::new(name, "", OptionKind::Int(Single::new(7, int_validator())))
    }

    #[test]
    fn test_derived_names() {
        let option = int_option("maxwidth");
        assert_eq!(option.short_name(), Some('m'));
        assert_eq!(option.var_name(), "MAXWIDTH");
        assert_eq!(option.state(), OptionState::NotGiven);
    }

    #[test]
    fn test_value_falls_back_to_default() {
        let mut option = int_option("width");
        assert_eq!(option.value(), Value::Int(7));
        option.mark_given();
        assert_eq!(option.value(), Value::Int(7));
        option.add_value("12").unwrap();
        assert_eq!(option.value(), Value::Int(12));
        assert_eq!(option.state(), OptionState::HadValue);
    }

    #[test]
    fn test_failed_binding_keeps_state() {
        let mut option = ArgOption::new(
            "count",
            "",
            OptionKind::Int(Single::new(0, int_range_validator(0, 100))),
        );
        option.mark_given();
        let err = option.add_value("150").unwrap_err();
        assert_eq!(err, "option count's maximum is 100, got 150");
        assert_eq!(option.state(), OptionState::Given);
        assert_eq!(option.value(), Value::Int(0));
    }

    #[test]
    fn test_single_wants_one_value() {
        let mut option = int_option("width");
        assert!(!option.wants_value());
        option.mark_given();
        assert!(option.wants_value());
        assert!(!option.can_stand());
        option.add_value("3").unwrap();
        assert!(!option.wants_value());
        assert!(option.can_stand());
    }

    #[test]
    fn test_implicit_value_can_stand() {
        let mut option = int_option("verbose");
        if let OptionKind::Int(single) = &mut option.kind {
            single.allow_implicit = true;
        }
        option.mark_given();
        assert_eq!(option.value_count(), ValueCount::ZeroOrOne);
        assert!(option.can_stand());
        assert!(option.check().is_ok());
    }

    #[test]
    fn test_missing_value_message() {
        let mut option = int_option("width");
        option.mark_given();
        assert_eq!(
            option.check(),
            Err("expected exactly one value for width, got none".to_string())
        );
    }

    #[test]
    fn test_list_count_check() {
        let mut option = ArgOption::new(
            "pair",
            "",
            OptionKind::StrList(Multi::new(str_validator())),
        );
        if let OptionKind::StrList(multi) = &mut option.kind {
            multi.count = ValueCount::Two;
        }
        option.mark_given();
        option.add_value("a").unwrap();
        assert!(option.wants_value());
        assert_eq!(
            option.check(),
            Err("expected two values for pair, got 1".to_string())
        );
        option.add_value("b").unwrap();
        assert!(!option.wants_value());
        assert!(option.check().is_ok());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut option = ArgOption::new("all", "", OptionKind::Flag { value: false });
        option.mark_given();
        assert_eq!(option.value(), Value::Flag(true));
        option.reset();
        assert_eq!(option.value(), Value::Flag(false));
        assert!(!option.given());
    }

    #[test]
    #[should_panic(expected = "BUG")]
    fn test_flag_rejects_values() {
        let mut option = ArgOption::new("all", "", OptionKind::Flag { value: false });
        option.mark_given();
        let _ = option.add_value("yes");
    }
}
