//! Settings that hold a value per symbol, written in a single property as
//! `[USDT]2000.0,[ADA;ETH]100.0`.
//!
//! ```text
//! spec   := group (',' group)*
//! group  := ('[' symbol (';' symbol)* ']')? value
//! ```
//!
//! A group without brackets applies to the reference symbol, stored under [`DEFAULT_KEY`].
//! Later groups overwrite earlier ones for the same symbol.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use dashmap::DashMap;

/// The reference symbol, used when a group names no symbol
pub const DEFAULT_KEY: &str = "";

/// Per symbol values that can be read and overwritten concurrently.
///
/// Cloning copies the values, the clone and the original never share storage.
#[derive(Clone)]
pub struct GroupedSetting<T> {
    values: DashMap<String, T>,
}

impl<T> Default for GroupedSetting<T> {
    fn default() -> Self {
        Self {
            values: DashMap::new(),
        }
    }
}

impl<T: Debug> Debug for GroupedSetting<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for e in self.values.iter() {
            map.entry(e.key(), e.value());
        }
        map.finish()
    }
}

impl<T: Clone> GroupedSetting<T> {
    pub fn new() -> Self { Self::default() }

    /// Sets the value of a symbol, returning the previous one
    pub fn put(&self, symbol: &str, value: T) -> Option<T> { self.values.insert(symbol.to_string(), value) }

    /// Sets the same value for every symbol, or for the reference symbol if there are none
    pub fn put_all(&self, symbols: &[&str], value: T) {
        if symbols.is_empty() {
            self.put(DEFAULT_KEY, value);
        } else {
            for symbol in symbols {
                self.put(symbol, value.clone());
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<T> { self.values.get(symbol).map(|v| v.value().clone()) }

    pub fn get_or(&self, symbol: &str, default: T) -> T { self.get(symbol).unwrap_or(default) }

    /// Value of the reference symbol
    pub fn default_value(&self) -> Option<T> { self.get(DEFAULT_KEY) }

    pub fn remove(&self, symbol: &str) -> Option<T> { self.values.remove(symbol).map(|(_, v)| v) }

    pub fn contains(&self, symbol: &str) -> bool { self.values.contains_key(symbol) }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn symbols(&self) -> Vec<String> { self.values.iter().map(|e| e.key().clone()).collect() }

    /// A point in time copy of all values
    pub fn to_map(&self) -> HashMap<String, T> {
        self.values
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    pub fn view(&self) -> GroupedSettingView<'_, T> { GroupedSettingView(self) }
}

/// Read only access to a [`GroupedSetting`], writes made through the owner remain visible
#[derive(Clone, Copy)]
pub struct GroupedSettingView<'a, T>(&'a GroupedSetting<T>);

impl<'a, T: Clone> GroupedSettingView<'a, T> {
    pub fn get(&self, symbol: &str) -> Option<T> { self.0.get(symbol) }

    pub fn contains(&self, symbol: &str) -> bool { self.0.contains(symbol) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn symbols(&self) -> Vec<String> { self.0.symbols() }

    pub fn to_map(&self) -> HashMap<String, T> { self.0.to_map() }
}

impl<'a, T: Debug> Debug for GroupedSettingView<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { self.0.fmt(f) }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GroupedSettingError<E> {
    #[error("{0}")]
    Syntax(String),
    #[error(transparent)]
    Convert(E),
}

fn syntax<E>(group: &str, reason: &str) -> GroupedSettingError<E> {
    GroupedSettingError::Syntax(format!("{} in group '{}'", reason, group))
}

/// Splits a single group into its symbols and its raw value
fn split_group(group: &str) -> Result<(Vec<&str>, &str), String> {
    let Some(rest) = group.strip_prefix('[') else {
        if group.contains(']') {
            return Err("unexpected ']'".to_string());
        }
        return Ok((vec![], group));
    };
    let (symbols, value) = rest.split_once(']').ok_or_else(|| "missing ']'".to_string())?;
    if symbols.contains('[') {
        return Err("unexpected '['".to_string());
    }
    let symbols: Vec<&str> = symbols.split(';').map(str::trim).collect();
    if symbols.iter().all(|s| s.is_empty()) {
        return Err("no symbol between brackets".to_string());
    }
    if symbols.iter().any(|s| s.is_empty()) {
        return Err("empty symbol".to_string());
    }
    Ok((symbols, value.trim()))
}

/// Parses `spec` into a new setting, converting each group value with `convert`.
///
/// An empty spec yields an empty setting. Conversion errors are returned as they are, wrapped in
/// [`GroupedSettingError::Convert`].
pub fn parse_grouped_setting<T, E, F>(spec: &str, convert: F) -> Result<GroupedSetting<T>, GroupedSettingError<E>>
where
    T: Clone,
    F: FnMut(&str) -> Result<T, E>,
{
    let setting = GroupedSetting::new();
    parse_grouped_setting_into(spec, convert, &setting)?;
    Ok(setting)
}

/// Same as [`parse_grouped_setting`] but writes into an existing setting, values already there for other
/// symbols are kept. Groups before a failing one are written.
pub fn parse_grouped_setting_into<T, E, F>(
    spec: &str,
    mut convert: F,
    target: &GroupedSetting<T>,
) -> Result<(), GroupedSettingError<E>>
where
    T: Clone,
    F: FnMut(&str) -> Result<T, E>,
{
    if spec.trim().is_empty() {
        return Ok(());
    }
    for group in spec.split(',').map(str::trim) {
        if group.is_empty() {
            return Err(syntax(group, "empty group"));
        }
        let (symbols, raw) = split_group(group).map_err(|reason| syntax(group, &reason))?;
        if raw.is_empty() {
            return Err(syntax(group, "missing value"));
        }
        let value = convert(raw).map_err(GroupedSettingError::Convert)?;
        trace!(?symbols, value = raw, "grouped setting");
        target.put_all(&symbols, value);
    }
    Ok(())
}
