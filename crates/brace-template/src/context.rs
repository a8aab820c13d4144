/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Context values.
//!
//! A [`Context`] is the read-only tree a template is rendered against. Maps
//! keep insertion order and lists keep element order, so loop output is
//! deterministic.
//!
//! Contexts deserialize from any self-describing serde format (TOML, JSON).
//! Template values are all text, so scalars are converted on the way in:
//!
//! - booleans become `"true"` / `"false"`
//! - numbers become their decimal text
//! - nulls are dropped from maps and lists

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Ordered mapping used for map contexts.
pub type ContextMap = IndexMap<String, Context>;

/// A value that can be used in template evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Context {
    /// A string value.
    String(String),

    /// A map of string keys to values, in insertion order.
    Map(ContextMap),

    /// A list of values.
    List(Vec<Context>),
}

impl Context {
    /// An empty map context.
    pub fn map() -> Self {
        Context::Map(ContextMap::new())
    }

    /// Look up a name directly in this context.
    ///
    /// Only map contexts bind names. There are no nested paths: `a.b` is
    /// looked up as the single key `"a.b"`.
    pub fn get(&self, name: &str) -> Option<&Context> {
        match self {
            Context::Map(m) => m.get(name),
            _ => None,
        }
    }

    /// Insert a binding, turning a non-map context into a map first.
    ///
    /// Returns the previous value bound to `key`, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Context>) -> Option<Context> {
        if !matches!(self, Context::Map(_)) {
            *self = Context::map();
        }
        match self {
            Context::Map(m) => m.insert(key.into(), value.into()),
            _ => None,
        }
    }

    /// Builder form of [`Context::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Context>) -> Self {
        self.insert(key, value);
        self
    }

    /// Check if this value is "truthy" for conditional evaluation.
    ///
    /// Only the string `"false"` is falsy. Empty strings, empty lists and
    /// empty maps are all truthy; absent names are handled by the caller.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Context::String(s) if s == "false")
    }

    /// The string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Context::String(s) => Some(s),
            _ => None,
        }
    }

    /// The items, if this is a list.
    pub fn as_list(&self) -> Option<&[Context]> {
        match self {
            Context::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ContextMap> {
        match self {
            Context::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Merge the bindings of `other` over this map.
    ///
    /// Keys already present keep their position and take the new value; new
    /// keys are appended. A non-map `other` is ignored.
    pub fn overlay(mut self, other: &Context) -> Self {
        if let Context::Map(m) = other {
            for (key, value) in m {
                self.insert(key.clone(), value.clone());
            }
        }
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::map()
    }
}

impl From<String> for Context {
    fn from(s: String) -> Self {
        Context::String(s)
    }
}

impl From<&str> for Context {
    fn from(s: &str) -> Self {
        Context::String(s.to_string())
    }
}

impl From<Vec<Context>> for Context {
    fn from(items: Vec<Context>) -> Self {
        Context::List(items)
    }
}

impl From<ContextMap> for Context {
    fn from(m: ContextMap) -> Self {
        Context::Map(m)
    }
}

impl<K: Into<String>, V: Into<Context>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Context::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

struct ContextVisitor;

impl<'de> Visitor<'de> for ContextVisitor {
    type Value = Context;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, boolean, number, list or map")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Context, E> {
        Ok(Context::String(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Context, E> {
        Ok(Context::String(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Context, E> {
        Ok(Context::String(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Context, E> {
        Ok(Context::String(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Context, E> {
        Ok(Context::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Context, E> {
        Ok(Context::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Context, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Option<Context>>()? {
            items.extend(item);
        }
        Ok(Context::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Context, A::Error> {
        let mut entries = ContextMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Option<Context>>()? {
            if let Some(value) = value {
                entries.insert(key, value);
            }
        }
        Ok(Context::Map(entries))
    }
}

impl<'de> Deserialize<'de> for Context {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ContextVisitor)
    }
}
