//! Bracket-path directive decoding
//!
//! Grammar per parameter key, anchored at the start:
//! `prefix` `[<index>]`? `[<key>]` `[<subkey>]`?
//!
//! - no index: value stored in the directive's un-indexed entry (top-level
//!   `search[value]` / `search[regex]`)
//! - index, no subkey: stored at `directive[index][key]`
//! - index and subkey: stored one level deep at `directive[index][key][subkey]`

use std::collections::{BTreeMap, HashMap};

use regex::Regex;

use super::value::ParamValue;

/// One indexed entry of a directive
pub type DirectiveEntry = BTreeMap<String, ParamValue>;

/// A parsed, indexed set of key-value instructions for one concern
/// (columns, ordering, or search). Built fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    top: DirectiveEntry,
    indexed: BTreeMap<usize, DirectiveEntry>,
}

impl Directive {
    /// Entries that carried no index segment
    pub fn top(&self) -> &DirectiveEntry {
        &self.top
    }

    /// Entry for the given index, if any
    pub fn entry(&self, index: usize) -> Option<&DirectiveEntry> {
        self.indexed.get(&index)
    }

    /// Indexed entries in ascending index order
    pub fn entries(&self) -> impl Iterator<Item = (usize, &DirectiveEntry)> {
        self.indexed.iter().map(|(i, entry)| (*i, entry))
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.indexed.len()
    }

    /// True when neither indexed nor un-indexed entries were decoded
    pub fn is_empty(&self) -> bool {
        self.indexed.is_empty() && self.top.is_empty()
    }
}

/// Decode every parameter matching `prefix`'s bracket-path grammar into a
/// directive. Non-matching keys are skipped, so decoding never fails; the
/// same map always decodes to the same structure.
pub fn decode(params: &HashMap<String, String>, prefix: &str) -> Directive {
    let pattern = format!(
        r"^{}(?:\[(\d+)\])?\[(\w+)\](?:\[(\w+)\])?",
        regex::escape(prefix)
    );
    let grammar = Regex::new(&pattern).expect("directive grammar pattern is well-formed");

    let mut directive = Directive::default();

    for (param, raw) in params {
        let Some(caps) = grammar.captures(param) else {
            continue;
        };

        let index = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok());
        let key = &caps[2];
        let subkey = caps.get(3).map(|m| m.as_str());

        let entry = match index {
            Some(i) => directive.indexed.entry(i).or_default(),
            None => &mut directive.top,
        };

        match subkey {
            None => {
                entry.insert(key.to_string(), ParamValue::coerce(key, raw));
            }
            Some(sub) => {
                let dotted = format!("{}.{}", key, sub);
                let nested = entry
                    .entry(key.to_string())
                    .or_insert_with(|| ParamValue::Map(BTreeMap::new()));
                if let ParamValue::Map(map) = nested {
                    map.insert(sub.to_string(), ParamValue::coerce(&dotted, raw));
                }
            }
        }
    }

    directive
}
