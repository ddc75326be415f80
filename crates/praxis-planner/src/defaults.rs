// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Per-tool default arguments applied by planning path B (spec §4.4 path B
//! step 3: "Apply per-tool default arguments when missing… skipping
//! arguments whose string form is blank").

use praxis_types::{ArgMap, DslValue};

/// `(tool_name, arg_name, default_value)` triples. Kept as a flat table
/// rather than a nested map since the spec names exactly one example
/// (`list_files.directory`) and the set is expected to stay small.
const DEFAULTS: &[(&str, &str, &str)] = &[("list_files", "directory", "/shared")];

pub fn apply_defaults(tool_name: &str, args: &mut ArgMap) {
    for (tool, key, value) in DEFAULTS {
        if *tool != tool_name {
            continue;
        }
        let missing_or_blank = match args.get(*key) {
            None => true,
            Some(v) => v.is_blank_string(),
        };
        if missing_or_blank {
            args.insert(key.to_string(), DslValue::str(*value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_in_missing_default() {
        let mut args = ArgMap::new();
        apply_defaults("list_files", &mut args);
        assert_eq!(args.get("directory").unwrap().as_str(), Some("/shared"));
    }

    #[test]
    fn blank_string_is_treated_as_missing() {
        let mut args = ArgMap::new();
        args.insert("directory".into(), DslValue::str(""));
        apply_defaults("list_files", &mut args);
        assert_eq!(args.get("directory").unwrap().as_str(), Some("/shared"));
    }

    #[test]
    fn explicit_non_blank_value_is_preserved() {
        let mut args = ArgMap::new();
        args.insert("directory".into(), DslValue::str("/tmp"));
        apply_defaults("list_files", &mut args);
        assert_eq!(args.get("directory").unwrap().as_str(), Some("/tmp"));
    }

    #[test]
    fn unrelated_tool_is_untouched() {
        let mut args = ArgMap::new();
        apply_defaults("read_file", &mut args);
        assert!(args.is_empty());
    }
}
