//! Rule-based source/sink classification
//!
//! Line-level patterns per bug kind:
//!
//! | Kind | Sources                                              | Sinks                         |
//! |------|------------------------------------------------------|-------------------------------|
//! | dbz  | `x = 0` / `0.0` / `0.0F`, `x = atoi(..)`, `f(&x)`    | identifier divisor of `/` `%` |
//! | xss  | `x = ..readLine(..)` and other request readers       | argument text of `println(..)`|
//!
//! `//` comments are removed first. Line numbers are 1-based within the
//! function text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::trace;

use super::{Classification, ValueClassifier};
use crate::config::BugKind;
use crate::errors::DfaResult;
use crate::shared::models::{Function, Value};

static DBZ_ZERO_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z_]\w*)\s*(?:\[[^\]]*\])?\s*=\s*(?:0|0\.0[fF]?)\s*[;,)]")
        .expect("valid regex")
});

static DBZ_PARSE_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z_]\w*)\s*=\s*[^;=]*\b(?:atoi|atof|RAND32)\b").expect("valid regex")
});

static DBZ_ADDRESS_ARG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[(,]\s*&\s*([A-Za-z_]\w*)").expect("valid regex"));

static DBZ_DIVISOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/%]\s*\(?\s*([A-Za-z_]\w*)").expect("valid regex"));

static XSS_READ_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b([A-Za-z_]\w*)\s*=\s*[^;=]*\b(?:readLine|getProperty|getCookies|getString|nextToken|getParameter)\s*\(",
    )
    .expect("valid regex")
});

static XSS_PRINTLN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bprintln\s*\((.*)\)").expect("valid regex"));

/// Pattern-matching classifier for one bug kind
#[derive(Debug, Clone, Copy)]
pub struct RuleBasedClassifier {
    bug_kind: BugKind,
}

impl RuleBasedClassifier {
    pub fn new(bug_kind: BugKind) -> Self {
        Self { bug_kind }
    }

    pub fn bug_kind(&self) -> BugKind {
        self.bug_kind
    }

    fn classify_line(&self, line: &str, line_number: usize, out: &mut Classification) {
        match self.bug_kind {
            BugKind::Dbz => {
                let line = &blank_string_literals(line);
                for regex in [&*DBZ_ZERO_ASSIGN, &*DBZ_PARSE_ASSIGN, &*DBZ_ADDRESS_ARG] {
                    for caps in regex.captures_iter(line) {
                        out.sources.push(Value::src(&caps[1], line_number));
                    }
                }
                for caps in DBZ_DIVISOR.captures_iter(line) {
                    out.sinks.push(Value::sink(&caps[1], line_number));
                }
            }
            BugKind::Xss => {
                for caps in XSS_READ_ASSIGN.captures_iter(line) {
                    out.sources.push(Value::src(&caps[1], line_number));
                }
                for caps in XSS_PRINTLN.captures_iter(line) {
                    let argument = caps[1].trim();
                    if !argument.is_empty() {
                        out.sinks.push(Value::sink(argument, line_number));
                    }
                }
            }
        }
    }
}

impl ValueClassifier for RuleBasedClassifier {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    fn classify(&self, function: &Function) -> DfaResult<Classification> {
        let mut classification = Classification::default();
        for (i, line) in function.text().lines().enumerate() {
            self.classify_line(strip_line_comment(line), i + 1, &mut classification);
        }
        dedup_in_place(&mut classification.sources);
        dedup_in_place(&mut classification.sinks);

        trace!(
            function = %function.name,
            bug_kind = %self.bug_kind,
            sources = classification.sources.len(),
            sinks = classification.sinks.len(),
            "classified"
        );
        Ok(classification)
    }
}

/// Text before a `//` that is not inside a string literal
fn strip_line_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => {}
        }
        i += 1;
    }
    line
}

/// Replace string literal contents with spaces, keeping columns
fn blank_string_literals(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_string = false;
    let mut escaped = false;
    for ch in line.chars() {
        if !in_string {
            in_string = ch == '"';
            out.push(ch);
            continue;
        }
        match ch {
            _ if escaped => {
                escaped = false;
                out.push(' ');
            }
            '\\' => {
                escaped = true;
                out.push(' ');
            }
            '"' => {
                in_string = false;
                out.push('"');
            }
            _ => out.push(' '),
        }
    }
    out
}

/// Keep the first occurrence of each value, preserving order
fn dedup_in_place(values: &mut Vec<Value>) {
    let mut seen = BTreeSet::new();
    values.retain(|value| seen.insert(value.clone()));
}
