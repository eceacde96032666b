//! Fixture files: `tests/fixtures/<group>.yaml`, each a list of cases.
//!
//! ```yaml
//! - id: typed_object
//!   desc: Type and name in the header
//!   source: |
//!     Window => main { }
//!   events: [[StartObject, 'Window => main'], EndObject, End]
//! ```
//!
//! Cases that fail list the events before the error, then `[Error, <kind>]`,
//! and may pin the error to a source line with `error_line`.

use std::path::Path;

use serde::Deserialize;

/// Event names a fixture may use, spelled like `Event`'s `Debug` output.
const EVENT_NAMES: &[&str] = &[
    "StartObject",
    "EndObject",
    "StartVersionBlock",
    "EndVersionBlock",
    "StartArray",
    "EndArray",
    "Property",
    "Key",
    "Value",
    "End",
    "Error",
];

#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub source: String,
    pub events: Vec<FixtureEvent>,
    /// Checked on the canonical run only; variations shift lines.
    #[serde(default)]
    pub error_line: Option<u32>,
}

impl TestCase {
    /// True when the case ends in a parse error.
    pub fn expects_error(&self) -> bool {
        self.events.last().map_or(false, FixtureEvent::is_error)
    }

    /// Shape problems in the case itself, reported before any parsing.
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for event in &self.events {
            if !EVENT_NAMES.contains(&event.name()) {
                problems.push(format!("unknown event `{}`", event.name()));
            }
        }
        match self.events.last() {
            Some(last) if last.is_error() || last.name() == "End" => {}
            _ => problems.push("events must finish with End or Error".to_string()),
        }
        if self.events.iter().rev().skip(1).any(FixtureEvent::is_error) {
            problems.push("Error can only be the last event".to_string());
        }
        if self.error_line.is_some() && !self.expects_error() {
            problems.push("error_line set on a case that does not fail".to_string());
        }
        problems
    }
}

/// `End` or `[Property, 'width']`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FixtureEvent {
    Marker(String),
    Named(String, String),
}

impl FixtureEvent {
    pub fn name(&self) -> &str {
        match self {
            FixtureEvent::Marker(name) | FixtureEvent::Named(name, _) => name,
        }
    }

    pub fn is_error(&self) -> bool {
        self.name() == "Error"
    }

    /// The form the harness prints parsed events in: `Property "width"`.
    pub fn expected_text(&self) -> String {
        match self {
            FixtureEvent::Marker(name) => name.clone(),
            FixtureEvent::Named(name, content) => format!("{} {:?}", name, content),
        }
    }
}

/// Load and validate every case in `tests/fixtures/<group>.yaml`.
pub fn load_fixtures_by_name(group: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", group));
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
    let cases: Vec<TestCase> = serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("malformed fixture {}: {}", path.display(), e));

    for case in &cases {
        let problems = case.problems();
        assert!(problems.is_empty(), "{}::{}: {}", group, case.id, problems.join("; "));
    }
    cases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(yaml: &str) -> TestCase {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_every_group_loads() {
        for group in ["objects", "versions", "arrays", "values", "expressions", "bindings", "errors"] {
            let cases = load_fixtures_by_name(group);
            assert!(!cases.is_empty(), "{} is empty", group);
            assert!(cases.iter().all(|c| !c.desc.is_empty()));
        }
    }

    #[test]
    fn test_event_shapes() {
        let events: Vec<FixtureEvent> = serde_yaml::from_str("[End, [Property, a]]").unwrap();
        assert_eq!(events[0].expected_text(), "End");
        assert_eq!(events[1].name(), "Property");
        assert_eq!(events[1].expected_text(), "Property \"a\"");
    }

    #[test]
    fn test_malformed_cases_are_caught() {
        let typo = case("{ id: a, desc: d, source: '{}', events: [StartObjekt, End] }");
        assert_eq!(typo.problems(), ["unknown event `StartObjekt`"]);

        let unfinished = case("{ id: b, desc: d, source: '{', events: [StartObject] }");
        assert_eq!(unfinished.problems(), ["events must finish with End or Error"]);

        let stray_line = case("{ id: c, desc: d, source: '{}', events: [StartObject, EndObject, End], error_line: 1 }");
        assert_eq!(stray_line.problems(), ["error_line set on a case that does not fail"]);

        let failing = case("{ id: e, desc: d, source: '}', events: [[Error, Syntax]], error_line: 1 }");
        assert!(failing.expects_error());
        assert!(failing.problems().is_empty());
    }
}
