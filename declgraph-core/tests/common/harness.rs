//! Test harness for running tests with stochastic variations

use crate::common::{TestCase, Gen};
use declgraph_core::{Event, Parser};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Collect formatted events from parsing, plus the error line if parsing
/// stopped on an error.
fn collect_events(input: &str) -> (Vec<String>, Option<u32>) {
    let mut parser = Parser::new(input, "fixture.dg", 1);
    let mut events = Vec::new();
    loop {
        match parser.advance() {
            Ok(event) => {
                events.push(format_event(event, &parser));
                if event == Event::End {
                    return (events, None);
                }
            }
            Err(err) => {
                events.push(format!("Error {:?}", format!("{:?}", err.kind)));
                return (events, Some(err.line()));
            }
        }
    }
}

/// Format event for comparison (simplified, no positions)
fn format_event(event: Event, parser: &Parser<'_>) -> String {
    let content = match event {
        Event::StartObject => match (parser.object_type(), parser.object_name()) {
            ("", "") => None,
            (ty, "") => Some(ty.to_string()),
            (ty, name) => Some(format!("{} => {}", ty, name)),
        },
        Event::StartVersionBlock => parser.version_id().map(str::to_string),
        Event::Property | Event::Key => parser.property_name().map(str::to_string),
        Event::Value => parser.value().map(|v| v.text().to_string()),
        _ => None,
    };
    let name = format!("{:?}", event);
    match content {
        Some(content) => format!("{} {:?}", name, content),
        None => name,
    }
}

fn compare(actual: &[String], expected: &[String], errors: &mut Vec<String>) {
    if actual.len() != expected.len() {
        errors.push(format!(
            "Event count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }

    for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
        if act != exp {
            errors.push(format!("Event {}: expected '{}', got '{}'", i, exp, act));
        }
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let (actual, error_line) = collect_events(&case.source);
    let expected: Vec<String> = case.events.iter().map(|e| e.expected_text()).collect();

    let mut errors = Vec::new();
    compare(&actual, &expected, &mut errors);

    if case.error_line.is_some() && case.error_line != error_line {
        errors.push(format!(
            "Error line mismatch: expected {:?}, got {:?}",
            case.error_line, error_line
        ));
    }

    TestResult {
        passed: errors.is_empty(),
        input: case.source.clone(),
        expected,
        actual,
        seed: 0,
        errors,
    }
}

/// Run test with stochastic variations
///
/// Whitespace and comments are insignificant, so every variation must
/// produce exactly the canonical events:
/// - 40% chance of comments above
/// - Geometric indent (α=0.9)
/// - Random blank lines
/// - Random trailing line comments (not for error cases)
/// - 40% chance of comments below (not for error cases)
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let expects_error = case.expects_error();
    let mut input = String::new();

    if gen.chance(0.4) {
        input.push_str(&gen.comment_block());
    }

    let indent = " ".repeat(gen.indent_level());

    for line in case.source.split('\n') {
        input.push_str(&gen.blank_lines());

        if !line.is_empty() {
            input.push_str(&indent);
            input.push_str(line);
        }
        if !expects_error && gen.chance(0.2) {
            input.push_str(&gen.line_comment());
        }
        input.push('\n');
    }

    if !expects_error && gen.chance(0.4) {
        input.push_str(&gen.comment_block());
    }

    let (actual, _) = collect_events(&input);
    let expected: Vec<String> = case.events.iter().map(|e| e.expected_text()).collect();

    let mut errors = Vec::new();
    compare(&actual, &expected, &mut errors);

    TestResult {
        passed: errors.is_empty(),
        input,
        expected,
        actual,
        seed: gen.seed,
        errors,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set DECLGRAPH_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nInput:");
        eprintln!("{}", self.input);
        eprintln!("\nExpected events:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual events:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
