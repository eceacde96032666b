//! Parse a document and print it as an indented outline.
//!
//! Run with: cargo run --example print_tree

use declgraph_core::{Event, Parser, ValueKind};

fn main() {
    let input = include_str!("../../samples/settings.dg");

    let mut parser = Parser::new(input, "settings.dg", 1);
    let mut indent = 0usize;
    let mut pending_key: Option<String> = None;

    while let Some(result) = parser.next() {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        };
        let pad = "  ".repeat(indent);
        match event {
            Event::StartObject => {
                let label = match (parser.object_type(), parser.object_name()) {
                    ("", "") => "{object}".to_string(),
                    (ty, "") => ty.to_string(),
                    ("", name) => format!("=> {}", name),
                    (ty, name) => format!("{} => {}", ty, name),
                };
                println!("{}{}", pad, label);
                indent += 1;
            }
            Event::StartVersionBlock => {
                println!("{}version({})", pad, parser.version_id().unwrap_or_default());
                indent += 1;
            }
            Event::StartArray => {
                println!("{}[", pad);
                indent += 1;
            }
            Event::EndObject | Event::EndVersionBlock | Event::EndArray => {
                indent = indent.saturating_sub(1);
            }
            Event::Property => {
                println!("{}.{}", pad, parser.property_name().unwrap_or_default());
            }
            Event::Key => {
                pending_key = parser.value().map(|v| v.text().to_string());
            }
            Event::Value => {
                let Some(value) = parser.value() else { continue };
                let shape = match value.kind() {
                    ValueKind::Expression(_) => "expr",
                    ValueKind::Binding(_) | ValueKind::DoubleBinding(_) => "binding",
                    ValueKind::Identifier(_) => "name",
                    _ => "literal",
                };
                match pending_key.take() {
                    Some(key) => println!("{}{} = {} ({})", pad, key, value.text(), shape),
                    None => println!("{}{} ({})", pad, value.text(), shape),
                }
            }
            Event::Ready | Event::End => {}
        }
    }
}
