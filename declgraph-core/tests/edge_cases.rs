use declgraph_core::{Event, Parser};

/// Drive the parser to `End` or an error. Every advance must either consume
/// input or finish, so a bounded number of steps is always enough.
fn test_input(name: &str, input: &str) {
    println!("Testing {}: {:?}", name, input);
    let mut parser = Parser::new(input, name, 1);
    let limit = input.len() * 4 + 8;
    for step in 0..limit {
        match parser.advance() {
            Ok(Event::End) => {
                println!("  -> end after {} events", step + 1);
                return;
            }
            Ok(_) => {}
            Err(err) => {
                println!("  -> {}", err);
                assert_eq!(parser.advance().unwrap_err(), err, "{}: error must be sticky", name);
                return;
            }
        }
    }
    panic!("{}: no End or error after {} events", name, limit);
}

#[test]
fn test_various_edge_cases() {
    // Short inputs that stop the parser in every state
    test_input("empty", "");
    test_input("nul", "\0");
    test_input("brace_open", "{");
    test_input("brace_close", "}");
    test_input("bracket_open", "[");
    test_input("colon", ":");
    test_input("comma", ",");
    test_input("at", "@");
    test_input("at_at", "@@");
    test_input("arrow", "=>");
    test_input("equals", "=");
    test_input("quote_single", "'");
    test_input("quote_double", "\"");
    test_input("backtick", "`");
    test_input("raw_prefix", "r\"");
    test_input("slash", "/");
    test_input("comment_open", "/*");
    test_input("comment_star_slash", "/*/");
    test_input("line_comment_no_newline", "// eof");
    test_input("dot", ".");
    test_input("zero_x", "0x");
    test_input("zero_b", "0b");
    test_input("exponent", "1e");
    test_input("hex_point", "0x.p1");
    test_input("type_only", "Type");
    test_input("type_arrow", "Type =>");
    test_input("type_arrow_name", "Type => Name");
    test_input("property_open", "{ a:");
    test_input("property_colon_brace", "{ a: }");
    test_input("version_open", "{ version(");
    test_input("version_no_brace", "{ version(x) }");
    test_input("array_open", "{ a: [");
    test_input("array_comma", "{ a: [,");
    test_input("array_double_comma", "{ a: [1,,] }");
    test_input("dictionary_open", "{ a: [k:");
    test_input("binding_open", "{ a: @{");
    test_input("binding_unclosed", "{ a: @{ 1 + }");
    test_input("expression_dangling", "{ a: 1 + }");
    test_input("ternary_dangling", "{ a: x ? }");
    test_input("paren_unclosed", "{ a: (1 }");
    test_input("escape_eof", "{ a: \"\\");
    test_input("entity_eof", "{ a: \"\\&amp");
    test_input("char_eof", "{ a: '\\");
    test_input("non_ascii", "{ a: é }");
    test_input("emoji", "🦀");
    test_input("unbraced_eof", "a:");
}

#[test]
fn test_deep_nesting_is_bounded() {
    let deep_arrays = format!("{{ a: {} }}", "[".repeat(10_000));
    test_input("deep_arrays", &deep_arrays);

    let deep_parens = format!("{{ a: {} }}", "(".repeat(10_000));
    test_input("deep_parens", &deep_parens);

    let deep_unary = format!("{{ a: {}1 }}", "-".repeat(10_000));
    test_input("deep_unary", &deep_unary);

    let deep_ternary = format!("{{ a: {}1 }}", "x ? y : ".repeat(5_000));
    test_input("deep_ternary", &deep_ternary);
}
