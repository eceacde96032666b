//! Print the event stream for a declgraph document.
//!
//! Run with: cargo run --example dump_events -- [-v] [FILE]
//!
//! Reads stdin when no file is given. `-v` turns on parser trace logging.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser as ClapParser;
use declgraph_core::{Event, Parser};

#[derive(ClapParser, Debug)]
#[clap(name = "dump_events", about = "Print the event stream of a declgraph document")]
struct Args {
    /// Log every parser transition.
    #[clap(short, long)]
    verbose: bool,

    /// Document to parse. Reads stdin when omitted.
    file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    simple_logger::init_with_level(if args.verbose {
        log::Level::Trace
    } else {
        log::Level::Info
    })
    .unwrap();

    let (name, input) = match args.file {
        Some(path) => {
            let input = std::fs::read_to_string(&path).unwrap_or_else(|e| {
                log::error!("Cannot read {}: {}", path.display(), e);
                std::process::exit(1);
            });
            (path.display().to_string(), input)
        }
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input).unwrap();
            ("<stdin>".to_string(), input)
        }
    };

    let mut parser = Parser::new(&input, name, 1);
    loop {
        let event = match parser.advance() {
            Ok(event) => event,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        };
        let detail = match event {
            Event::StartObject | Event::EndObject => {
                format!("{} {}", parser.object_type(), parser.object_name())
            }
            Event::StartVersionBlock | Event::EndVersionBlock => {
                parser.version_id().unwrap_or_default().to_string()
            }
            Event::Property => parser.property_name().unwrap_or_default().to_string(),
            Event::Key | Event::Value => parser
                .value()
                .map(|v| format!("{:?} `{}`", v.kind(), v.text()))
                .unwrap_or_default(),
            _ => String::new(),
        };
        println!("{:>5}  {:<18} {}", parser.position().line(), event, detail.trim());
        if event == Event::End {
            break;
        }
    }
}
