#![forbid(unsafe_code)]

use std::fs::File;
use std::process::exit;

use tracing_subscriber::EnvFilter;
use yamlify::{Error, Node, Options, parse_document, read_source};

const USAGE: &str = "Usage: yamlify [--plain] <path>

Validates an indentation-based YAML document and prints its tree as JSON.
Sequence items appear under their synthetic keys (-0, -1, ...).

Options:
  --plain     report errors without a source snippet
  -h, --help  print this help";

fn usage_error(msg: &str) -> ! {
    eprintln!("{msg}\n\n{USAGE}");
    exit(1);
}

/// Read a document, reduce it and print the resulting tree. Single parameter is
/// the file name. `RUST_LOG` enables library tracing on stderr.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut plain = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                exit(0);
            }
            "--plain" => plain = true,
            option if option.starts_with('-') => usage_error(&format!("Unknown option: {option}")),
            _ if path.is_some() => usage_error(&format!("Unexpected extra argument: {arg}")),
            _ => path = Some(arg),
        }
    }
    let Some(path) = path else {
        usage_error("Expected a path to a document as the only argument");
    };

    let content = match File::open(&path).map_err(Error::from).and_then(read_source) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Failed to read {path}: {err}");
            exit(2);
        }
    };

    let document = match parse_document(&content, &Options::default()) {
        Ok(document) => document,
        Err(err) => {
            let err = if plain { err } else { err.with_snippet(&content, &path) };
            eprintln!("{path} invalid:\n{err}");
            exit(3);
        }
    };

    match serde_json::to_string_pretty(&Node::Mapping(document)) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("Failed to print {path}: {err}");
            exit(3);
        }
    }
}
