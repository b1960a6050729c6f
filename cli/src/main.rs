//! faultline CLI: build and decode structured error documents from the terminal.
//!
//! Usage:
//! ```bash
//! # Build a JSON-API error document
//! faultline build --kind validation --message "Name is required" --property name
//!
//! # Build an OAuth error body
//! faultline build --kind no-permission --format oauth
//!
//! # Decode a document (either format, auto-detected)
//! faultline decode --json '{"errors":[{"title":"NotFoundError"}]}'
//! echo '{"error":"access_denied"}' | faultline decode
//! ```

use std::env;
use std::io::Read;
use std::process;

use faultline_core::{Fault, Options};
use faultline_wire::{deserialize, serialize, Format};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "build" => cmd_build(&args[2..]),
        "decode" => cmd_decode(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("faultline {}", env!("CARGO_PKG_VERSION"));
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("faultline {}", env!("CARGO_PKG_VERSION"));
    println!("Build and decode structured error documents\n");
    println!("USAGE:");
    println!("    faultline <COMMAND>\n");
    println!("COMMANDS:");
    println!("    build     Build an error document from a kind and options");
    println!("    decode    Decode a JSON-API or OAuth error document");
    println!("    version   Print version");
    println!("    help      Print this help\n");
    println!("BUILD FLAGS:");
    println!("    --kind <SLUG>       Error kind (e.g. validation, not-found)  [required]");
    println!("    --message <TEXT>    Override the default message");
    println!("    --property <NAME>   Field path implicated by the failure");
    println!("    --code <CODE>       Machine code (wins over the category)");
    println!("    --context <TEXT>    Free-text context");
    println!("    --status <N>        Override the default status code");
    println!("    --format <FMT>      jsonapi (default) or oauth");
    println!("    --pretty            Pretty-print the document\n");
    println!("DECODE FLAGS:");
    println!("    --json <DOC>        Document to decode (reads stdin if omitted)");
}

fn cmd_build(args: &[String]) {
    let mut kind: Option<&str> = None;
    let mut options = Options::new();
    let mut format = Format::default();
    let mut pretty = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--kind" => {
                i += 1;
                kind = args.get(i).map(|s| s.as_str());
            }
            "--message" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    options = options.message(v);
                }
            }
            "--property" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    options = options.property(v);
                }
            }
            "--code" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    options = options.code(v);
                }
            }
            "--context" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    options = options.context(v);
                }
            }
            "--status" => {
                i += 1;
                match args.get(i).map(|s| s.parse::<u16>()) {
                    Some(Ok(status)) => options = options.status_code(status),
                    _ => {
                        eprintln!("Error: --status expects a number");
                        process::exit(1);
                    }
                }
            }
            "--format" => {
                i += 1;
                match args.get(i).map(|s| s.parse::<Format>()) {
                    Some(Ok(f)) => format = f,
                    Some(Err(e)) => {
                        eprintln!("Error: {e}");
                        process::exit(1);
                    }
                    None => {
                        eprintln!("Error: --format expects a value");
                        process::exit(1);
                    }
                }
            }
            "--pretty" => pretty = true,
            flag => {
                eprintln!("Unknown flag: {flag}");
                process::exit(1);
            }
        }
        i += 1;
    }

    let slug = match kind {
        Some(k) => k,
        None => {
            eprintln!("Error: --kind is required");
            process::exit(1);
        }
    };

    let fault = match Fault::build(slug, options) {
        Ok(fault) => fault,
        Err(e) => {
            eprintln!("Build error: {e}");
            process::exit(1);
        }
    };

    let doc = serialize(&fault, format);
    let rendered = if pretty {
        serde_json::to_string_pretty(&doc)
    } else {
        serde_json::to_string(&doc)
    };
    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("JSON serialization error: {e}");
            process::exit(1);
        }
    }
    // Summary goes to stderr so the document on stdout stays pipeable.
    eprintln!("{} {}", fault.status_code, fault.kind.title());
}

fn cmd_decode(args: &[String]) {
    let mut raw: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => {
                i += 1;
                raw = args.get(i).cloned();
            }
            flag => {
                eprintln!("Unknown flag: {flag}");
                process::exit(1);
            }
        }
        i += 1;
    }

    let input = match raw {
        Some(s) => s,
        None => {
            let mut buf = String::new();
            if std::io::stdin().read_to_string(&mut buf).is_err() {
                eprintln!("Error: could not read stdin");
                process::exit(1);
            }
            buf
        }
    };

    let document: serde_json::Value = match serde_json::from_str(&input) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid JSON: {e}");
            process::exit(1);
        }
    };

    let fault = deserialize(&document);
    println!("{fault}");
    println!("  Kind:     {}", fault.kind.name());
    println!("  Status:   {}", fault.status_code);
    println!("  Category: {}", fault.category);
    println!("  Severity: {}", fault.severity);
    if let Some(property) = &fault.property {
        println!("  Property: {property}");
    }
    if let Some(code) = &fault.code {
        println!("  Code:     {code}");
    }
}
