//! Parse and validate fiscal documents from disk.
//!
//! ```sh
//! RUST_LOG=nota=debug cargo run --example validate -- nfe.xml cte.xml
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use nota::capability::{Capabilities, Outcome};
use nota::rules::Validator;
use nota::{ValidationConfig, has_errors};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: validate <document.xml>...");
        return ExitCode::from(2);
    }

    // No registry is reachable from a demo; every lookup declines to answer.
    let offline = Capabilities::default()
        .with_duplicate_index(Arc::new(|_: &str| Outcome::Unavailable));
    let validator = Validator::new(ValidationConfig::default()).with_capabilities(offline);

    let mut blocked = false;
    for path in &paths {
        let xml = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{path}: {e}");
                blocked = true;
                continue;
            }
        };
        let document = match nota::xml::parse_bytes(&xml) {
            Ok(document) => document,
            Err(e) => {
                eprintln!("{path}: {e}");
                blocked = true;
                continue;
            }
        };

        let issues = validator.validate(&document);
        println!(
            "{path}: {} {} ({} issues)",
            document.document_type(),
            document.access_key(),
            issues.len()
        );
        for issue in &issues {
            println!("  {issue}");
            if let Some(suggestion) = &issue.suggestion {
                println!("    hint: {suggestion}");
            }
        }
        blocked |= has_errors(&issues);
    }

    if blocked { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
