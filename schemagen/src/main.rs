//! Schema generator binary.
//!
//! Usage: `mayamock-schemagen <dump.json> <artifact.json>`
//!
//! Reads the raw introspection dump produced inside the real application and
//! writes the canonical versioned schema artifact. Exits 0 on success,
//! non-zero with a descriptive message on failure.

use std::env;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: mayamock-schemagen <dump.json> <artifact.json>");
        process::exit(2);
    }

    match mayamock_schemagen::run(Path::new(&args[1]), Path::new(&args[2])) {
        Ok(summary) => {
            println!(
                "wrote schema artifact: {} types, application version {}",
                summary.type_count, summary.application_version
            );
        }
        Err(e) => {
            eprintln!("schema generation failed: {}", e);
            process::exit(1);
        }
    }
}
