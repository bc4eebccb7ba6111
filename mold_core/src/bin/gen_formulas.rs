//! Generate FORMULAS.md from the formula registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-formulas            # writes mold_core/FORMULAS.md
//! cargo run --bin gen-formulas -- out.md  # custom path
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use mold_core::formulas::generate_formulas_markdown;

fn main() {
    let output_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("mold_core/FORMULAS.md"));

    println!("Generating {}...", output_path.display());
    let markdown = generate_formulas_markdown();

    match fs::write(&output_path, &markdown) {
        Ok(()) => {
            println!("Successfully wrote {} bytes to {}", markdown.len(), output_path.display());
        }
        Err(e) => {
            eprintln!("Error writing file: {}", e);
            std::process::exit(1);
        }
    }
}
