//! # tagload-cli: CLI Tool for tagload
//!
//! Provides the `tagload` command-line interface over the loader engine.
//!
//! ## Subcommands
//!
//! - `tagload check`: Load a document into a bundled record shape and report
//!   the first read, required-field or default-literal failure.
//! - `tagload shapes`: List the bundled shapes and their field metadata.
//!
//! ```bash
//! tagload check --shape service service.yaml --print
//! tagload -vv check --shape person --allow-unknown person.json
//! tagload shapes service
//! ```

pub mod check;
pub mod describe;
pub mod shapes;
