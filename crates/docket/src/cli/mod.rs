//! # CLI Behavior
//!
//! This is **one possible UI client** for docket, not the store itself.
//!
//! ## Commands
//!
//! - `docket save --title T --author-id A [CONTENT]`: store a document. Content comes
//!   from the argument, or from stdin when piped.
//! - `docket get <ID>`: show one document with its content.
//! - `docket search [--prefix P].. [--author A].. [--contains W].. [--from TS] [--to TS]`
//! - `docket list`: every document, in storage order.
//! - `docket check`: report records without content and content without records.
//!
//! `--json` switches any command to machine-readable output.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap
//! - `commands`: Store wiring and per-command handlers
//! - `render`: Output formatting
//! - `styles`: Named terminal styles

mod commands;
mod render;
mod styles;
pub mod setup;

pub use commands::run;
