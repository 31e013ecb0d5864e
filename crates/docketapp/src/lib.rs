//! # Docket Architecture
//!
//! Docket is a small **embedded document store**. Documents carry a title, a body, an
//! author and a creation time. They can be fetched by id or searched by title prefix,
//! author, body substrings and creation-date range.
//!
//! Like any library with a CLI attached, the core is UI agnostic: the `docket` binary is
//! one client among possible others.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: save, find_by_id, search, list, verify      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Search Engine (search.rs)                                  │
//! │  - Ordered filter chain over the metadata list              │
//! │  - Hydrates content only for the content filter             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DocumentStore trait, DocStore<B> repository              │
//! │  - MetadataIndex (one JSON file), ContentKey (one file/doc) │
//! │  - StorageBackend: FsBackend (production), MemBackend       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Split Storage
//!
//! Metadata for every document lives in a single JSON array so that structural
//! filters never touch the body files. Bodies live one-per-file and are the only
//! authoritative copy of the content.
//!
//! ## No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout/stderr or exits the process. Failures are
//! returned as [`error::DocketError`] and logged through `tracing`; installing a
//! subscriber is up to the client.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`search`]: Search request and filter pipeline
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Document`, `Author`)
//! - [`config`]: Configuration loading
//! - [`clock`]: Time source used to stamp `created`
//! - [`error`]: Error types

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
