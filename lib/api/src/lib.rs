//! # lexitag API
//!
//! HTTP hosting shell for lexitag. Every request carries its own upload, column
//! name and (optionally) dictionaries, so the server keeps no per-user state.
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | `GET` | `/dictionaries` | | default classifier dictionaries |
//! | `GET` | `/sentiment/dictionary` | | default sentiment words |
//! | `POST` | `/datasets/inspect` | multipart `file` | row count, columns, text columns |
//! | `POST` | `/sentiment` | multipart `file`, `column`, `dictionary?`, `label?` | annotated CSV |
//! | `POST` | `/classify` | multipart `file`, `column`, `dictionaries?` | annotated CSV |

pub mod rest;

pub use rest::{configure, AnalysisDefaults, RestApi};
