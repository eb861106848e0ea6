//! Core library for gomodernize.
//!
//! gomodernize finds Go `if` statements that test a prefix with
//! `strings.HasPrefix` (or `bytes.HasPrefix`) and then trim it with
//! `TrimPrefix`, and rewrites them into a single `CutPrefix` call. The
//! library contains the Go front end, the scope graph, the rule, and the
//! machinery to apply its fixes.

#![allow(clippy::similar_names, clippy::items_after_statements)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

/// Module containing the core analyzer logic.
/// This includes the `GoModernize` struct and its methods for running the analysis.
pub mod analyzer;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI commands and their execution logic.
pub mod commands;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module defining the entry point logic shared by the binaries.
pub mod entry_point;

/// Module for representing, validating and applying byte-range edits.
pub mod fix;

/// Module containing the linter logic and visitor.
pub mod linter;

/// Module for CLI output formatting with colored text and tables.
pub mod output;

/// Module containing the implementation of the modernization rules.
pub mod rules;

/// Go front end: tree-sitter parsing, syntax tree, scopes.
pub mod syntax;

/// Module containing utility functions.
pub mod utils;

/// Go language versions.
pub mod version;
