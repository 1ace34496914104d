// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Whittle: a hierarchical, error-tolerant source splitter for
//! delta-debugging D code.
//!
//! The crate turns a source file (or a directory tree of them) into a tree
//! of [`Entity`] nodes - contiguous slices of the original text annotated
//! with structural roles. A reduction driver then removes sub-trees and
//! re-runs an external test, so the splitter's one hard promise is that
//! the in-order text of any tree equals its input, and that every node
//! boundary is a place where deletion keeps the rest coherent.
//!
//! The splitter is not a D parser: it recognises enough lexical structure
//! (strings, comments, operators, block keywords) to build a plausible
//! tree, tolerates arbitrarily broken input, and never fails on malformed
//! source.
//!
//! # Example
//!
//! ```
//! use whittle_core::parse_source;
//!
//! let mut tree = parse_source("int f() { return 1 + 2; }\n");
//! assert_eq!(tree.reassemble(), "int f() { return 1 + 2; }\n");
//! tree.optimize(); // rebalance for binary-search deletion
//! ```
//!
//! Whole files and directories go through [`load_files`], which picks a
//! splitter per file by glob rules and handles comment stripping, word
//! mode and opaque files.

pub mod cluster;
pub mod entity;
pub mod error;
pub mod loader;
pub mod source_analysis;
pub mod words;

pub use cluster::optimize;
pub use entity::{Entity, EntityArena, EntityId, Tree};
pub use error::LoadError;
pub use loader::{load_files, LoadOptions, ParseRule, SplitMode, Splitter};
pub use source_analysis::parse_source;
