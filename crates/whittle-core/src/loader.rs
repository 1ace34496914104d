// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Loading files and directory trees into entity trees.
//!
//! The loader is the only fallible part of the crate: it walks the
//! filesystem, picks a splitter per file by glob rules, and hands the
//! bytes to the appropriate front end. User rules are consulted before
//! the built-in defaults:
//!
//! | Pattern | Splitter |
//! |---------|----------|
//! | `*.d`, `*.di` | [`Splitter::D`] |
//! | `*` | [`Splitter::Files`] |
//!
//! Globs are case-sensitive and match base names only. A D file that
//! opens with the literal `Ddoc` is documentation, not code, and is
//! loaded opaquely like any non-D file.

use camino::{Utf8Path, Utf8PathBuf};
use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Entity, EntityArena, EntityId, Tree};
use crate::error::LoadError;
use crate::source_analysis::{lexer, parser, TokenKind};
use crate::words;

/// How to split one file into entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Splitter {
    /// The D-aware splitter (scope parser or word mode).
    D,
    /// Plain word splitting, no lexical knowledge.
    Words,
    /// One opaque leaf holding the whole file.
    Files,
}

/// Which D front end to use: full trees or word-level entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Scope parsing plus post-processing (the default).
    #[default]
    Source,
    /// Word-level splitting for identifier reduction.
    Words,
}

/// A user-supplied `(glob, splitter)` mapping, searched before defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseRule {
    /// Glob matched against the file's base name (`*`, `?`, `[abc]`).
    pub pattern: String,
    /// Splitter for matching files.
    pub splitter: Splitter,
}

/// Options for [`load_files`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Elide comments from D files before splitting.
    pub strip_comments: bool,
    /// User rules, searched before the built-in defaults.
    pub rules: Vec<ParseRule>,
    /// Front end for D files.
    pub mode: SplitMode,
}

/// The built-in rule table; the final `*` rule guarantees a match.
const DEFAULT_RULES: &[(&str, Splitter)] = &[
    ("*.d", Splitter::D),
    ("*.di", Splitter::D),
    ("*", Splitter::Files),
];

/// Loads a file or directory tree into entities.
///
/// For a single file the returned path is the input with its extension
/// stripped (the reducer uses it as the base name for output
/// directories); for a directory it is returned unchanged. Directory
/// children carry `/`-separated paths relative to the root in their
/// `filename`, in sorted order; symlinks are skipped.
///
/// # Errors
///
/// Fails if the path does not exist, a file or directory cannot be read,
/// a path is not UTF-8, or a user rule's glob pattern is invalid.
/// Malformed *source* never fails - that tolerance is the point.
pub fn load_files(path: &Utf8Path, options: &LoadOptions) -> Result<(Utf8PathBuf, Tree), LoadError> {
    let rules = compile_rules(options)?;
    let mut arena = EntityArena::new();

    if path.is_file() {
        let name = path.file_name().unwrap_or(path.as_str());
        let root = load_file(&mut arena, name, path, options, &rules)?;
        debug!(%path, "loaded single file");
        Ok((path.with_extension(""), Tree { arena, root }))
    } else if path.is_dir() {
        let mut files = Vec::new();
        collect_files(path, &mut files)?;
        files.sort();
        let mut children = Vec::with_capacity(files.len());
        for file in &files {
            let relative = file.strip_prefix(path).unwrap_or(file.as_path());
            let name = relative.as_str().replace('\\', "/");
            children.push(load_file(&mut arena, &name, file, options, &rules)?);
        }
        debug!(%path, files = files.len(), "loaded directory tree");
        let root = arena.alloc(Entity {
            children,
            ..Entity::default()
        });
        Ok((path.to_owned(), Tree { arena, root }))
    } else {
        Err(LoadError::NotFound(path.to_owned()))
    }
}

/// Compiles user rules followed by the defaults.
fn compile_rules(options: &LoadOptions) -> Result<Vec<(GlobMatcher, Splitter)>, LoadError> {
    let mut rules = Vec::with_capacity(options.rules.len() + DEFAULT_RULES.len());
    for rule in &options.rules {
        rules.push((compile_glob(&rule.pattern)?, rule.splitter));
    }
    for &(pattern, splitter) in DEFAULT_RULES {
        rules.push((compile_glob(pattern)?, splitter));
    }
    Ok(rules)
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher, LoadError> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()
        .map_err(|source| LoadError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
    Ok(glob.compile_matcher())
}

/// Picks the splitter for a base name. The default `*` rule matches
/// everything, so falling off the end is a programming error.
fn splitter_for(rules: &[(GlobMatcher, Splitter)], base_name: &str) -> Splitter {
    for (matcher, splitter) in rules {
        if matcher.is_match(base_name) {
            return *splitter;
        }
    }
    unreachable!("the default `*` rule matches every file name")
}

/// Recursively collects regular files. Symlinks are skipped to avoid
/// cycles through circular links.
fn collect_files(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) -> Result<(), LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| LoadError::io(dir, e))?;
        if file_type.is_symlink() {
            continue;
        }
        let entry_path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|_| LoadError::NonUtf8Path(dir.to_owned()))?;
        if file_type.is_dir() {
            collect_files(&entry_path, files)?;
        } else if file_type.is_file() {
            files.push(entry_path);
        }
    }
    Ok(())
}

/// Loads one file as an entity with `filename` and `contents` set.
fn load_file(
    arena: &mut EntityArena,
    name: &str,
    path: &Utf8Path,
    options: &LoadOptions,
    rules: &[(GlobMatcher, Splitter)],
) -> Result<EntityId, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let base_name = Utf8Path::new(name).file_name().unwrap_or(name);
    let splitter = splitter_for(rules, base_name);
    debug!(%path, ?splitter, "splitting file");

    let mut entity = Entity {
        filename: name.into(),
        ..Entity::default()
    };
    match splitter {
        // A D file that opens with `Ddoc` is documentation; fall through
        // to opaque treatment below.
        Splitter::D if !contents.starts_with("Ddoc") => {
            let text = if options.strip_comments {
                lexer::strip_comments(&contents)
            } else {
                contents
            };
            entity.contents = text.as_str().into();
            entity.children = match options.mode {
                SplitMode::Source => parser::parse(arena, &text),
                SplitMode::Words => lexer::parse_to_words(arena, &text),
            };
        }
        Splitter::Words => {
            entity.contents = contents.as_str().into();
            entity.children = words::parse_to_words(arena, &contents);
        }
        Splitter::D | Splitter::Files => {
            entity.contents = contents.as_str().into();
            let leaf = arena.alloc(Entity::leaf(contents.as_str(), TokenKind::Other));
            entity.children = vec![leaf];
        }
    }
    Ok(arena.alloc(entity))
}
