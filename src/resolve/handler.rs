use std::io::{BufRead, Write};

use crate::identity::EntityKind;

/// Operator input that abandons the search for one entity.
pub const SKIP: &str = "SKIP";

/// What to do after a search came back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Search again with this query (normalized before use).
    Retry(String),
    /// Record the entity as deliberately unresolved.
    Skip,
    /// Stop and surface [`crate::Error::NoSearchResults`].
    GiveUp,
}

impl Reply {
    /// Interpret one line of operator input.
    ///
    /// Exactly `SKIP` skips; a blank line gives up; anything else is a new
    /// query.
    pub fn from_input(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == SKIP {
            Self::Skip
        } else if line.trim().is_empty() {
            Self::GiveUp
        } else {
            Self::Retry(line.trim().to_owned())
        }
    }
}

/// Strategy consulted when a search yields no results.
pub trait NoResultsHandler {
    fn on_no_results(&mut self, kind: EntityKind, query: &str) -> Reply;
}

impl<F> NoResultsHandler for F
where
    F: FnMut(EntityKind, &str) -> Reply,
{
    fn on_no_results(&mut self, kind: EntityKind, query: &str) -> Reply {
        self(kind, query)
    }
}

/// Non-interactive batches: skip anything the site cannot find.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipAll;

impl NoResultsHandler for SkipAll {
    fn on_no_results(&mut self, _kind: EntityKind, _query: &str) -> Reply {
        Reply::Skip
    }
}

/// Fail the resolution whenever a search is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct GiveUp;

impl NoResultsHandler for GiveUp {
    fn on_no_results(&mut self, _kind: EntityKind, _query: &str) -> Reply {
        Reply::GiveUp
    }
}

/// Ask an operator for a replacement query, one line per prompt.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> NoResultsHandler for Prompt<R, W> {
    fn on_no_results(&mut self, kind: EntityKind, query: &str) -> Reply {
        let _ = writeln!(self.output, "No {kind} results for \"{query}\".");
        let _ = writeln!(
            self.output,
            "Enter a new search (to skip this {kind}, enter {SKIP}):"
        );
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            // End of input: nobody is there to answer.
            Ok(0) | Err(_) => Reply::Skip,
            Ok(_) => Reply::from_input(&line),
        }
    }
}
