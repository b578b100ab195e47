use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for rule file operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Keeps the rule file content and its name together so that every error
/// can point at the offending line.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// A line that is neither indented, blank, a comment, nor a query.
    pub fn parse_error(&self, line: usize, span: impl Into<SourceSpan>) -> Box<Error> {
        Box::new(Error::Parse {
            src: self.named_source(),
            span: span.into(),
            line,
        })
    }

    /// The same query appears in two blocks.
    pub fn duplicate_query_error(
        &self,
        query: impl Into<String>,
        first_span: impl Into<SourceSpan>,
        second_span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::DuplicateQuery {
            src: self.named_source(),
            first_span: first_span.into(),
            second_span: second_span.into(),
            query: query.into(),
        })
    }

    /// A query that is not a valid regular expression.
    pub fn invalid_regex_error(
        &self,
        query: impl Into<String>,
        span: impl Into<SourceSpan>,
        source: regex::Error,
    ) -> Box<Error> {
        Box::new(Error::InvalidRegex {
            src: self.named_source(),
            span: span.into(),
            query: query.into(),
            source,
        })
    }

    /// A malformed `\from` directive.
    pub fn invalid_import_error(
        &self,
        directive: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::InvalidImport {
            src: self.named_source(),
            span: span.into(),
            directive: directive.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse line {line} of pattern file")]
    #[diagnostic(
        code(nbstub::rules::parse_error),
        help("top-level lines must be a query ending in ':' or a comment starting with '#'")
    )]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected a query ending in ':'")]
        span: SourceSpan,
        line: usize,
    },

    #[error("duplicate query pattern '{query}'")]
    #[diagnostic(
        code(nbstub::rules::duplicate_query),
        help("merge the two templates into a single block")
    )]
    DuplicateQuery {
        #[source_code]
        src: NamedSource<String>,
        #[label("first defined here")]
        first_span: SourceSpan,
        #[label("defined again here")]
        second_span: SourceSpan,
        query: String,
    },

    #[error("invalid query pattern '{query}'")]
    #[diagnostic(code(nbstub::rules::invalid_regex))]
    InvalidRegex {
        #[source_code]
        src: NamedSource<String>,
        #[label("not a valid regular expression")]
        span: SourceSpan,
        query: String,
        #[source]
        source: regex::Error,
    },

    #[error("could not parse import declaration '{directive}'")]
    #[diagnostic(
        code(nbstub::rules::invalid_import),
        help("use '\\from module import name [as alias], ...'")
    )]
    InvalidImport {
        #[source_code]
        src: NamedSource<String>,
        #[label("malformed import directive")]
        span: SourceSpan,
        directive: String,
    },
}
