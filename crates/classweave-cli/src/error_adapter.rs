//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! This module provides the bridge between the editor's standard error types
//! and miette's rich diagnostic formatting. Command errors are rendered with
//! a label under the offending token; every other error is rendered as a
//! plain report with a stable diagnostic code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, SourceSpan};

use classweave::{ClassweaveError, ModelError, persist::PersistError};

use crate::{command::CommandError, error::CliError};

/// Adapter for a command error and the text it points into.
pub struct DiagnosticAdapter<'a> {
    err: &'a CommandError,
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(err: &'a CommandError, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.err.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("classweave::command"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.err
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span();
        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(None, span),
        )))
    }
}

/// Adapter for errors without a source location.
pub struct ErrorAdapter<'a>(pub &'a ClassweaveError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ClassweaveError::Io(_) => "classweave::io",
            ClassweaveError::Model(_) => "classweave::model",
            ClassweaveError::Persist(_) => "classweave::persist",
            ClassweaveError::Config(_) => "classweave::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            ClassweaveError::Model(ModelError::InvalidName { .. })
            | ClassweaveError::Persist(PersistError::Model(ModelError::InvalidName { .. })) => {
                "names must be non-empty and contain no whitespace"
            }
            ClassweaveError::Model(ModelError::UnknownAccess(_)) => {
                "use public, private or protected (or +, - and #)"
            }
            ClassweaveError::Persist(PersistError::Json(_) | PersistError::Inconsistent(_)) => {
                "the file was not loaded and the current diagram is unchanged"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A command error with its source line.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`CliError`] into a reportable error.
pub fn to_reportable(err: &CliError) -> Reportable<'_> {
    match err {
        CliError::Command { err, src } => Reportable::Diagnostic(DiagnosticAdapter::new(err, src)),
        CliError::App(err) => Reportable::Error(ErrorAdapter(err)),
    }
}

/// Render `err` as a graphical miette report.
pub fn render(err: &CliError) -> String {
    let reporter = GraphicalReportHandler::new();
    let mut out = String::new();
    if reporter.render_report(&mut out, &to_reportable(err)).is_err() {
        return err.to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::command::Command;

    use super::*;

    fn command_error(line: &str) -> CliError {
        let err = Command::parse(line).unwrap_err();
        CliError::new_command_error(err, line)
    }

    #[test]
    fn test_command_error_is_diagnostic() {
        let err = command_error("addc Car Wheel");
        let reportable = to_reportable(&err);

        assert!(matches!(reportable, Reportable::Diagnostic(_)));
        assert_eq!(
            reportable.code().map(|c| c.to_string()),
            Some("classweave::command".to_string())
        );
        assert_eq!(
            reportable.help().map(|h| h.to_string()),
            Some("usage: addc <class>".to_string())
        );

        let labels: Vec<_> = reportable.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 9);
        assert_eq!(labels[0].len(), 5);
        assert!(labels[0].primary());
    }

    #[test]
    fn test_error_codes() {
        let cases = [
            (
                ClassweaveError::Io(std::io::Error::other("disk")),
                "classweave::io",
            ),
            (
                ClassweaveError::Model(ModelError::SelfRelationship("A".to_string())),
                "classweave::model",
            ),
            (
                ClassweaveError::Persist(PersistError::Inconsistent("dup".to_string())),
                "classweave::persist",
            ),
            (
                ClassweaveError::Config("bad".to_string()),
                "classweave::config",
            ),
        ];

        for (err, code) in cases {
            let err = CliError::App(err);
            let reportable = to_reportable(&err);
            assert!(matches!(reportable, Reportable::Error(_)));
            assert_eq!(reportable.code().map(|c| c.to_string()), Some(code.to_string()));
            assert!(reportable.labels().is_none());
        }
    }

    #[test]
    fn test_render_contains_message() {
        let rendered = render(&command_error("frobnicate"));
        assert!(rendered.contains("unknown command `frobnicate`"));
        assert!(rendered.contains("classweave::command"));

        let rendered = render(&CliError::App(ClassweaveError::Config("bad".to_string())));
        assert!(rendered.contains("Configuration error: bad"));
    }
}
