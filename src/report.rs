// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Diagnostic reporting
//!
//! Two optional sinks may be attached to a build or lookup: a [`Reporter`]
//! receiving a [`Diagnostic`] for every failure, and an [`UnsupportedChar`]
//! sink told about each codepoint skipped while building an atlas. Without a
//! sink, diagnostics are discarded; they are always forwarded to the `log`
//! facade.

use crate::ErrorKind;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// A structured diagnostic event
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    /// Source location which raised the event
    pub location: &'static Location<'static>,
}

impl Diagnostic {
    /// Construct, recording the caller's location
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            message: message.into(),
            location: Location::caller(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} - {}: {}",
            self.location.file(),
            self.location.line(),
            self.kind,
            self.message
        )
    }
}

/// A sink for [`Diagnostic`] events
pub trait Reporter: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F: Fn(&Diagnostic) + Send + Sync> Reporter for F {
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// A sink for codepoints dropped while building an atlas
pub trait UnsupportedChar: Send + Sync {
    /// Codepoint `c` could not be rastered for the given `reason`
    fn unsupported_char(&self, c: u32, reason: &str);
}

impl<F: Fn(u32, &str) + Send + Sync> UnsupportedChar for F {
    fn unsupported_char(&self, c: u32, reason: &str) {
        self(c, reason)
    }
}

/// Optional diagnostic sinks
#[derive(Clone, Default)]
pub struct Diagnostics {
    reporter: Option<Arc<dyn Reporter>>,
    unsupported: Option<Arc<dyn UnsupportedChar>>,
}

impl Diagnostics {
    /// No sinks: everything is discarded (except for logging)
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Set the [`Reporter`]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Some(Arc::new(reporter));
        self
    }

    /// Set the [`UnsupportedChar`] sink
    pub fn with_unsupported_char(mut self, sink: impl UnsupportedChar + 'static) -> Self {
        self.unsupported = Some(Arc::new(sink));
        self
    }

    /// Report an error event
    #[track_caller]
    pub fn report(&self, kind: ErrorKind, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(kind, message);
        log::warn!("{diagnostic}");
        if let Some(reporter) = self.reporter.as_ref() {
            reporter.report(&diagnostic);
        }
    }

    /// Report a codepoint excluded from an atlas
    pub fn unsupported_char(&self, c: u32, reason: &str) {
        log::debug!("unsupported char U+{c:04X}: {reason}");
        if let Some(sink) = self.unsupported.as_ref() {
            sink.unsupported_char(c, reason);
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("reporter", &self.reporter.is_some())
            .field("unsupported", &self.unsupported.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn report_location() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let diag = Diagnostics::new().with_reporter(move |d: &Diagnostic| {
            sink.lock().unwrap().push(d.clone());
        });

        let line = line!() + 1;
        diag.report(ErrorKind::Unsupported, "no glyph");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, ErrorKind::Unsupported);
        assert_eq!(seen[0].message, "no glyph");
        assert_eq!(seen[0].location.line(), line);
        assert!(seen[0].location.file().ends_with("report.rs"));
    }

    #[test]
    fn unsupported_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let diag = Diagnostics::new().with_unsupported_char(move |c: u32, reason: &str| {
            sink.lock().unwrap().push((c, reason.to_string()));
        });
        diag.unsupported_char(0x41, "missing");
        assert_eq!(*seen.lock().unwrap(), [(0x41, "missing".to_string())]);

        // absent sinks discard
        Diagnostics::new().unsupported_char(0x42, "missing");
        Diagnostics::new().report(ErrorKind::BadEncoding, "ignored");
    }
}
