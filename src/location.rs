//! Call-site locations attached to every raised enforcement error.

#![forbid(unsafe_code)]

use std::fmt;

/// File and line of a check, captured at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Source file path as reported by `file!()`.
    pub file: &'static str,
    /// One-based line number.
    pub line: u32,
}

impl SourceLocation {
    /// Build a location from explicit parts.
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the caller of the function this is called from.
    ///
    /// Only meaningful when every frame between the check and here is
    /// `#[track_caller]`.
    #[track_caller]
    pub fn caller() -> Self {
        let loc = std::panic::Location::caller();
        Self {
            file: loc.file(),
            line: loc.line(),
        }
    }

    /// Final path component of `file`, used in rendered messages.
    pub fn basename(&self) -> &'static str {
        self.file
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(self.file)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.basename(), self.line)
    }
}

/// Expands to the [`SourceLocation`] of the macro invocation.
#[macro_export]
macro_rules! location {
    () => {
        $crate::location::SourceLocation::new(file!(), line!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_strips_directories() {
        let loc = SourceLocation::new("src/nn/conv.rs", 42);
        assert_eq!(loc.basename(), "conv.rs");
        assert_eq!(loc.to_string(), "conv.rs:42");

        let win = SourceLocation::new(r"C:\work\ops.rs", 7);
        assert_eq!(win.basename(), "ops.rs");
    }

    #[test]
    fn macro_captures_this_file() {
        let here = crate::location!();
        assert_eq!(here.basename(), "location.rs");
        assert!(here.line > 0);
    }

    #[test]
    fn caller_reports_call_site() {
        #[track_caller]
        fn where_am_i() -> SourceLocation {
            SourceLocation::caller()
        }
        let expected = line!() + 1;
        let loc = where_am_i();
        assert_eq!(loc.line, expected);
        assert_eq!(loc.basename(), "location.rs");
    }
}
