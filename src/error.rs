//! Typed enforcement errors.

#![warn(missing_docs)]

use crate::location::SourceLocation;
use std::fmt;
use thiserror::Error;

/// Which check produced an [`EnforceError`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnforceKind {
    /// A general `enforce` or comparison check failed.
    InvariantViolation,
    /// An `enforce_finite` check failed.
    NonFiniteValue,
    /// `throw_always` was reached.
    UnconditionalFailure,
}

impl fmt::Display for EnforceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnforceKind::InvariantViolation => write!(f, "invariant violation"),
            EnforceKind::NonFiniteValue => write!(f, "non-finite value"),
            EnforceKind::UnconditionalFailure => write!(f, "unconditional failure"),
        }
    }
}

/// Opaque identity of the object that raised an error.
///
/// Holds an address for attribution only; it is never turned back into a
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallerId(usize);

impl CallerId {
    /// Identity of `value`, taken from its address.
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self(value as *const T as *const () as usize)
    }

    /// Identity from a raw address supplied by a host.
    pub const fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    /// The recorded address.
    pub const fn addr(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Error raised when an enforced condition does not hold.
///
/// The rendered text is computed once at construction and always carries
/// the check's file and line plus the failed condition text.
#[derive(Debug, Clone, Error)]
#[error("{rendered}")]
pub struct EnforceError {
    kind: EnforceKind,
    location: SourceLocation,
    condition: String,
    message: String,
    caller: Option<CallerId>,
    context: Vec<String>,
    backtrace: Option<String>,
    rendered: String,
}

/// Result alias for enforcement checks.
pub type Result<T, E = EnforceError> = std::result::Result<T, E>;

impl EnforceError {
    /// Build an error. A registered stack-trace fetcher is consulted here.
    pub fn new(
        kind: EnforceKind,
        location: SourceLocation,
        condition: impl Into<String>,
        message: impl Into<String>,
        caller: Option<CallerId>,
    ) -> Self {
        let mut err = Self {
            kind,
            location,
            condition: condition.into(),
            message: message.into(),
            caller,
            context: Vec::new(),
            backtrace: crate::registry::fetch_stack_trace(),
            rendered: String::new(),
        };
        err.refresh();
        err
    }

    /// Kind of check that failed.
    pub fn kind(&self) -> EnforceKind {
        self.kind
    }

    /// Where the check was written.
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Source text of the failed condition; empty for unconditional failures.
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Message supplied at the check.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Identity of the raising object, if one was attached.
    pub fn caller(&self) -> Option<CallerId> {
        self.caller
    }

    /// Stack trace captured by the registered fetcher.
    pub fn backtrace(&self) -> Option<&str> {
        self.backtrace.as_deref()
    }

    /// Context lines added while the error propagated.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// True for `enforce_finite` failures.
    pub fn is_non_finite(&self) -> bool {
        self.kind == EnforceKind::NonFiniteValue
    }

    /// Append a context line, innermost first.
    pub fn add_context(mut self, line: impl Into<String>) -> Self {
        self.context.push(line.into());
        self.refresh();
        self
    }

    /// Rendered text without the stack trace.
    pub fn msg_without_backtrace(&self) -> &str {
        match self.backtrace {
            Some(ref bt) => self
                .rendered
                .strip_suffix(bt.as_str())
                .and_then(|s| s.strip_suffix('\n'))
                .unwrap_or(self.rendered.as_str()),
            None => &self.rendered,
        }
    }

    fn refresh(&mut self) {
        let tag = match self.kind {
            EnforceKind::NonFiniteValue => "enforce finite fail",
            _ => "enforce fail",
        };
        let mut out = format!("[{} at {}] ", tag, self.location);
        if !self.condition.is_empty() {
            out.push_str(&self.condition);
            out.push_str(". ");
        }
        out.push_str(&self.message);
        if let Some(caller) = self.caller {
            out.push_str(&format!(" (caller: {})", caller));
        }
        for line in &self.context {
            out.push('\n');
            out.push_str(line);
        }
        if let Some(ref bt) = self.backtrace {
            out.push('\n');
            out.push_str(bt);
        }
        self.rendered = out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new("src/ops/matmul.rs", 88)
    }

    #[test]
    fn renders_location_condition_and_message() {
        let err = EnforceError::new(
            EnforceKind::InvariantViolation,
            loc(),
            "rows > 0",
            "empty input",
            None,
        );
        assert_eq!(err.to_string(), "[enforce fail at matmul.rs:88] rows > 0. empty input");
        assert_eq!(err.msg_without_backtrace(), err.to_string());
    }

    #[test]
    fn finite_kind_has_its_own_tag() {
        let err = EnforceError::new(EnforceKind::NonFiniteValue, loc(), "x.is_finite()", "", None);
        assert!(err.is_non_finite());
        assert!(err.to_string().starts_with("[enforce finite fail at matmul.rs:88]"));
    }

    #[test]
    fn unconditional_has_no_condition() {
        let err = EnforceError::new(EnforceKind::UnconditionalFailure, loc(), "", "unreachable", None);
        assert_eq!(err.to_string(), "[enforce fail at matmul.rs:88] unreachable");
    }

    #[test]
    fn caller_and_context_are_rendered() {
        let owner = 5u8;
        let id = CallerId::of(&owner);
        let err = EnforceError::new(EnforceKind::InvariantViolation, loc(), "ok", "bad", Some(id))
            .add_context("while loading layer 3");
        assert_eq!(err.caller(), Some(id));
        let text = err.to_string();
        assert!(text.contains(&format!("(caller: {:#x})", id.addr())));
        assert!(text.ends_with("\nwhile loading layer 3"));
        assert_eq!(err.context(), ["while loading layer 3".to_string()]);
    }

    #[test]
    fn caller_id_is_address_identity() {
        let a = [0u32; 2];
        assert_eq!(CallerId::of(&a), CallerId::of(&a));
        assert_ne!(CallerId::of(&a[0]), CallerId::of(&a[1]));
        assert_eq!(CallerId::from_addr(0x10).to_string(), "0x10");
    }
}
