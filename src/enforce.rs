//! Enforcement engine: turn a false condition into a typed error.
//!
//! The passing branch is a single test of the condition. All error
//! construction lives behind [`raise`], which is kept out of line.
//!
//! # Example
//!
//! ```
//! use vigil::{enforce, EnforceError};
//!
//! fn split(total: usize, parts: usize) -> Result<usize, EnforceError> {
//!     enforce!(parts > 0, "cannot split ", total, " into zero parts");
//!     Ok(total / parts)
//! }
//!
//! let err = split(10, 0).unwrap_err();
//! assert!(err.to_string().contains("parts > 0. cannot split 10 into zero parts"));
//! ```

use crate::config::use_fatal_for_enforce;
use crate::error::{CallerId, EnforceError, EnforceKind, Result};
use crate::location::SourceLocation;
use log::error;

/// Build the error for a failed check.
///
/// In fatal-enforce mode the error is logged and the process aborts.
#[cold]
#[inline(never)]
pub fn raise(
    kind: EnforceKind,
    location: SourceLocation,
    condition: &str,
    message: String,
    caller: Option<CallerId>,
) -> EnforceError {
    let err = EnforceError::new(kind, location, condition, message, caller);
    if use_fatal_for_enforce() {
        error!("{}", err);
        std::process::abort();
    }
    err
}

/// Fail with [`EnforceKind::InvariantViolation`] unless `condition` holds.
#[inline]
pub fn enforce(
    condition: bool,
    location: SourceLocation,
    condition_text: &str,
    message: &str,
) -> Result<()> {
    if condition {
        return Ok(());
    }
    Err(raise(
        EnforceKind::InvariantViolation,
        location,
        condition_text,
        message.to_owned(),
        None,
    ))
}

/// [`enforce`] with the raising object's identity attached.
#[inline]
pub fn enforce_with_caller(
    condition: bool,
    location: SourceLocation,
    condition_text: &str,
    message: &str,
    caller: CallerId,
) -> Result<()> {
    if condition {
        return Ok(());
    }
    Err(raise(
        EnforceKind::InvariantViolation,
        location,
        condition_text,
        message.to_owned(),
        Some(caller),
    ))
}

/// Fail with [`EnforceKind::NonFiniteValue`] unless `condition` holds.
#[inline]
pub fn enforce_finite(
    condition: bool,
    location: SourceLocation,
    condition_text: &str,
    message: &str,
) -> Result<()> {
    if condition {
        return Ok(());
    }
    Err(raise(
        EnforceKind::NonFiniteValue,
        location,
        condition_text,
        message.to_owned(),
        None,
    ))
}

/// [`enforce_finite`] with the raising object's identity attached.
#[inline]
pub fn enforce_finite_with_caller(
    condition: bool,
    location: SourceLocation,
    condition_text: &str,
    message: &str,
    caller: CallerId,
) -> Result<()> {
    if condition {
        return Ok(());
    }
    Err(raise(
        EnforceKind::NonFiniteValue,
        location,
        condition_text,
        message.to_owned(),
        Some(caller),
    ))
}

/// Always fails with [`EnforceKind::UnconditionalFailure`].
///
/// Generic over `T` so it can stand in for any value-producing branch.
pub fn throw_always<T>(location: SourceLocation, message: &str) -> Result<T> {
    Err(raise(
        EnforceKind::UnconditionalFailure,
        location,
        "",
        message.to_owned(),
        None,
    ))
}

/// Return early with an invariant-violation error unless the condition holds.
///
/// Message arguments are rendered only on failure. The enclosing function
/// must return `Result<_, E>` with `E: From<EnforceError>`.
#[macro_export]
macro_rules! enforce {
    ($cond:expr $(, $arg:expr)* $(,)?) => {
        if !($cond) {
            return ::std::result::Result::Err(::std::convert::From::from(
                $crate::enforce::raise(
                    $crate::EnforceKind::InvariantViolation,
                    $crate::location!(),
                    stringify!($cond),
                    $crate::vigil_str!($($arg),*),
                    ::std::option::Option::None,
                ),
            ));
        }
    };
}

/// [`enforce!`] with the raising object's identity as the first argument.
#[macro_export]
macro_rules! enforce_with_caller {
    ($caller:expr, $cond:expr $(, $arg:expr)* $(,)?) => {
        if !($cond) {
            return ::std::result::Result::Err(::std::convert::From::from(
                $crate::enforce::raise(
                    $crate::EnforceKind::InvariantViolation,
                    $crate::location!(),
                    stringify!($cond),
                    $crate::vigil_str!($($arg),*),
                    ::std::option::Option::Some($crate::CallerId::of($caller)),
                ),
            ));
        }
    };
}

/// Return early with a non-finite-value error unless the condition holds.
#[macro_export]
macro_rules! enforce_finite {
    ($cond:expr $(, $arg:expr)* $(,)?) => {
        if !($cond) {
            return ::std::result::Result::Err(::std::convert::From::from(
                $crate::enforce::raise(
                    $crate::EnforceKind::NonFiniteValue,
                    $crate::location!(),
                    stringify!($cond),
                    $crate::vigil_str!($($arg),*),
                    ::std::option::Option::None,
                ),
            ));
        }
    };
}

/// Return early with an unconditional-failure error.
#[macro_export]
macro_rules! vigil_throw {
    ($($arg:expr),* $(,)?) => {
        return ::std::result::Result::Err(::std::convert::From::from(
            $crate::enforce::raise(
                $crate::EnforceKind::UnconditionalFailure,
                $crate::location!(),
                "",
                $crate::vigil_str!($($arg),*),
                ::std::option::Option::None,
            ),
        ))
    };
}
