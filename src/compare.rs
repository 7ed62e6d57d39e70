//! Rich comparison diagnostics.
//!
//! Both operands are evaluated exactly once, compared, and on failure the
//! error message is `"<lhs> vs <rhs>"`, followed by `". "` and any extra
//! context. Operands and extra context both render with `Display` through
//! the message builder; wrap slices in [`Seq`](crate::message::Seq).
//!
//! ```
//! use vigil::{enforce_eq, EnforceError};
//!
//! fn check(rows: usize) -> Result<(), EnforceError> {
//!     enforce_eq!(rows, 4, "bad row count");
//!     Ok(())
//! }
//! let err = check(3).unwrap_err();
//! assert_eq!(err.condition(), "rows == 4");
//! assert_eq!(err.message(), "3 vs 4. bad row count");
//! ```

#![warn(missing_docs)]

use crate::enforce::raise;
use crate::error::{CallerId, EnforceError, EnforceKind, Result};
use crate::location::SourceLocation;
use crate::message;
use std::fmt::{self, Display};

/// Binary comparison operators accepted by [`compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// All operators, in declaration order.
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Lt,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Ge,
    ];

    /// Source spelling of the operator.
    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Apply the operator to already-evaluated operands.
    #[inline]
    pub fn apply<T1, T2>(self, lhs: &T1, rhs: &T2) -> bool
    where
        T1: PartialOrd<T2> + ?Sized,
        T2: ?Sized,
    {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Outcome of one comparison. Operand text exists only on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// The operator held.
    Passed,
    /// The operator did not hold.
    Failed {
        /// Rendering of the left operand.
        lhs: String,
        /// Rendering of the right operand.
        rhs: String,
    },
}

impl Comparison {
    /// Compare `lhs` and `rhs` under `op`.
    pub fn evaluate<T1, T2>(op: CompareOp, lhs: &T1, rhs: &T2) -> Self
    where
        T1: PartialOrd<T2> + Display + ?Sized,
        T2: Display + ?Sized,
    {
        if op.apply(lhs, rhs) {
            Comparison::Passed
        } else {
            Comparison::failed(&lhs, &rhs)
        }
    }

    /// A failed outcome holding both operands' renderings.
    pub fn failed(lhs: &dyn Display, rhs: &dyn Display) -> Self {
        Comparison::Failed {
            lhs: message::render(lhs),
            rhs: message::render(rhs),
        }
    }

    /// Whether the operator held.
    pub fn passed(&self) -> bool {
        matches!(self, Comparison::Passed)
    }

    /// The failure message, or `None` when the comparison passed.
    pub fn failure_message(&self, extra: &[&dyn Display]) -> Option<String> {
        match self {
            Comparison::Passed => None,
            Comparison::Failed { lhs, rhs } => Some(join_failure(lhs, rhs, extra)),
        }
    }

    /// `Ok` when passed, otherwise the enforcement error for `expr`.
    pub fn into_result(
        self,
        expr: &str,
        extra: &[&dyn Display],
        location: SourceLocation,
        caller: Option<CallerId>,
    ) -> Result<()> {
        match self.failure_message(extra) {
            None => Ok(()),
            Some(msg) => Err(raise(EnforceKind::InvariantViolation, location, expr, msg, caller)),
        }
    }
}

fn join_failure(lhs: &str, rhs: &str, extra: &[&dyn Display]) -> String {
    let mut msg = String::with_capacity(lhs.len() + rhs.len() + 4);
    msg.push_str(lhs);
    msg.push_str(" vs ");
    msg.push_str(rhs);
    if !extra.is_empty() {
        msg.push_str(". ");
        msg.push_str(&message::build(extra));
    }
    msg
}

/// Build the error for a failed comparison of evaluated operands.
#[cold]
#[inline(never)]
pub fn raise_comparison(
    location: SourceLocation,
    expr: &str,
    lhs: &dyn Display,
    rhs: &dyn Display,
    extra: &[&dyn Display],
    caller: Option<CallerId>,
) -> EnforceError {
    let msg = Comparison::failed(lhs, rhs)
        .failure_message(extra)
        .unwrap_or_default();
    raise(EnforceKind::InvariantViolation, location, expr, msg, caller)
}

/// Fail unless `lhs op rhs` holds.
///
/// `expr` is the source text reported as the failed condition.
pub fn compare<T1, T2>(
    op: CompareOp,
    lhs: &T1,
    rhs: &T2,
    expr: &str,
    extra: &[&dyn Display],
    location: SourceLocation,
    caller: Option<CallerId>,
) -> Result<()>
where
    T1: PartialOrd<T2> + Display + ?Sized,
    T2: Display + ?Sized,
{
    Comparison::evaluate(op, lhs, rhs).into_result(expr, extra, location, caller)
}

macro_rules! equality_check {
    ($(#[$doc:meta])* $name:ident, $op:tt) => {
        $(#[$doc])*
        pub fn $name<T1, T2>(
            lhs: &T1,
            rhs: &T2,
            expr: &str,
            extra: &[&dyn Display],
            location: SourceLocation,
            caller: Option<CallerId>,
        ) -> Result<()>
        where
            T1: PartialEq<T2> + Display + ?Sized,
            T2: Display + ?Sized,
        {
            if *lhs $op *rhs {
                return Ok(());
            }
            Comparison::failed(&lhs, &rhs).into_result(expr, extra, location, caller)
        }
    };
}

macro_rules! ordering_check {
    ($(#[$doc:meta])* $name:ident, $op:ident) => {
        $(#[$doc])*
        pub fn $name<T1, T2>(
            lhs: &T1,
            rhs: &T2,
            expr: &str,
            extra: &[&dyn Display],
            location: SourceLocation,
            caller: Option<CallerId>,
        ) -> Result<()>
        where
            T1: PartialOrd<T2> + Display + ?Sized,
            T2: Display + ?Sized,
        {
            compare(CompareOp::$op, lhs, rhs, expr, extra, location, caller)
        }
    };
}

equality_check!(
    /// Fail unless `lhs == rhs`.
    enforce_eq, ==
);
equality_check!(
    /// Fail unless `lhs != rhs`.
    enforce_ne, !=
);
ordering_check!(
    /// Fail unless `lhs < rhs`.
    enforce_lt, Lt
);
ordering_check!(
    /// Fail unless `lhs <= rhs`.
    enforce_le, Le
);
ordering_check!(
    /// Fail unless `lhs > rhs`.
    enforce_gt, Gt
);
ordering_check!(
    /// Fail unless `lhs >= rhs`.
    enforce_ge, Ge
);

#[doc(hidden)]
#[macro_export]
macro_rules! __enforce_binary {
    ($caller:expr, $op:tt, $lhs:expr, $rhs:expr $(, $arg:expr)*) => {
        match (&$lhs, &$rhs) {
            (lhs, rhs) => {
                if !(*lhs $op *rhs) {
                    return ::std::result::Result::Err(::std::convert::From::from(
                        $crate::compare::raise_comparison(
                            $crate::location!(),
                            concat!(stringify!($lhs), " ", stringify!($op), " ", stringify!($rhs)),
                            lhs,
                            rhs,
                            &[$(&$arg as &dyn ::std::fmt::Display),*],
                            $caller,
                        ),
                    ));
                }
            }
        }
    };
}

/// Return early unless `lhs <op> rhs` holds, reporting both values.
///
/// `enforce_that!(<=, used, capacity, "pool exhausted")`
#[macro_export]
macro_rules! enforce_that {
    ($op:tt, $lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(::std::option::Option::None, $op, $lhs, $rhs $(, $arg)*)
    };
}

/// [`enforce_that!`] with the raising object's identity as the first argument.
#[macro_export]
macro_rules! enforce_that_with_caller {
    ($caller:expr, $op:tt, $lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(
            ::std::option::Option::Some($crate::CallerId::of($caller)),
            $op, $lhs, $rhs $(, $arg)*
        )
    };
}

/// Return early unless `lhs == rhs`, reporting both values.
#[macro_export]
macro_rules! enforce_eq {
    ($lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(::std::option::Option::None, ==, $lhs, $rhs $(, $arg)*)
    };
}

/// [`enforce_eq!`] with the raising object's identity as the first argument.
#[macro_export]
macro_rules! enforce_eq_with_caller {
    ($caller:expr, $lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(
            ::std::option::Option::Some($crate::CallerId::of($caller)),
            ==, $lhs, $rhs $(, $arg)*
        )
    };
}

/// Return early unless `lhs != rhs`, reporting both values.
#[macro_export]
macro_rules! enforce_ne {
    ($lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(::std::option::Option::None, !=, $lhs, $rhs $(, $arg)*)
    };
}

/// [`enforce_ne!`] with the raising object's identity as the first argument.
#[macro_export]
macro_rules! enforce_ne_with_caller {
    ($caller:expr, $lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(
            ::std::option::Option::Some($crate::CallerId::of($caller)),
            !=, $lhs, $rhs $(, $arg)*
        )
    };
}

/// Return early unless `lhs < rhs`, reporting both values.
#[macro_export]
macro_rules! enforce_lt {
    ($lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(::std::option::Option::None, <, $lhs, $rhs $(, $arg)*)
    };
}

/// [`enforce_lt!`] with the raising object's identity as the first argument.
#[macro_export]
macro_rules! enforce_lt_with_caller {
    ($caller:expr, $lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(
            ::std::option::Option::Some($crate::CallerId::of($caller)),
            <, $lhs, $rhs $(, $arg)*
        )
    };
}

/// Return early unless `lhs <= rhs`, reporting both values.
#[macro_export]
macro_rules! enforce_le {
    ($lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(::std::option::Option::None, <=, $lhs, $rhs $(, $arg)*)
    };
}

/// [`enforce_le!`] with the raising object's identity as the first argument.
#[macro_export]
macro_rules! enforce_le_with_caller {
    ($caller:expr, $lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(
            ::std::option::Option::Some($crate::CallerId::of($caller)),
            <=, $lhs, $rhs $(, $arg)*
        )
    };
}

/// Return early unless `lhs > rhs`, reporting both values.
#[macro_export]
macro_rules! enforce_gt {
    ($lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(::std::option::Option::None, >, $lhs, $rhs $(, $arg)*)
    };
}

/// [`enforce_gt!`] with the raising object's identity as the first argument.
#[macro_export]
macro_rules! enforce_gt_with_caller {
    ($caller:expr, $lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(
            ::std::option::Option::Some($crate::CallerId::of($caller)),
            >, $lhs, $rhs $(, $arg)*
        )
    };
}

/// Return early unless `lhs >= rhs`, reporting both values.
#[macro_export]
macro_rules! enforce_ge {
    ($lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(::std::option::Option::None, >=, $lhs, $rhs $(, $arg)*)
    };
}

/// [`enforce_ge!`] with the raising object's identity as the first argument.
#[macro_export]
macro_rules! enforce_ge_with_caller {
    ($caller:expr, $lhs:expr, $rhs:expr $(, $arg:expr)* $(,)?) => {
        $crate::__enforce_binary!(
            ::std::option::Option::Some($crate::CallerId::of($caller)),
            >=, $lhs, $rhs $(, $arg)*
        )
    };
}
