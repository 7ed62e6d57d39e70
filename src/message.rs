//! Message builder: concatenates heterogeneous printable arguments.
//!
//! Arguments are joined in order with no separator. An argument whose
//! `Display` impl reports an error renders as [`UNPRINTABLE`] and the
//! remaining arguments are still rendered.

#![forbid(unsafe_code)]

use std::fmt::{self, Display, Write};

/// Placeholder written for an argument that fails to render.
pub const UNPRINTABLE: &str = "<unprintable>";

/// Render `args` into a single message.
///
/// An empty argument list returns an empty `String` without allocating.
pub fn build(args: &[&dyn Display]) -> String {
    match args {
        [] => String::new(),
        [only] => render(*only),
        _ => {
            let mut out = String::new();
            for arg in args {
                push_rendered(&mut out, *arg);
            }
            out
        }
    }
}

/// Render a single value, falling back to [`UNPRINTABLE`].
pub fn render(value: &dyn Display) -> String {
    let mut out = String::new();
    push_rendered(&mut out, value);
    out
}

fn push_rendered(out: &mut String, value: &dyn Display) {
    let mark = out.len();
    if write!(out, "{}", value).is_err() {
        out.truncate(mark);
        out.push_str(UNPRINTABLE);
    }
}

/// Displays a slice as its elements joined by `", "`.
///
/// ```
/// use vigil::message::Seq;
/// assert_eq!(vigil::vigil_str!("dims ", Seq(&[2, 3, 4])), "dims 2, 3, 4");
/// ```
pub struct Seq<'a, T>(pub &'a [T]);

impl<T: Display> Display for Seq<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for item in self.0 {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            item.fmt(f)?;
        }
        Ok(())
    }
}

impl<A, B> PartialEq<Seq<'_, B>> for Seq<'_, A>
where
    A: PartialEq<B>,
{
    fn eq(&self, other: &Seq<'_, B>) -> bool {
        self.0 == other.0
    }
}

/// Build a message from any number of `Display` arguments.
///
/// `vigil_str!()` yields an empty `String` with no formatting work.
#[macro_export]
macro_rules! vigil_str {
    () => {
        ::std::string::String::new()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::message::build(&[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Display for Broken {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    struct HalfBroken;

    impl Display for HalfBroken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("partial")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn concatenates_without_separator() {
        let msg = crate::vigil_str!("rank ", 3, " of ", 8u64, '!', 1.5);
        assert_eq!(msg, "rank 3 of 8!1.5");
    }

    #[test]
    fn empty_in_empty_out() {
        let msg = crate::vigil_str!();
        assert!(msg.is_empty());
        assert_eq!(msg.capacity(), 0);
        assert_eq!(build(&[]), "");
    }

    #[test]
    fn failing_argument_becomes_placeholder() {
        let msg = crate::vigil_str!("a", Broken, "b", HalfBroken, "c");
        assert_eq!(msg, format!("a{UNPRINTABLE}b{UNPRINTABLE}c"));
    }

    #[test]
    fn seq_compares_elementwise() {
        assert!(Seq(&[1, 2]) == Seq(&[1, 2]));
        assert!(Seq(&[1, 2]) != Seq(&[1, 3]));
        assert!(Seq(&[1]) != Seq(&[1, 1]));
    }

    #[test]
    fn seq_joins_with_commas() {
        assert_eq!(Seq(&[1, 2, 3]).to_string(), "1, 2, 3");
        assert_eq!(Seq::<i32>(&[]).to_string(), "");
        assert_eq!(crate::vigil_str!("[", Seq(&["x", "y"]), "]"), "[x, y]");
    }
}
