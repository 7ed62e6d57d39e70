use proptest::prelude::*;
use std::cell::Cell;
use vigil::{compare, location, CompareOp, EnforceError, EnforceKind};

struct Counted<'a> {
    hits: &'a Cell<usize>,
}

impl Counted<'_> {
    fn eval(&self, v: i64) -> i64 {
        self.hits.set(self.hits.get() + 1);
        v
    }
}

fn run_op(op: CompareOp, a: i64, b: i64, lhs: &Counted, rhs: &Counted) -> Result<(), EnforceError> {
    match op {
        CompareOp::Eq => vigil::enforce_eq!(lhs.eval(a), rhs.eval(b), "eq ", lhs.hits.get()),
        CompareOp::Ne => vigil::enforce_ne!(lhs.eval(a), rhs.eval(b), "ne"),
        CompareOp::Lt => vigil::enforce_lt!(lhs.eval(a), rhs.eval(b)),
        CompareOp::Le => vigil::enforce_le!(lhs.eval(a), rhs.eval(b)),
        CompareOp::Gt => vigil::enforce_gt!(lhs.eval(a), rhs.eval(b)),
        CompareOp::Ge => vigil::enforce_that!(>=, lhs.eval(a), rhs.eval(b), "ge"),
    }
    Ok(())
}

fn expected(op: CompareOp, a: i64, b: i64) -> bool {
    match op {
        CompareOp::Eq => a == b,
        CompareOp::Ne => a != b,
        CompareOp::Lt => a < b,
        CompareOp::Le => a <= b,
        CompareOp::Gt => a > b,
        CompareOp::Ge => a >= b,
    }
}

fn eq_three_four() -> Result<(), EnforceError> {
    let x = 3;
    let y = 4;
    vigil::enforce_eq!(x, y);
    Ok(())
}

fn le_five_five() -> Result<(), EnforceError> {
    let a = 5;
    let b = 5;
    vigil::enforce_le!(a, b);
    Ok(())
}

#[test]
fn eq_reports_lhs_vs_rhs() {
    let err = eq_three_four().unwrap_err();
    assert_eq!(err.kind(), EnforceKind::InvariantViolation);
    assert_eq!(err.condition(), "x == y");
    assert!(err.message().contains("3 vs 4"));
    assert!(err.to_string().contains("x == y. 3 vs 4"));
}

#[test]
fn le_on_equal_values_passes() {
    assert!(le_five_five().is_ok());
}

#[test]
fn heterogeneous_operands() {
    fn names(got: String) -> Result<(), EnforceError> {
        vigil::enforce_eq!(got, "relu", "activation mismatch");
        Ok(())
    }
    assert!(names("relu".to_string()).is_ok());
    let err = names("gelu".to_string()).unwrap_err();
    assert_eq!(err.message(), "gelu vs relu. activation mismatch");

    fn fits(len: u32, capacity: u64) -> Result<(), EnforceError> {
        vigil::enforce_le!(u64::from(len), capacity);
        Ok(())
    }
    assert!(fits(8, 8).is_ok());
    assert_eq!(fits(9, 8).unwrap_err().message(), "9 vs 8");
}

#[test]
fn operand_text_matches_vigil_str() {
    fn ratio(a: f64, b: f64) -> Result<(), EnforceError> {
        vigil::enforce_lt!(a, b, "ratio");
        Ok(())
    }
    let err = ratio(3.0, 2.5).unwrap_err();
    assert_eq!(err.message(), vigil::vigil_str!(3.0f64, " vs ", 2.5f64, ". ", "ratio"));
    assert_eq!(err.message(), "3 vs 2.5. ratio");
}

#[test]
fn display_only_user_types_compare() {
    use std::fmt;

    #[derive(PartialEq)]
    struct Device(&'static str, u8);

    impl fmt::Display for Device {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}:{}", self.0, self.1)
        }
    }

    fn same_device(a: Device, b: Device) -> Result<(), EnforceError> {
        vigil::enforce_eq!(a, b, "tensors on different devices");
        Ok(())
    }
    assert!(same_device(Device("cuda", 0), Device("cuda", 0)).is_ok());
    let err = same_device(Device("cuda", 0), Device("cpu", 0)).unwrap_err();
    assert_eq!(err.message(), "cuda:0 vs cpu:0. tensors on different devices");
}

#[test]
fn extra_arguments_only_render_on_failure() {
    let rendered = Cell::new(0);
    let expensive = || {
        rendered.set(rendered.get() + 1);
        "context"
    };
    let check = |a: i32, b: i32| -> Result<(), EnforceError> {
        vigil::enforce_ne!(a, b, expensive());
        Ok(())
    };
    assert!(check(1, 2).is_ok());
    assert_eq!(rendered.get(), 0);
    assert_eq!(check(2, 2).unwrap_err().message(), "2 vs 2. context");
    assert_eq!(rendered.get(), 1);
}

#[test]
fn generic_compare_function() {
    let loc = location!();
    assert!(compare(CompareOp::Lt, &1u8, &2u8, "a < b", &[], loc, None).is_ok());
    let err = compare(CompareOp::Gt, &1u8, &2u8, "a > b", &[&"tail ", &7], loc, None).unwrap_err();
    assert_eq!(err.condition(), "a > b");
    assert_eq!(err.message(), "1 vs 2. tail 7");
    assert_eq!(err.location(), loc);
}

proptest! {
    #[test]
    fn operands_are_evaluated_exactly_once(a in -1000i64..1000, b in -1000i64..1000, idx in 0usize..6) {
        let op = CompareOp::ALL[idx];
        let lh = Cell::new(0);
        let rh = Cell::new(0);
        let result = run_op(op, a, b, &Counted { hits: &lh }, &Counted { hits: &rh });
        prop_assert_eq!(lh.get(), 1);
        prop_assert_eq!(rh.get(), 1);
        prop_assert_eq!(result.is_ok(), expected(op, a, b));
    }

    #[test]
    fn failure_message_names_both_values(a in any::<i32>(), b in any::<i32>()) {
        prop_assume!(a != b);
        let err = compare(CompareOp::Eq, &a, &b, "a == b", &[], location!(), None).unwrap_err();
        let expected_msg = format!("{} vs {}", a, b);
        prop_assert_eq!(err.message(), expected_msg.as_str());
    }

    #[test]
    fn apply_agrees_with_std(a in any::<i16>(), b in any::<i16>(), idx in 0usize..6) {
        let op = CompareOp::ALL[idx];
        prop_assert_eq!(op.apply(&a, &b), expected(op, i64::from(a), i64::from(b)));
    }
}
