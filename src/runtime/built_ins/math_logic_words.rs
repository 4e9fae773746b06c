use crate::runtime::{
    data_structures::term::Term,
    error::{self, ErrorKind, script_error_str},
    interpreter::{Flow, Interpreter},
};

/// Concatenate two terms, or add them if both are scalars.  A lone scalar or builtin is treated as
/// a one element sequence when the other side is a sequence.
pub fn add(a: &Term, b: &Term) -> Term {
    match (a, b) {
        (Term::Scalar(a), Term::Scalar(b)) => Term::Scalar(a.wrapping_add(*b)),

        _ => {
            let terms: Vec<Term> = as_slice(a).iter().chain(as_slice(b)).cloned().collect();
            terms.into()
        }
    }
}

/// Subtract two scalars.
pub fn subtract(a: &Term, b: &Term) -> error::Result<Term> {
    let (a, b) = scalar_operands("-", a, b)?;
    Ok(Term::Scalar(a.wrapping_sub(b)))
}

/// Multiply two scalars, or repeat a sequence a number of times.
pub fn multiply(a: &Term, b: &Term) -> error::Result<Term> {
    match (a, b) {
        (Term::Scalar(a), Term::Scalar(b)) => Ok(Term::Scalar(a.wrapping_mul(*b))),

        (Term::Scalar(count), sequence @ Term::Sequence(_))
        | (sequence @ Term::Sequence(_), Term::Scalar(count)) => repeat(sequence, *count),

        (Term::Sequence(_), Term::Sequence(_)) => script_error_str(
            ErrorKind::ArithmeticPolicy,
            "* cannot be applied to two sequences.",
        ),

        _ => script_error_str(ErrorKind::Type, "* cannot be applied to builtins."),
    }
}

/// Divide two scalars, truncating toward zero.
pub fn divide(a: &Term, b: &Term) -> error::Result<Term> {
    let (a, b) = scalar_operands("/", a, b)?;

    if b == 0 {
        return script_error_str(ErrorKind::ArithmeticPolicy, "Division by zero.");
    }

    Ok(Term::Scalar(a.wrapping_div(b)))
}

/// The remainder of dividing two scalars.  Takes the sign of the dividend.
pub fn remainder(a: &Term, b: &Term) -> error::Result<Term> {
    let (a, b) = scalar_operands("%", a, b)?;

    if b == 0 {
        return script_error_str(ErrorKind::ArithmeticPolicy, "Division by zero.");
    }

    Ok(Term::Scalar(a.wrapping_rem(b)))
}

/// View a term as a list of terms for concatenation.
fn as_slice(term: &Term) -> &[Term] {
    match term {
        Term::Sequence(sequence) => sequence.terms(),
        _ => std::slice::from_ref(term),
    }
}

/// Repeat the children of a sequence.
fn repeat(sequence: &Term, count: i32) -> error::Result<Term> {
    if count < 0 {
        return script_error_str(
            ErrorKind::ArithmeticPolicy,
            "* cannot repeat a sequence a negative number of times.",
        );
    }

    let terms = as_slice(sequence);

    if terms.is_empty() {
        return Ok(Term::empty());
    }

    let repeated: Vec<Term> = (0..count).flat_map(|_| terms.iter().cloned()).collect();

    Ok(repeated.into())
}

/// Make sure both operands of a scalar only operation are scalars.
fn scalar_operands(name: &str, a: &Term, b: &Term) -> error::Result<(i32, i32)> {
    match (a, b) {
        (Term::Scalar(a), Term::Scalar(b)) => Ok((*a, *b)),

        (Term::Sequence(_), Term::Sequence(_)) => script_error_str(
            ErrorKind::ArithmeticPolicy,
            &format!("{} cannot be applied to two sequences.", name),
        ),

        _ => script_error_str(
            ErrorKind::Type,
            &format!("{} can only be applied to scalars.", name),
        ),
    }
}

/// Concatenate the top two terms.
///
/// Signature: `a b -- a+b`
pub fn word_compose(interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
    let b = interpreter.pop();
    let a = interpreter.pop();

    interpreter.push(add(&a, &b));

    Ok(Flow::Done)
}

/// Run a binary operator on the top two terms.
///
/// Signature: `a b -- result`
pub fn word_binary(
    interpreter: &mut dyn Interpreter,
    op: fn(&Term, &Term) -> error::Result<Term>,
) -> error::Result<Flow> {
    let b = interpreter.pop();
    let a = interpreter.pop();

    interpreter.push(op(&a, &b)?);

    Ok(Flow::Done)
}

/// Compare the top two terms under the total term order, pushing 1 or 0.
///
/// Signature: `a b -- bool`
pub fn word_compare(
    interpreter: &mut dyn Interpreter,
    op: fn(&Term, &Term) -> bool,
) -> error::Result<Flow> {
    let b = interpreter.pop();
    let a = interpreter.pop();

    interpreter.push(op(&a, &b).into());

    Ok(Flow::Done)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(values: &[i32]) -> Term {
        Term::from(values.iter().copied().map(Term::Scalar).collect::<Vec<_>>())
    }

    #[test]
    fn scalar_addition_wraps() {
        assert_eq!(add(&Term::Scalar(2), &Term::Scalar(3)), Term::Scalar(5));
        assert_eq!(
            add(&Term::Scalar(i32::MAX), &Term::Scalar(1)),
            Term::Scalar(i32::MIN)
        );
    }

    #[test]
    fn addition_concatenates_with_coercion() {
        assert_eq!(add(&seq(&[1, 2]), &seq(&[3])), seq(&[1, 2, 3]));
        assert_eq!(add(&Term::Scalar(1), &seq(&[2, 3])), seq(&[1, 2, 3]));
        assert_eq!(add(&seq(&[1, 2]), &Term::Scalar(3)), seq(&[1, 2, 3]));
        assert_eq!(add(&Term::empty(), &Term::empty()), Term::empty());
    }

    #[test]
    fn multiplication_repeats_sequences() {
        assert_eq!(
            multiply(&Term::Scalar(3), &seq(&[1, 2])).unwrap(),
            seq(&[1, 2, 1, 2, 1, 2])
        );
        assert_eq!(
            multiply(&seq(&[7]), &Term::Scalar(2)).unwrap(),
            seq(&[7, 7])
        );
        assert_eq!(
            multiply(&Term::Scalar(0), &seq(&[1])).unwrap(),
            Term::empty()
        );
        assert_eq!(
            multiply(&Term::Scalar(-1), &seq(&[1])).unwrap_err().kind(),
            ErrorKind::ArithmeticPolicy
        );
        assert_eq!(
            multiply(&seq(&[1]), &seq(&[2])).unwrap_err().kind(),
            ErrorKind::ArithmeticPolicy
        );
    }

    #[test]
    fn division_truncates_and_rejects_zero() {
        assert_eq!(
            divide(&Term::Scalar(-7), &Term::Scalar(2)).unwrap(),
            Term::Scalar(-3)
        );
        assert_eq!(
            remainder(&Term::Scalar(-7), &Term::Scalar(2)).unwrap(),
            Term::Scalar(-1)
        );
        assert_eq!(
            divide(&Term::Scalar(i32::MIN), &Term::Scalar(-1)).unwrap(),
            Term::Scalar(i32::MIN)
        );
        assert_eq!(
            divide(&Term::Scalar(1), &Term::Scalar(0)).unwrap_err().kind(),
            ErrorKind::ArithmeticPolicy
        );
        assert_eq!(
            remainder(&Term::Scalar(1), &Term::Scalar(0)).unwrap_err().kind(),
            ErrorKind::ArithmeticPolicy
        );
    }

    #[test]
    fn scalar_only_operators_reject_sequences() {
        assert_eq!(
            subtract(&seq(&[1]), &Term::Scalar(1)).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            subtract(&Term::Scalar(1), &seq(&[1])).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            subtract(&seq(&[1]), &seq(&[1])).unwrap_err().kind(),
            ErrorKind::ArithmeticPolicy
        );
        assert_eq!(
            remainder(&seq(&[1]), &Term::Scalar(1)).unwrap_err().kind(),
            ErrorKind::Type
        );
    }
}
