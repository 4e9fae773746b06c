use crate::runtime::{
    data_structures::term::Term,
    error,
    interpreter::{Flow, Interpreter},
};

/// Apply the top term.  A quotation runs its children in order, a scalar pushes itself.
///
/// Signature: `term -- <results>`
pub fn word_apply(interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
    Ok(Flow::Apply(interpreter.pop()))
}

/// Apply one of two branches depending on a test value.  Anything other than the scalar 0 counts
/// as true, including every sequence.
///
/// Signature: `test then else -- <results>`
pub fn word_cond(interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
    let else_branch = interpreter.pop();
    let then_branch = interpreter.pop();
    let test = interpreter.pop();

    let branch = if test != Term::Scalar(0) {
        then_branch
    } else {
        else_branch
    };

    Ok(Flow::Apply(branch))
}
