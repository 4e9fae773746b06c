use crate::runtime::{
    error,
    interpreter::{Flow, Interpreter},
};

/// Duplicate the top term on the stack.
///
/// Signature: `term -- term term`
pub fn word_dup(interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
    let term = interpreter.top();

    interpreter.push(term);

    Ok(Flow::Done)
}

/// Discard the top term on the stack.
///
/// Signature: `term -- `
pub fn word_pop(interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
    let _ = interpreter.pop();

    Ok(Flow::Done)
}

/// Swap the top 2 terms on the stack.
///
/// Signature: `a b -- b a`
pub fn word_swap(interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
    let b = interpreter.pop();
    let a = interpreter.pop();

    interpreter.push(b);
    interpreter.push(a);

    Ok(Flow::Done)
}

/// Wrap the top term in a one element quotation.
///
/// Signature: `term -- ( term )`
pub fn word_quote(interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
    let term = interpreter.pop();

    interpreter.push(vec![term].into());

    Ok(Flow::Done)
}
