use crate::runtime::{
    error::{self, ErrorKind, script_error_str},
    interpreter::{Flow, Interpreter},
};

/// Bind a name to a body in the dictionary.  The name is a string, the body can be any term.
///
/// Signature: `body name -- `
pub fn word_def(interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
    let name = interpreter.pop();
    let body = interpreter.pop();

    let Some(name) = name.as_sequence().and_then(|sequence| sequence.text()) else {
        return script_error_str(
            ErrorKind::Lookup,
            &format!("invalid _def usage, {} is not a valid word name.", name),
        );
    };

    log::debug!("Defining word {} as {}.", name, body);

    interpreter.define_word(name, body)?;

    Ok(Flow::Done)
}
