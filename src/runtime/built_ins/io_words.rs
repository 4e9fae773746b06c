use crate::runtime::{
    data_structures::term::Term,
    error::{self, ErrorKind, script_error_str},
    interpreter::{Flow, Interpreter},
};

/// The port `write` prints to.
const STANDARD_OUTPUT: usize = 1;

/// Print the textual form of the top term to standard output, followed by a new line.
///
/// Signature: `term -- `
pub fn word_write(interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
    let term = interpreter.pop();
    let port = interpreter.output_port(STANDARD_OUTPUT)?;

    writeln!(port, "{}", term)?;

    Ok(Flow::Done)
}

/// Write a single codepoint, UTF-8 encoded, to a port.
///
/// Signature: `char port -- `
pub fn word_putc(interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
    let port = interpreter.pop();
    let character = interpreter.pop();

    let (Term::Scalar(value), Term::Scalar(index)) = (&character, &port) else {
        return script_error_str(
            ErrorKind::Type,
            &format!(
                "putc does not understand sequences in:\n{} {} putc",
                character, port
            ),
        );
    };

    let Ok(index) = usize::try_from(*index) else {
        return script_error_str(ErrorKind::Range, "Invalid port number.");
    };

    let Some(character) = u32::try_from(*value).ok().and_then(char::from_u32) else {
        return script_error_str(
            ErrorKind::Range,
            &format!("Invalid codepoint {} for putc.", value),
        );
    };

    let mut encoded = [0; 4];
    let port = interpreter.output_port(index)?;

    port.write_all(character.encode_utf8(&mut encoded).as_bytes())?;

    Ok(Flow::Done)
}
