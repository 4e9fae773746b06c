use std::{ error::Error,
           fmt::{ self, Debug, Display, Formatter } };
use crate::lang::source_buffer::SourceLocation;



pub type Result<T> = std::result::Result<T, ScriptError>;



/// The broad category of a failure.  Every error is fatal to the run, the kind only exists so that
/// callers and tests can tell what went wrong without matching on message text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind
{
    /// Unterminated strings, comments or sequences, and malformed `_token` directives.
    Syntax,

    /// Redefinition of a dictionary word or a grammar token.
    Definition,

    /// Undefined symbols and malformed word names.
    Lookup,

    /// An operand of the wrong shape, a sequence where a scalar is required or the reverse.
    Type,

    /// Port indices and codepoints outside of their valid range, or a port used against its
    /// direction.
    Range,

    /// Arithmetic the term algebra refuses to perform.
    ArithmeticPolicy,

    /// The source bytes are not valid UTF-8.
    Encoding,

    /// The underlying byte streams failed.
    Io,

    /// The process was started with the wrong arguments.
    CommandLine
}


impl Display for ErrorKind
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        let name = match self
            {
                ErrorKind::Syntax           => "syntax error",
                ErrorKind::Definition       => "definition error",
                ErrorKind::Lookup           => "lookup error",
                ErrorKind::Type             => "type error",
                ErrorKind::Range            => "range error",
                ErrorKind::ArithmeticPolicy => "arithmetic error",
                ErrorKind::Encoding         => "encoding error",
                ErrorKind::Io               => "I/O error",
                ErrorKind::CommandLine      => "command line error"
            };

        write!(f, "{}", name)
    }
}



/// Any error that occurs while decoding, tokenizing, parsing or evaluating a script.
#[derive(Clone)]
pub struct ScriptError
{
    /// What kind of failure this is.
    kind: ErrorKind,

    /// The location in the source code the error occurred, if available.
    location: Option<SourceLocation>,

    /// The description of the error.
    error: String
}


impl Error for ScriptError
{
}


/// Pretty print the ScriptError, prefixed with the source location when one is known.
impl Display for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match &self.location
        {
            Some(location) => write!(f, "{}: {}", location, self.error),
            None => write!(f, "{}", self.error)
        }
    }
}


/// Returning a `Result` from `main` prints the error with `Debug`, so keep it readable for the
/// user.
impl Debug for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "{}", self)
    }
}


impl ScriptError
{
    /// Create a new ScriptError.
    pub fn new(kind: ErrorKind, location: Option<SourceLocation>, error: String) -> ScriptError
    {
        ScriptError
            {
                kind,
                location,
                error
            }
    }

    /// Create a new Script Error and wrap it in a Result::Err.
    pub fn new_as_result<T>(kind: ErrorKind,
                            location: Option<SourceLocation>,
                            error: String) -> Result<T>
    {
        Err(ScriptError::new(kind, location, error))
    }

    /// What category of failure occurred.
    pub fn kind(&self) -> ErrorKind
    {
        self.kind
    }

    /// If available, the location in the source code the error occurred.
    pub fn location(&self) -> &Option<SourceLocation>
    {
        &self.location
    }

    /// The description of the error.
    pub fn error(&self) -> &String
    {
        &self.error
    }

    /// Attach a location to an error that was raised without one.  Errors that already know where
    /// they came from keep their original location.
    pub fn or_location(mut self, location: Option<&SourceLocation>) -> ScriptError
    {
        if self.location.is_none()
        {
            self.location = location.cloned();
        }

        self
    }
}


/// Allow for the conversion of a std::io::Error into a ScriptError.
impl From<std::io::Error> for ScriptError
{
    fn from(error: std::io::Error) -> ScriptError
    {
        ScriptError::new(ErrorKind::Io, None, format!("I/O error: {}", error))
    }
}



/// A convenience function for creating a located error wrapped in a Result::Err.
pub fn script_error<T>(kind: ErrorKind, location: &SourceLocation, message: String) -> Result<T>
{
    ScriptError::new_as_result(kind, Some(location.clone()), message)
}


/// A convenience function for raising an error that has no source location yet.  The run loop
/// attaches the location of the term being evaluated.
pub fn script_error_str<T>(kind: ErrorKind, message: &str) -> Result<T>
{
    ScriptError::new_as_result(kind, None, message.to_string())
}



#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn display_includes_location_when_known()
    {
        let location = SourceLocation::new_from_info("test.vy", 3, 7);
        let error = ScriptError::new(ErrorKind::Syntax,
                                     Some(location),
                                     "Expected ) before EOF.".to_string());

        assert_eq!(error.to_string(), "test.vy (3, 7): Expected ) before EOF.");
        assert_eq!(error.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn or_location_keeps_the_original_location()
    {
        let first = SourceLocation::new_from_info("a", 1, 1);
        let second = SourceLocation::new_from_info("b", 2, 2);

        let located = ScriptError::new(ErrorKind::Lookup, Some(first.clone()), "x".to_string())
            .or_location(Some(&second));
        assert_eq!(located.location(), &Some(first));

        let unlocated = ScriptError::new(ErrorKind::Lookup, None, "x".to_string())
            .or_location(Some(&second));
        assert_eq!(unlocated.location(), &Some(second));
    }

    #[test]
    fn io_errors_convert()
    {
        let error: ScriptError = std::io::Error::other("boom").into();

        assert_eq!(error.kind(), ErrorKind::Io);
        assert!(error.error().contains("boom"));
    }
}
