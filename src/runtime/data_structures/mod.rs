/// Module contains the Term enumeration and it's implementation.  The term is the single value
/// and code representation of the language.
pub mod term;

/// The dictionary module provides the word dictionary used by the interpreter.
pub mod dictionary;

/// The set of custom multi-character tokens installed by `_token`.
pub mod grammar;

/// The numbered byte streams scripts can write to.
pub mod port;
