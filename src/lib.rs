/// Module for managing the source code and turning it into terms.
pub mod lang;

/// Module for the runtime and the data structures used by the interpreter.  As well as the
/// interpreter itself.
pub mod runtime;
