/// Module for managing the original source code and decoding it into codepoints.
pub mod source_buffer;

/// The buffered cursor shared by every stage of the front end.
pub mod lookahead;

/// Module for managing the turning of the source code into a stream of tokens for further
/// processing.
pub mod tokenizing;

/// Module for turning the token stream into terms ready for evaluation.
pub mod parsing;
