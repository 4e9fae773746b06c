use crate::runtime::{
    data_structures::{dictionary::Dictionary, grammar::GrammarPtr, term::Term},
    error,
};
use std::io::{Read, Write};

/// The interpreter context: stack, dictionary, grammar and ports.
pub mod context;

/// The iterative term evaluator.
pub mod evaluation;

/// What the evaluator should do once a builtin has finished.
pub enum Flow {
    /// Nothing further, move on to the next term.
    Done,

    /// Apply the given term next.  Used by `apply`, `cond` and symbol resolution so that running
    /// a quotation never recurses on the native stack.
    Apply(Term),
}

/// The operand stack of terms managed by the interpreter.
pub type TermStack = Vec<Term>;

/// Trait for managing the interpreter's operand stack.  Intended to be called by the builtins.
pub trait InterpreterStack {
    /// Examine the full operand stack, bottom first.
    fn stack(&self) -> &TermStack;

    /// Push a term onto the stack.
    fn push(&mut self, term: Term);

    /// Pop the top term from the stack.  An empty stack yields the empty sequence rather than
    /// failing.
    fn pop(&mut self) -> Term;

    /// Get a copy of the top term without removing it.  An empty stack yields the empty
    /// sequence.
    fn top(&self) -> Term;
}

/// Trait for reading and extending the word dictionary.
pub trait WordManagement {
    /// Access the dictionary.
    fn dictionary(&self) -> &Dictionary;

    /// Bind a new word.  Words can not be redefined.
    fn define_word(&mut self, name: String, body: Term) -> error::Result<()>;

    /// Resolve a word to its body.
    fn find_word(&self, name: &str) -> error::Result<Term>;
}

/// Trait for managing the custom token grammar used by the tokenizer.
pub trait TokenManagement {
    /// A shared handle to the grammar, for handing to a tokenizer.
    fn grammar(&self) -> GrammarPtr;

    /// Register a new multi-character token.
    fn define_token(&mut self, token: &str) -> error::Result<()>;
}

/// Trait for accessing the interpreter's numbered ports.
pub trait PortManagement {
    /// Get a port for reading.  Fails if the index is out of range or the port is output only.
    fn input_port(&mut self, index: usize) -> error::Result<&mut dyn Read>;

    /// Get a port for writing.  Fails if the index is out of range or the port is input only.
    fn output_port(&mut self, index: usize) -> error::Result<&mut dyn Write>;

    /// Flush every writable port.
    fn flush(&mut self) -> error::Result<()>;
}

/// Trait for evaluating terms and processing source code.
pub trait CodeManagement {
    /// Evaluate a single term against the interpreter.
    fn evaluate(&mut self, term: &Term) -> error::Result<()>;

    /// Read, parse and evaluate terms from a byte stream until it is exhausted.  The path is only
    /// used when reporting error locations.
    fn process_stream(&mut self, path: &str, stream: &mut dyn Read) -> error::Result<()>;

    /// Process source code held in memory.
    fn process_source(&mut self, path: &str, source: &str) -> error::Result<()> {
        let mut bytes = source.as_bytes();
        self.process_stream(path, &mut bytes)
    }

    /// Open and process a source file.
    fn process_source_file(&mut self, path: &str) -> error::Result<()>;
}

/// The full interpreter interface made available to the builtins.
pub trait Interpreter:
    InterpreterStack + WordManagement + TokenManagement + PortManagement + CodeManagement
{
}
