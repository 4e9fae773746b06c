use crate::runtime::{
    error,
    interpreter::{Flow, Interpreter},
};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Words that manipulate the operand stack.
mod stack_words;

/// Words that run quotations.
mod control_words;

/// Words that implement the term algebra, arithmetic and comparisons.
pub mod math_logic_words;

/// Words that write to ports.
mod io_words;

/// Words that create new dictionary entries.
mod word_creation_words;

/// The fixed set of primitive operations.  Terms refer to these directly, so dispatch is a single
/// exhaustive match rather than a dictionary lookup.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Builtin {
    Def,
    Dup,
    Pop,
    Swap,
    Quote,
    Apply,
    Compose,
    Write,
    Putc,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    Cond,
}

/// Every builtin alongside its reserved name.
const BUILTIN_NAMES: [(&str, Builtin); 21] = [
    ("_def", Builtin::Def),
    ("dup", Builtin::Dup),
    ("pop", Builtin::Pop),
    ("swap", Builtin::Swap),
    ("quote", Builtin::Quote),
    ("apply", Builtin::Apply),
    ("compose", Builtin::Compose),
    ("write", Builtin::Write),
    ("putc", Builtin::Putc),
    ("+", Builtin::Add),
    ("-", Builtin::Sub),
    ("*", Builtin::Mul),
    ("/", Builtin::Div),
    ("%", Builtin::Mod),
    ("lt?", Builtin::Lt),
    ("gt?", Builtin::Gt),
    ("le?", Builtin::Le),
    ("ge?", Builtin::Ge),
    ("eq?", Builtin::Eq),
    ("ne?", Builtin::Ne),
    ("cond", Builtin::Cond),
];

lazy_static! {
    // Name to opcode table used by the parser.
    static ref BUILTINS: HashMap<&'static str, Builtin> = BUILTIN_NAMES.iter().copied().collect();
}

impl Builtin {
    /// Find the builtin reserved under a word's text.
    pub fn from_name(name: &str) -> Option<Builtin> {
        BUILTINS.get(name).copied()
    }

    /// The reserved name of the builtin.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Def => "_def",
            Builtin::Dup => "dup",
            Builtin::Pop => "pop",
            Builtin::Swap => "swap",
            Builtin::Quote => "quote",
            Builtin::Apply => "apply",
            Builtin::Compose => "compose",
            Builtin::Write => "write",
            Builtin::Putc => "putc",
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Mod => "%",
            Builtin::Lt => "lt?",
            Builtin::Gt => "gt?",
            Builtin::Le => "le?",
            Builtin::Ge => "ge?",
            Builtin::Eq => "eq?",
            Builtin::Ne => "ne?",
            Builtin::Cond => "cond",
        }
    }

    /// Run the builtin against the interpreter.  Builtins that run other code hand the term back
    /// as a `Flow::Apply` so the evaluator can schedule it without growing the native stack.
    pub fn execute(self, interpreter: &mut dyn Interpreter) -> error::Result<Flow> {
        match self {
            Builtin::Def => word_creation_words::word_def(interpreter),
            Builtin::Dup => stack_words::word_dup(interpreter),
            Builtin::Pop => stack_words::word_pop(interpreter),
            Builtin::Swap => stack_words::word_swap(interpreter),
            Builtin::Quote => stack_words::word_quote(interpreter),
            Builtin::Apply => control_words::word_apply(interpreter),
            Builtin::Cond => control_words::word_cond(interpreter),
            Builtin::Compose => math_logic_words::word_compose(interpreter),
            Builtin::Write => io_words::word_write(interpreter),
            Builtin::Putc => io_words::word_putc(interpreter),

            Builtin::Add => math_logic_words::word_binary(interpreter, |a, b| {
                Ok(math_logic_words::add(a, b))
            }),
            Builtin::Sub => math_logic_words::word_binary(interpreter, math_logic_words::subtract),
            Builtin::Mul => math_logic_words::word_binary(interpreter, math_logic_words::multiply),
            Builtin::Div => math_logic_words::word_binary(interpreter, math_logic_words::divide),
            Builtin::Mod => math_logic_words::word_binary(interpreter, math_logic_words::remainder),

            Builtin::Lt => math_logic_words::word_compare(interpreter, |a, b| a < b),
            Builtin::Gt => math_logic_words::word_compare(interpreter, |a, b| b < a),
            Builtin::Le => math_logic_words::word_compare(interpreter, |a, b| !(b < a)),
            Builtin::Ge => math_logic_words::word_compare(interpreter, |a, b| !(a < b)),
            Builtin::Eq => math_logic_words::word_compare(interpreter, |a, b| a == b),
            Builtin::Ne => math_logic_words::word_compare(interpreter, |a, b| a != b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_the_table() {
        for (name, builtin) in BUILTIN_NAMES {
            assert_eq!(Builtin::from_name(name), Some(builtin));
            assert_eq!(builtin.name(), name);
        }
    }

    #[test]
    fn ordinary_words_are_not_builtins() {
        assert_eq!(Builtin::from_name("def"), None);
        assert_eq!(Builtin::from_name("lt"), None);
        assert_eq!(Builtin::from_name("_token"), None);
    }
}
