use crate::{
    lang::{
        lookahead::{Lookahead, Source},
        source_buffer::SourceLocation,
        tokenizing::{Token, Tokenizer},
    },
    runtime::{
        built_ins::Builtin,
        data_structures::term::Term,
        error::{self, ErrorKind, script_error},
    },
};
use std::{collections::VecDeque, io::Read};

/// Builds terms from a token stream, one top level term per read.  Nested sequences are gathered
/// on an explicit stack so nesting depth is only limited by memory.
pub struct TermReader<R: Read> {
    /// The token stream being parsed.
    tokens: Lookahead<Tokenizer<R>>,

    /// Where the most recently produced term started.
    location: Option<SourceLocation>,
}

impl<R: Read> TermReader<R> {
    pub fn new(tokenizer: Tokenizer<R>) -> Self {
        TermReader {
            tokens: Lookahead::new(tokenizer),
            location: None,
        }
    }

    /// The location of the most recently produced term, if any.
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }
}

impl<R: Read> Source for TermReader<R> {
    type Item = Term;

    fn read(&mut self, buffer: &mut VecDeque<Term>) -> error::Result<bool> {
        // Each open sequence with the location of its opening parenthesis.
        let mut open: Vec<(SourceLocation, Vec<Term>)> = Vec::new();

        loop {
            let Some(token) = self.tokens.pop()? else {
                return match open.last() {
                    Some((location, _)) => script_error(
                        ErrorKind::Syntax,
                        location,
                        "Expected ) before EOF.".to_string(),
                    ),

                    None => Ok(false),
                };
            };

            if open.is_empty() {
                self.location = Some(token.location().clone());
            }

            let term = match token {
                Token::OpenParen(location) => {
                    open.push((location, Vec::new()));
                    continue;
                }

                Token::CloseParen(_) => match open.pop() {
                    Some((_, terms)) => Term::from(terms),
                    None => Term::symbol(")"),
                },

                leaf => term_from_token(&leaf),
            };

            match open.last_mut() {
                Some((_, terms)) => terms.push(term),

                None => {
                    buffer.push_back(term);
                    return Ok(true);
                }
            }
        }
    }
}

/// Build a leaf term from a single token.  Builtin names take priority, then integers, then string
/// literals, anything else is a symbol to be looked up when evaluated.
fn term_from_token(token: &Token) -> Term {
    match token {
        Token::String(_, text) => Term::string(text),
        Token::Word(_, text) => term_from_word(text),
        Token::OpenParen(_) => Term::symbol("("),
        Token::CloseParen(_) => Term::symbol(")"),
    }
}

fn term_from_word(text: &str) -> Term {
    if let Some(builtin) = Builtin::from_name(text) {
        return Term::Builtin(builtin);
    }

    let numeric = text
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_digit() || first == '+' || first == '-');

    if numeric {
        if let Ok(value) = text.parse::<i32>() {
            return Term::Scalar(value);
        }
    }

    // Splitting a word against the custom tokens can leave a piece that opens with a quote.
    if let Some(rest) = text.strip_prefix('"') {
        return Term::string(rest);
    }

    Term::symbol(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::data_structures::grammar::Grammar;

    fn parse(source: &str) -> error::Result<Vec<Term>> {
        let tokenizer = Tokenizer::new("test", source.as_bytes(), Grammar::new_ptr());
        let mut terms = Lookahead::new(TermReader::new(tokenizer));
        let mut found = Vec::new();

        while let Some(term) = terms.pop()? {
            found.push(term);
        }

        Ok(found)
    }

    #[test]
    fn sequences_nest() {
        let terms = parse("( 1 2 3 ) ( ( ) x )").unwrap();

        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].to_string(), "( 1 2 3 )");
        assert_eq!(
            terms[0],
            Term::from(vec![Term::Scalar(1), Term::Scalar(2), Term::Scalar(3)])
        );
        assert_eq!(terms[1].to_string(), "( ( ) x )");
    }

    #[test]
    fn unclosed_sequence_fails() {
        let error = parse("( 1 ( 2 )").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.error(), "Expected ) before EOF.");
        assert_eq!(error.location().as_ref().map(|l| l.column()), Some(1));
    }

    #[test]
    fn nesting_is_gathered_on_a_stack() {
        let depth = 300_000;
        let source = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
        let terms = parse(&source).unwrap();

        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn leaves() {
        let terms = parse("dup -12 +7 1abc \"hi\" foo + - 2147483648").unwrap();

        assert!(matches!(terms[0], Term::Builtin(Builtin::Dup)));
        assert_eq!(terms[1], Term::Scalar(-12));
        assert_eq!(terms[2], Term::Scalar(7));
        assert!(terms[3].as_sequence().is_some_and(|s| s.is_symbol()));
        assert!(terms[4].as_sequence().is_some_and(|s| !s.is_symbol()));
        assert_eq!(terms[4], Term::string("hi"));
        assert!(terms[5].as_sequence().is_some_and(|s| s.is_symbol()));
        assert!(matches!(terms[6], Term::Builtin(Builtin::Add)));
        assert!(matches!(terms[7], Term::Builtin(Builtin::Sub)));
        assert!(terms[8].as_sequence().is_some_and(|s| s.is_symbol()));
    }

    #[test]
    fn quoted_word_pieces_are_strings() {
        assert_eq!(term_from_word("\"bc"), Term::string("bc"));
        assert!(term_from_word("\"bc").as_sequence().is_some_and(|s| !s.is_symbol()));
        assert_eq!(term_from_word("\""), Term::empty());
        assert!(term_from_word("b\"c").as_sequence().is_some_and(|s| s.is_symbol()));
    }

    #[test]
    fn stray_close_paren_is_a_symbol() {
        let terms = parse(")").unwrap();

        assert_eq!(terms, vec![Term::symbol(")")]);
    }
}
