use crate::{
    lang::{
        lookahead::{Lookahead, Source},
        source_buffer::{Position, SourceBuffer, SourceLocation},
    },
    runtime::{
        data_structures::grammar::GrammarPtr,
        error::{self, ErrorKind, script_error},
    },
};
use std::{
    collections::VecDeque,
    fmt::{self, Debug, Display, Formatter},
    io::Read,
};

/// The word that turns the string before it into a new grammar token.
const TOKEN_DIRECTIVE: &str = "_token";

/// A token is a simple unit of the language.  Parenthesis delimit sequences, strings are quoted
/// literals and everything else is a word.
///
/// The token also holds the location in the original source code where it was found.
#[derive(Clone, PartialEq, Eq)]
pub enum Token {
    /// Opens a nested sequence.
    OpenParen(SourceLocation),

    /// Closes the innermost open sequence.
    CloseParen(SourceLocation),

    /// A quoted string literal, held without its quotes.
    String(SourceLocation, String),

    /// A bare word, a number, or a custom grammar token.
    Word(SourceLocation, String),
}

/// Make sure that the tokens are nicely printable for debugging purposes.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Token::OpenParen(_) => write!(f, "("),
            Token::CloseParen(_) => write!(f, ")"),
            Token::String(_, text) => write!(f, "\"{}\"", text),
            Token::Word(_, text) => write!(f, "{}", text),
        }
    }
}

/// Include the location when debugging.
impl Debug for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self)
    }
}

impl Token {
    /// Get the token's location in the original source text.
    pub fn location(&self) -> &SourceLocation {
        match self {
            Token::OpenParen(location) => location,
            Token::CloseParen(location) => location,
            Token::String(location, _) => location,
            Token::Word(location, _) => location,
        }
    }

    /// Check if the token is a string literal.
    pub fn is_string(&self) -> bool {
        matches!(self, Token::String(_, _))
    }
}

/// A raw unit of source text, before words are split against the grammar.
enum Lexeme {
    Token(Token),
    Word(Position, String),
    Directive(SourceLocation),
}

/// Turns decoded characters into tokens.  Words are split using the custom tokens registered in
/// the shared grammar at the moment they are scanned, and the `_token` directive adds to that
/// grammar as the source is read.
pub struct Tokenizer<R: Read> {
    /// The decoded source characters.
    characters: Lookahead<SourceBuffer<R>>,

    /// The custom tokens, shared with the interpreter context.
    grammar: GrammarPtr,

    /// Set once any leading byte order mark has been dealt with.
    started: bool,

    /// A string token held back until we know whether a `_token` directive consumes it.
    pending: Option<Token>,

    /// Was the last token handed out something other than a string?
    after_unquoted: bool,
}

impl<R: Read> Tokenizer<R> {
    /// Create a tokenizer over a byte stream.  The path is only used for error locations.
    pub fn new(path: &str, reader: R, grammar: GrammarPtr) -> Self {
        Tokenizer {
            characters: Lookahead::new(SourceBuffer::new(path, reader)),
            grammar,
            started: false,
            pending: None,
            after_unquoted: false,
        }
    }

    fn location_at(&self, position: Position) -> SourceLocation {
        SourceLocation::new_at(self.characters.source().path(), position)
    }

    fn peek(&mut self) -> error::Result<Option<char>> {
        Ok(self.characters.top()?.map(|character| character.value))
    }

    /// Scan the next raw lexeme, skipping whitespace and comments.
    fn scan(&mut self) -> error::Result<Option<Lexeme>> {
        if !self.started {
            self.started = true;

            if self.peek()? == Some('\u{feff}') {
                let _ = self.characters.pop()?;
            }
        }

        self.skip_whitespace_and_comments()?;

        let Some(first) = self.characters.pop()? else {
            return Ok(None);
        };

        let location = self.location_at(first.position);

        let lexeme = match first.value {
            '"' => Lexeme::Token(self.scan_string(location)?),
            '(' => Lexeme::Token(Token::OpenParen(location)),
            ')' => Lexeme::Token(Token::CloseParen(location)),

            value => {
                let mut text = String::from(value);

                while let Some(next) = self.peek()? {
                    if !is_word_character(next) {
                        break;
                    }

                    text.push(next);
                    let _ = self.characters.pop()?;
                }

                if text == TOKEN_DIRECTIVE {
                    Lexeme::Directive(location)
                } else {
                    Lexeme::Word(first.position, text)
                }
            }
        };

        Ok(Some(lexeme))
    }

    fn skip_whitespace_and_comments(&mut self) -> error::Result<()> {
        while let Some(next) = self.peek()? {
            if is_whitespace(next) {
                let _ = self.characters.pop()?;
                continue;
            }

            if next != '#' {
                break;
            }

            let Some(hash) = self.characters.pop()? else {
                break;
            };

            if self.peek()? == Some('(') {
                let _ = self.characters.pop()?;
                self.skip_block_comment(hash.position)?;
            } else {
                while let Some(character) = self.characters.pop()? {
                    if character.value == '\n' {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Skip a possibly nested block comment, the opening `#(` having already been read.
    fn skip_block_comment(&mut self, start: Position) -> error::Result<()> {
        let mut depth = 1usize;

        while let Some(character) = self.characters.pop()? {
            match (character.value, self.peek()?) {
                ('#', Some('(')) => {
                    let _ = self.characters.pop()?;
                    depth += 1;
                }

                (')', Some('#')) => {
                    let _ = self.characters.pop()?;
                    depth -= 1;

                    if depth == 0 {
                        return Ok(());
                    }
                }

                _ => (),
            }
        }

        script_error(
            ErrorKind::Syntax,
            &self.location_at(start),
            "Expected )# before EOF.".to_string(),
        )
    }

    /// Read a string literal, the opening quote having already been read.  Escapes are not
    /// supported, any backslash is an error.
    fn scan_string(&mut self, location: SourceLocation) -> error::Result<Token> {
        if self.peek()?.is_none() {
            return script_error(
                ErrorKind::Syntax,
                &location,
                "Expected closing quote before EOF.".to_string(),
            );
        }

        let mut text = String::new();

        loop {
            match self.characters.pop()?.map(|character| character.value) {
                Some('"') => return Ok(Token::String(location, text)),

                Some('\\') => {
                    return script_error(
                        ErrorKind::Syntax,
                        &location,
                        "Expected escape before EOF.".to_string(),
                    );
                }

                Some(value) => text.push(value),

                None => {
                    return script_error(
                        ErrorKind::Syntax,
                        &location,
                        "Expected character before EOF.".to_string(),
                    );
                }
            }
        }
    }

    /// Split a word on the custom grammar tokens, longest match first.  Text between matches is
    /// passed through as plain words.
    fn segment(&self, position: Position, text: String, buffer: &mut VecDeque<Token>) {
        let grammar = self.grammar.borrow();

        if grammar.is_empty() {
            buffer.push_back(Token::Word(self.location_at(position), text));
            return;
        }

        let characters: Vec<char> = text.chars().collect();
        let offset = |index: usize| Position {
            line: position.line,
            column: position.column + index,
        };

        let mut plain = String::new();
        let mut plain_start = 0;
        let mut index = 0;

        while index < characters.len() {
            match grammar.longest_prefix(&characters[index..]) {
                Some(length) => {
                    if !plain.is_empty() {
                        let location = self.location_at(offset(plain_start));
                        buffer.push_back(Token::Word(location, std::mem::take(&mut plain)));
                    }

                    let matched = characters[index..index + length].iter().collect();
                    buffer.push_back(Token::Word(self.location_at(offset(index)), matched));

                    index += length;
                }

                None => {
                    if plain.is_empty() {
                        plain_start = index;
                    }

                    plain.push(characters[index]);
                    index += 1;
                }
            }
        }

        if !plain.is_empty() {
            buffer.push_back(Token::Word(self.location_at(offset(plain_start)), plain));
        }
    }

    /// Register the held back string as a new grammar token.
    fn define_token(&mut self, location: &SourceLocation) -> error::Result<()> {
        match self.pending.take() {
            Some(Token::String(_, text)) => {
                self.grammar
                    .borrow_mut()
                    .define(&text)
                    .map_err(|error| error.or_location(Some(location)))?;

                log::debug!("{}: registered token {}.", location, text);
            }

            _ => {
                let message = if self.after_unquoted {
                    "Expected quoted token definition."
                } else {
                    "Expected token definition."
                };

                return script_error(ErrorKind::Syntax, location, message.to_string());
            }
        }

        self.after_unquoted = false;
        Ok(())
    }

    /// Hand any held back string on to the buffer.
    fn flush_pending(&mut self, buffer: &mut VecDeque<Token>) -> bool {
        match self.pending.take() {
            Some(token) => {
                buffer.push_back(token);
                true
            }

            None => false,
        }
    }
}

impl<R: Read> Source for Tokenizer<R> {
    type Item = Token;

    fn read(&mut self, buffer: &mut VecDeque<Token>) -> error::Result<bool> {
        loop {
            match self.scan()? {
                None => return Ok(self.flush_pending(buffer)),

                Some(Lexeme::Directive(location)) => self.define_token(&location)?,

                Some(Lexeme::Token(token)) if token.is_string() => {
                    let flushed = self.flush_pending(buffer);
                    self.pending = Some(token);

                    if flushed {
                        return Ok(true);
                    }
                }

                Some(Lexeme::Token(token)) => {
                    self.flush_pending(buffer);
                    self.after_unquoted = true;
                    buffer.push_back(token);

                    return Ok(true);
                }

                Some(Lexeme::Word(position, text)) => {
                    self.flush_pending(buffer);
                    self.after_unquoted = true;
                    self.segment(position, text, buffer);

                    return Ok(true);
                }
            }
        }
    }
}

/// The whitespace characters that separate tokens.
fn is_whitespace(value: char) -> bool {
    matches!(value, ' ' | '\t' | '\n' | '\u{0b}' | '\u{0c}' | '\r')
}

/// Anything that is not whitespace, a parenthesis or a comment marker can be part of a word.
fn is_word_character(value: char) -> bool {
    !is_whitespace(value) && !matches!(value, '(' | ')' | '#')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::data_structures::grammar::Grammar;

    fn tokenize_with(source: &str, grammar: &GrammarPtr) -> error::Result<Vec<Token>> {
        let mut tokens = Lookahead::new(Tokenizer::new("test", source.as_bytes(), grammar.clone()));
        let mut found = Vec::new();

        while let Some(token) = tokens.pop()? {
            found.push(token);
        }

        Ok(found)
    }

    fn tokenize(source: &str) -> error::Result<Vec<String>> {
        let found = tokenize_with(source, &Grammar::new_ptr())?;
        Ok(found.iter().map(|token| token.to_string()).collect())
    }

    #[test]
    fn basic_tokens() {
        assert_eq!(
            tokenize("( 1 2 )\"a b\"dup").unwrap(),
            vec!["(", "1", "2", ")", "\"a b\"", "dup"]
        );
        assert_eq!(tokenize("a(b)c").unwrap(), vec!["a", "(", "b", ")", "c"]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(tokenize("1 # two\n3").unwrap(), vec!["1", "3"]);
        assert_eq!(tokenize("1 #( a #( b )# c )# 2").unwrap(), vec!["1", "2"]);
        assert_eq!(tokenize("x#comment").unwrap(), vec!["x"]);
    }

    #[test]
    fn unterminated_block_comment_fails() {
        let error = tokenize("1 #( a #( b )# c").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.error(), "Expected )# before EOF.");
    }

    #[test]
    fn string_errors() {
        assert_eq!(
            tokenize("\"").unwrap_err().error(),
            "Expected closing quote before EOF."
        );
        assert_eq!(
            tokenize("\"abc").unwrap_err().error(),
            "Expected character before EOF."
        );
        assert_eq!(
            tokenize("\"a\\nb\"").unwrap_err().error(),
            "Expected escape before EOF."
        );
    }

    #[test]
    fn leading_byte_order_mark_is_skipped() {
        assert_eq!(tokenize("\u{feff}dup").unwrap(), vec!["dup"]);
    }

    #[test]
    fn custom_tokens_split_words() {
        let grammar = Grammar::new_ptr();
        let found = tokenize_with("\"->\" _token a->b", &grammar).unwrap();
        let text: Vec<String> = found.iter().map(|token| token.to_string()).collect();

        assert_eq!(text, vec!["a", "->", "b"]);
        assert!(grammar.borrow().contains("->"));

        assert_eq!(found[1].location().column(), 14);
        assert_eq!(found[2].location().column(), 16);
    }

    #[test]
    fn longest_custom_token_wins() {
        let grammar = Grammar::new_ptr();
        let found = tokenize_with("\"-\" _token \"->\" _token -->x", &grammar).unwrap();
        let text: Vec<String> = found.iter().map(|token| token.to_string()).collect();

        assert_eq!(text, vec!["-", "->", "x"]);
    }

    #[test]
    fn grammar_applies_from_the_directive_forward() {
        let text: Vec<String> = tokenize_with("a->b \"->\" _token a->b", &Grammar::new_ptr())
            .unwrap()
            .iter()
            .map(|token| token.to_string())
            .collect();

        assert_eq!(text, vec!["a->b", "a", "->", "b"]);
    }

    #[test]
    fn token_directive_errors() {
        let error = tokenize("\"->\" _token \"->\" _token").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Definition);

        let error = tokenize("_token").unwrap_err();
        assert_eq!(error.error(), "Expected token definition.");

        let error = tokenize("abc _token").unwrap_err();
        assert_eq!(error.error(), "Expected quoted token definition.");

        let error = tokenize("\"\" _token").unwrap_err();
        assert_eq!(error.error(), "Invalid token definition.");
    }

    #[test]
    fn strings_not_followed_by_the_directive_are_kept() {
        assert_eq!(
            tokenize("\"a\" \"b\" c").unwrap(),
            vec!["\"a\"", "\"b\"", "c"]
        );
        assert_eq!(tokenize("\"a\"").unwrap(), vec!["\"a\""]);
    }
}
