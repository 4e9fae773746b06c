use crate::runtime::error::{ self,
                             script_error_str,
                             ErrorKind };
use std::{ cell::RefCell,
           rc::Rc };



/// The grammar is shared between the context that owns it and the tokenizer that reads it while
/// scanning.
pub type GrammarPtr = Rc<RefCell<Grammar>>;



/// The custom multi-character tokens installed by `_token`, kept sorted.  Tokens are only ever
/// added.
#[derive(Default, Clone, Debug)]
pub struct Grammar
{
    tokens: Vec<String>
}


impl Grammar
{
    pub fn new() -> Grammar
    {
        Grammar { tokens: Vec::new() }
    }

    /// Create a new shared, empty grammar.
    pub fn new_ptr() -> GrammarPtr
    {
        Rc::new(RefCell::new(Grammar::new()))
    }

    /// Register a new token.  Duplicate and empty tokens are rejected.
    pub fn define(&mut self, token: &str) -> error::Result<()>
    {
        if token.is_empty()
        {
            return script_error_str(ErrorKind::Syntax, "Invalid token definition.");
        }

        match self.tokens.binary_search_by(|existing| existing.as_str().cmp(token))
        {
            Ok(_) => script_error_str(ErrorKind::Definition,
                                      &format!("Redefinition of token \"{}\".", token)),

            Err(index) =>
                {
                    self.tokens.insert(index, token.to_string());
                    Ok(())
                }
        }
    }

    pub fn contains(&self, token: &str) -> bool
    {
        self.tokens.binary_search_by(|existing| existing.as_str().cmp(token)).is_ok()
    }

    /// The registered tokens in sorted order.
    pub fn tokens(&self) -> &[String]
    {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool
    {
        self.tokens.is_empty()
    }

    /// Find the longest registered token that is a prefix of the text.  Returns its length in
    /// scalars.
    pub fn longest_prefix(&self, text: &[char]) -> Option<usize>
    {
        self.tokens
            .iter()
            .filter_map(|token|
                {
                    let mut length = 0;

                    for expected in token.chars()
                    {
                        if text.get(length) != Some(&expected)
                        {
                            return None;
                        }

                        length += 1;
                    }

                    Some(length)
                })
            .max()
    }
}
