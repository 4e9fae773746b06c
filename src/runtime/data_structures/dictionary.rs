use crate::runtime::{ data_structures::term::Term,
                     error::{ self,
                              script_error_str,
                              ErrorKind } };
use std::collections::HashMap;



/// The word dictionary used by the interpreter.  Words are bound once and never rebound or
/// forgotten.
pub struct Dictionary
{
    words: HashMap<String, Term>
}


impl Default for Dictionary
{
    fn default() -> Self
    {
        Self::new()
    }
}


impl Dictionary
{
    /// Create a dictionary seeded with the standard constants.
    pub fn new() -> Dictionary
    {
        let mut words = HashMap::new();

        words.insert("false".to_string(),  Term::Scalar(0));
        words.insert("true".to_string(),   Term::Scalar(1));
        words.insert("stdin".to_string(),  Term::Scalar(0));
        words.insert("stdout".to_string(), Term::Scalar(1));
        words.insert("stderr".to_string(), Term::Scalar(2));

        Dictionary { words }
    }

    /// Bind a name to a body.  Binding an existing name is an error.
    pub fn define(&mut self, name: String, body: Term) -> error::Result<()>
    {
        if self.words.contains_key(&name)
        {
            return script_error_str(ErrorKind::Definition,
                                    &format!("Redefinition of symbol \"{}\".", name));
        }

        let _ = self.words.insert(name, body);
        Ok(())
    }

    /// Find the body bound to a name.
    pub fn find(&self, name: &str) -> Option<&Term>
    {
        self.words.get(name)
    }

    /// Find the body bound to a name, or report an undefined symbol.
    pub fn lookup(&self, name: &str) -> error::Result<&Term>
    {
        match self.words.get(name)
        {
            Some(body) => Ok(body),
            None => script_error_str(ErrorKind::Lookup,
                                     &format!("Use of undefined symbol \"{}\".", name))
        }
    }

    pub fn len(&self) -> usize
    {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.words.is_empty()
    }
}
