use crate::runtime::built_ins::Builtin;
use std::{ cmp::Ordering,
           fmt::{ self,
                  Debug,
                  Display,
                  Formatter },
           mem,
           rc::Rc };



/// How a sequence is treated when it is evaluated.  A literal pushes itself, a symbol is looked up
/// in the dictionary.  Both are lists of codepoint scalars when they come from text, and they
/// compare equal when their contents are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SequenceKind
{
    /// A quotation, an array, or a string literal.
    Literal,

    /// A bare word from the source that names a dictionary entry.
    Symbol
}



/// An immutable, shared list of terms.  Cloning a sequence only bumps a reference count, the
/// algebra always builds new sequences rather than changing existing ones.
#[derive(Clone)]
pub struct Sequence
{
    terms: Rc<[Term]>,
    kind: SequenceKind
}


impl Sequence
{
    /// Build a literal sequence.
    pub fn literal(terms: Vec<Term>) -> Sequence
    {
        Sequence { terms: Rc::from(terms), kind: SequenceKind::Literal }
    }

    /// Build a symbol from a word's text.
    pub fn symbol(name: &str) -> Sequence
    {
        Sequence { terms: codepoints(name), kind: SequenceKind::Symbol }
    }

    /// The child terms in order.
    pub fn terms(&self) -> &[Term]
    {
        &self.terms
    }

    /// A shared handle to the child terms.
    pub fn shared(&self) -> Rc<[Term]>
    {
        self.terms.clone()
    }

    pub fn is_symbol(&self) -> bool
    {
        self.kind == SequenceKind::Symbol
    }

    pub fn is_empty(&self) -> bool
    {
        self.terms.is_empty()
    }

    /// Assemble the text the sequence spells out.  Returns None if any child is not a scalar
    /// holding a valid Unicode scalar value.
    pub fn text(&self) -> Option<String>
    {
        self.terms
            .iter()
            .map(|term| match term
                {
                    Term::Scalar(value) => u32::try_from(*value).ok().and_then(char::from_u32),
                    _ => None
                })
            .collect()
    }
}


/// Children are released on a local work list rather than recursively, so dropping a deeply
/// nested sequence can't exhaust the call stack.
impl Drop for Sequence
{
    fn drop(&mut self)
    {
        let mut pending = Vec::new();

        take_nested(&mut self.terms, &mut pending);

        while let Some(mut term) = pending.pop()
        {
            if let Term::Sequence(sequence) = &mut term
            {
                take_nested(&mut sequence.terms, &mut pending);
            }
        }
    }
}


/// Move the nested sequences out of terms nobody else shares.  What is left behind holds no
/// sequences, so dropping it doesn't recurse.
fn take_nested(terms: &mut Rc<[Term]>, pending: &mut Vec<Term>)
{
    let Some(children) = Rc::get_mut(terms) else
        {
            return;
        };

    for child in children.iter_mut()
    {
        if matches!(child, Term::Sequence(_))
        {
            pending.push(mem::replace(child, Term::Scalar(0)));
        }
    }
}


fn codepoints(text: &str) -> Rc<[Term]>
{
    text.chars().map(|c| Term::Scalar(c as i32)).collect()
}



/// The single value and code representation of the language.  A term's variant never changes
/// after construction.
#[derive(Clone)]
pub enum Term
{
    /// A signed 32-bit integer.
    Scalar(i32),

    /// An ordered list of terms, used for quotations, strings and symbol names alike.
    Sequence(Sequence),

    /// One of the primitive operations.
    Builtin(Builtin)
}


impl Default for Term
{
    fn default() -> Term
    {
        Term::empty()
    }
}


impl From<i32> for Term
{
    fn from(value: i32) -> Term
    {
        Term::Scalar(value)
    }
}


impl From<bool> for Term
{
    fn from(value: bool) -> Term
    {
        Term::Scalar(value as i32)
    }
}


impl From<Builtin> for Term
{
    fn from(builtin: Builtin) -> Term
    {
        Term::Builtin(builtin)
    }
}


impl From<Vec<Term>> for Term
{
    fn from(terms: Vec<Term>) -> Term
    {
        Term::Sequence(Sequence::literal(terms))
    }
}


impl Term
{
    /// The empty literal sequence.  Also what popping an empty stack produces.
    pub fn empty() -> Term
    {
        Term::Sequence(Sequence::literal(Vec::new()))
    }

    /// A string literal, one scalar per codepoint.
    pub fn string(text: &str) -> Term
    {
        Term::Sequence(Sequence { terms: codepoints(text), kind: SequenceKind::Literal })
    }

    /// A bare symbol to be resolved in the dictionary at evaluation time.
    pub fn symbol(name: &str) -> Term
    {
        Term::Sequence(Sequence::symbol(name))
    }

    pub fn as_sequence(&self) -> Option<&Sequence>
    {
        match self
        {
            Term::Sequence(sequence) => Some(sequence),
            _ => None
        }
    }

    /// Used to order the variants against each other.
    fn rank(&self) -> u8
    {
        match self
        {
            Term::Scalar(_)   => 0,
            Term::Builtin(_)  => 1,
            Term::Sequence(_) => 2
        }
    }
}


/// Scalars order numerically and always sort before everything else.  Sequences compare element
/// by element, a strict prefix sorting first.  The literal/symbol distinction is ignored.  Nested
/// sequences are walked with an explicit stack.
impl Ord for Term
{
    fn cmp(&self, other: &Term) -> Ordering
    {
        let mut pending: Vec<( &[Term], &[Term] )> = Vec::new();
        let mut current = ( std::slice::from_ref(self), std::slice::from_ref(other) );

        loop
        {
            match ( current.0.split_first(), current.1.split_first() )
            {
                ( None, None ) =>
                    {
                        match pending.pop()
                        {
                            Some(next) => current = next,
                            None => return Ordering::Equal
                        }
                    },

                ( None, Some(_) ) => return Ordering::Less,
                ( Some(_), None ) => return Ordering::Greater,

                ( Some(( Term::Sequence(a), rest_a )), Some(( Term::Sequence(b), rest_b )) ) =>
                    {
                        pending.push(( rest_a, rest_b ));
                        current = ( a.terms(), b.terms() );
                    },

                ( Some(( a, rest_a )), Some(( b, rest_b )) ) =>
                    {
                        let order = match ( a, b )
                            {
                                ( Term::Scalar(a),  Term::Scalar(b)  ) => a.cmp(b),
                                ( Term::Builtin(a), Term::Builtin(b) ) => a.cmp(b),
                                _                                      => a.rank().cmp(&b.rank())
                            };

                        if order != Ordering::Equal
                        {
                            return order;
                        }

                        current = ( rest_a, rest_b );
                    }
            }
        }
    }
}


impl PartialOrd for Term
{
    fn partial_cmp(&self, other: &Term) -> Option<Ordering>
    {
        Some(self.cmp(other))
    }
}


/// Structural equality.  A scalar never equals a sequence.
impl PartialEq for Term
{
    fn eq(&self, other: &Term) -> bool
    {
        self.cmp(other) == Ordering::Equal
    }
}


impl Eq for Term {}


/// The textual form printed by `write`.  Nested sequences are walked with an explicit stack.
impl Display for Term
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        let mut pending: Vec<&[Term]> = Vec::new();
        let mut current = std::slice::from_ref(self);

        loop
        {
            let Some(( term, rest )) = current.split_first() else
                {
                    let Some(parent) = pending.pop() else
                        {
                            return Ok(());
                        };

                    write!(f, ")")?;
                    separate(f, &pending)?;

                    current = parent;
                    continue;
                };

            current = rest;

            match term
            {
                Term::Scalar(value) => write!(f, "{}", value)?,
                Term::Builtin(builtin) => write!(f, "{}", builtin.name())?,

                Term::Sequence(sequence) =>
                    {
                        match sequence.is_symbol().then(|| sequence.text()).flatten()
                        {
                            Some(name) => write!(f, "{}", name)?,

                            None =>
                                {
                                    write!(f, "( ")?;

                                    pending.push(current);
                                    current = sequence.terms();
                                    continue;
                                }
                        }
                    }
            }

            separate(f, &pending)?;
        }
    }
}


/// Terms inside a sequence are each followed by a space.
fn separate(f: &mut Formatter, pending: &[&[Term]]) -> fmt::Result
{
    if pending.is_empty()
    {
        return Ok(());
    }

    write!(f, " ")
}


impl Debug for Term
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "{}", self)
    }
}
