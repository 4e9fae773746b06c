use crate::runtime::{ data_structures::term::Term,
                     error::{ self,
                              script_error_str,
                              ErrorKind },
                     interpreter::{ Flow,
                                    Interpreter } };
use std::rc::Rc;



/// A quotation part way through being run.
struct Frame
{
    /// The children of the quotation.
    terms: Rc<[Term]>,

    /// Index of the next child to evaluate.
    next: usize
}


impl Frame
{
    fn new(terms: Rc<[Term]>) -> Frame
    {
        Frame { terms, next: 0 }
    }

    fn is_done(&self) -> bool
    {
        self.next >= self.terms.len()
    }

    fn advance(&mut self) -> Option<Term>
    {
        let term = self.terms.get(self.next).cloned();

        if term.is_some()
        {
            self.next += 1;
        }

        term
    }
}



/// Evaluate a term against the interpreter.
///
/// Scalars and literal sequences push themselves, symbols are resolved through the dictionary and
/// their bodies applied, builtins run.  Applying a quotation pushes a frame onto an explicit frame
/// stack instead of recursing, and finished frames are dropped before a new one is pushed.  So a
/// quotation that applies another as its last step runs in constant frame space.
pub fn evaluate(interpreter: &mut dyn Interpreter, term: &Term) -> error::Result<()>
{
    let mut frames: Vec<Frame> = Vec::new();
    let mut flow = step(interpreter, term)?;

    loop
    {
        if let Flow::Apply(body) = flow
        {
            apply(interpreter, &mut frames, body)?;
        }

        let Some(next) = next_term(&mut frames) else
            {
                return Ok(());
            };

        flow = step(interpreter, &next)?;
    }
}


/// Evaluate one term in place.
fn step(interpreter: &mut dyn Interpreter, term: &Term) -> error::Result<Flow>
{
    match term
    {
        Term::Builtin(builtin) => builtin.execute(interpreter),

        Term::Sequence(sequence) if sequence.is_symbol() =>
            {
                let Some(name) = sequence.text() else
                    {
                        return script_error_str(ErrorKind::Lookup,
                                                &format!("Use of undefined symbol {}.", term));
                    };

                Ok(Flow::Apply(interpreter.find_word(&name)?))
            },

        _ =>
            {
                interpreter.push(term.clone());
                Ok(Flow::Done)
            }
    }
}


/// Apply a term.  A scalar pushes itself, a builtin runs, a sequence has its children scheduled
/// for evaluation in order.
fn apply(interpreter: &mut dyn Interpreter,
         frames: &mut Vec<Frame>,
         body: Term) -> error::Result<()>
{
    let mut body = body;

    loop
    {
        match body
        {
            Term::Sequence(sequence) =>
                {
                    while frames.last().is_some_and(Frame::is_done)
                    {
                        let _ = frames.pop();
                    }

                    if !sequence.is_empty()
                    {
                        frames.push(Frame::new(sequence.shared()));
                    }

                    return Ok(());
                },

            Term::Scalar(_) =>
                {
                    interpreter.push(body);
                    return Ok(());
                },

            Term::Builtin(builtin) =>
                {
                    match builtin.execute(interpreter)?
                    {
                        Flow::Apply(next) => body = next,
                        Flow::Done => return Ok(())
                    }
                }
        }
    }
}


/// Get the next child term to evaluate, discarding finished frames.
fn next_term(frames: &mut Vec<Frame>) -> Option<Term>
{
    while let Some(frame) = frames.last_mut()
    {
        if let Some(term) = frame.advance()
        {
            return Some(term);
        }

        let _ = frames.pop();
    }

    None
}
