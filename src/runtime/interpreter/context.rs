use crate::{ lang::{ lookahead::Lookahead,
                     parsing::TermReader,
                     tokenizing::Tokenizer },
             runtime::{ data_structures::{ dictionary::Dictionary,
                                           grammar::{ Grammar,
                                                      GrammarPtr },
                                           port::PortTable,
                                           term::Term },
                        error::{ self,
                                 ErrorKind,
                                 ScriptError },
                        interpreter::{ evaluation,
                                       CodeManagement,
                                       Interpreter,
                                       InterpreterStack,
                                       PortManagement,
                                       TermStack,
                                       TokenManagement,
                                       WordManagement } } };
use std::{ fs::File,
           io::Read };



/// The single mutable execution environment of a run.  It owns the operand stack, the write-once
/// word dictionary, the custom token grammar and the port table.
pub struct Context
{
    /// The operand stack.
    stack: TermStack,

    /// The words known to the interpreter.
    dictionary: Dictionary,

    /// The custom tokens, shared with any tokenizer reading source for this context.
    grammar: GrammarPtr,

    /// The byte streams scripts can address by index.
    ports: PortTable
}


impl Default for Context
{
    fn default() -> Self
    {
        Self::new()
    }
}


impl Context
{
    /// Create a new context bound to the process's standard streams.
    pub fn new() -> Context
    {
        Context::with_ports(PortTable::standard())
    }

    /// Create a new context with a custom port table.
    pub fn with_ports(ports: PortTable) -> Context
    {
        Context
            {
                stack: TermStack::new(),
                dictionary: Dictionary::new(),
                grammar: Grammar::new_ptr(),
                ports
            }
    }

    /// Pull terms from the reader and evaluate them until it runs dry.  Evaluation errors are
    /// tagged with the location of the term that raised them.
    fn run<R: Read>(&mut self, terms: &mut Lookahead<TermReader<R>>) -> error::Result<()>
    {
        while let Some(term) = terms.pop()?
        {
            if let Err(error) = self.evaluate(&term)
            {
                return Err(error.or_location(terms.source().location()));
            }
        }

        Ok(())
    }
}


impl Interpreter for Context {}


impl InterpreterStack for Context
{
    fn stack(&self) -> &TermStack
    {
        &self.stack
    }

    fn push(&mut self, term: Term)
    {
        self.stack.push(term);
    }

    fn pop(&mut self) -> Term
    {
        self.stack.pop().unwrap_or_default()
    }

    fn top(&self) -> Term
    {
        self.stack.last().cloned().unwrap_or_default()
    }
}


impl WordManagement for Context
{
    fn dictionary(&self) -> &Dictionary
    {
        &self.dictionary
    }

    fn define_word(&mut self, name: String, body: Term) -> error::Result<()>
    {
        self.dictionary.define(name, body)
    }

    fn find_word(&self, name: &str) -> error::Result<Term>
    {
        self.dictionary.lookup(name).cloned()
    }
}


impl TokenManagement for Context
{
    fn grammar(&self) -> GrammarPtr
    {
        self.grammar.clone()
    }

    fn define_token(&mut self, token: &str) -> error::Result<()>
    {
        self.grammar.borrow_mut().define(token)
    }
}


impl PortManagement for Context
{
    fn input_port(&mut self, index: usize) -> error::Result<&mut dyn Read>
    {
        self.ports.input(index)
    }

    fn output_port(&mut self, index: usize) -> error::Result<&mut dyn std::io::Write>
    {
        self.ports.output(index)
    }

    fn flush(&mut self) -> error::Result<()>
    {
        self.ports.flush()
    }
}


impl CodeManagement for Context
{
    fn evaluate(&mut self, term: &Term) -> error::Result<()>
    {
        evaluation::evaluate(self, term)
    }

    fn process_stream(&mut self, path: &str, stream: &mut dyn Read) -> error::Result<()>
    {
        log::debug!("Processing {}.", path);

        let tokenizer = Tokenizer::new(path, stream, self.grammar());
        let mut terms = Lookahead::new(TermReader::new(tokenizer));

        let result = self.run(&mut terms);
        let flushed = self.flush();

        log::debug!("Finished processing {}, {} terms left on the stack.", path, self.stack.len());

        result?;
        flushed
    }

    fn process_source_file(&mut self, path: &str) -> error::Result<()>
    {
        let mut file = File::open(path).map_err(|error|
            {
                ScriptError::new(ErrorKind::Io,
                                 None,
                                 format!("Could not open source file {}: {}.", path, error))
            })?;

        self.process_stream(path, &mut file)
    }
}
