use crate::runtime::error::{ self,
                             script_error_str,
                             ErrorKind };
use std::io::{ self,
               Read,
               Write };



/// A byte stream that can be both read and written.
pub trait Stream: Read + Write
{
    fn as_reader(&mut self) -> &mut dyn Read;
    fn as_writer(&mut self) -> &mut dyn Write;
}

impl<T: Read + Write> Stream for T
{
    fn as_reader(&mut self) -> &mut dyn Read
    {
        self
    }

    fn as_writer(&mut self) -> &mut dyn Write
    {
        self
    }
}



/// A directionally typed byte stream handle.
pub enum Port
{
    /// Can only be read from.
    Input(Box<dyn Read>),

    /// Can only be written to.
    Output(Box<dyn Write>),

    /// Supports both reading and writing.
    Bidirectional(Box<dyn Stream>)
}


/// The fixed table of ports a context can address by index.
pub struct PortTable
{
    ports: Vec<Port>
}


impl Default for PortTable
{
    fn default() -> Self
    {
        Self::standard()
    }
}


impl PortTable
{
    /// Standard input, output and error bound to ports 0, 1 and 2.
    pub fn standard() -> PortTable
    {
        PortTable::new(vec![ Port::Input(Box::new(io::stdin())),
                             Port::Output(Box::new(io::stdout())),
                             Port::Output(Box::new(io::stderr())) ])
    }

    /// Build a table from an explicit list of ports.
    pub fn new(ports: Vec<Port>) -> PortTable
    {
        PortTable { ports }
    }

    pub fn len(&self) -> usize
    {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.ports.is_empty()
    }

    /// Get the port at an index for reading.
    pub fn input(&mut self, index: usize) -> error::Result<&mut dyn Read>
    {
        match self.ports.get_mut(index)
        {
            Some(Port::Input(stream)) => Ok(stream.as_mut()),
            Some(Port::Bidirectional(stream)) => Ok(stream.as_reader()),
            Some(Port::Output(_)) => script_error_str(ErrorKind::Range,
                                                      "Output port cannot be used for input."),
            None => script_error_str(ErrorKind::Range, "Invalid port number.")
        }
    }

    /// Get the port at an index for writing.
    pub fn output(&mut self, index: usize) -> error::Result<&mut dyn Write>
    {
        match self.ports.get_mut(index)
        {
            Some(Port::Output(stream)) => Ok(stream.as_mut()),
            Some(Port::Bidirectional(stream)) => Ok(stream.as_writer()),
            Some(Port::Input(_)) => script_error_str(ErrorKind::Range,
                                                     "Input port cannot be used for output."),
            None => script_error_str(ErrorKind::Range, "Invalid port number.")
        }
    }

    /// Flush every writable port.
    pub fn flush(&mut self) -> error::Result<()>
    {
        for port in self.ports.iter_mut()
        {
            match port
            {
                Port::Output(stream) => stream.flush()?,
                Port::Bidirectional(stream) => stream.flush()?,
                Port::Input(_) => ()
            }
        }

        Ok(())
    }
}
