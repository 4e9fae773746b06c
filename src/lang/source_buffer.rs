use crate::{ lang::lookahead::Source,
             runtime::error::{ self,
                               script_error,
                               ErrorKind } };
use std::{ collections::VecDeque,
           fmt::{ self,
                  Display,
                  Formatter },
           io::{ BufReader,
                 Bytes,
                 Read },
           rc::Rc };



/// The location in the source code where a token was found.  This structure is used all over the
/// interpreter to keep track of where important things are found in the source code, mostly for
/// error reporting.
///
/// This is a read-only structure.  Use the field accessor methods to get the values.
#[derive(Clone, PartialEq, PartialOrd, Eq, Hash, Debug)]
pub struct SourceLocation
{
    /// Either the path to the file or a description of the source code.  The path is shared
    /// between every location of the same source.
    path: Rc<str>,

    /// The 1 based line number in the source code where the token was found.
    line: usize,

    /// The 1 based column number in the source code where the token was found.
    column: usize
}


impl Default for SourceLocation
{
    fn default() -> Self
    {
        Self::new()
    }
}


/// Used for error reporting to show where in the source code an error originated.
impl Display for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), fmt::Error>
    {
        write!(formatter, "{} ({}, {})", self.path, self.line, self.column)
    }
}


impl SourceLocation
{
    /// Crate a new SourceLocation with default values.
    pub fn new() -> SourceLocation
    {
        SourceLocation { path: Rc::from("unspecified"), line: 1, column: 1 }
    }

    /// Create a new SourceLocation with all of the needed information.
    pub fn new_from_info(path: &str, line: usize, column: usize) -> Self
    {
        SourceLocation { path: Rc::from(path), line, column }
    }

    /// Create a location that shares an already allocated path.
    pub fn new_at(path: &Rc<str>, position: Position) -> Self
    {
        SourceLocation { path: path.clone(), line: position.line, column: position.column }
    }

    /// The path to the source code or a meaningful description of the source code.
    pub fn path(&self) -> &str
    {
        &self.path
    }

    /// The 1 based line number in the source code.
    pub fn line(&self) -> usize
    {
        self.line
    }

    /// The 1 based column number in the source code.
    pub fn column(&self) -> usize
    {
        self.column
    }
}



/// A line and column pair within a single source.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position
{
    pub line: usize,
    pub column: usize
}


impl Default for Position
{
    fn default() -> Self
    {
        Position { line: 1, column: 1 }
    }
}


impl Position
{
    /// Advance past the given character.  New lines reset the column to 1.
    fn advance(&mut self, next: char)
    {
        if next == '\n'
        {
            self.line += 1;
            self.column = 1;
        }
        else
        {
            self.column += 1;
        }
    }
}



/// A single decoded Unicode scalar along with where it was found.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Character
{
    pub value: char,
    pub position: Position
}



/// Decodes a raw byte stream into Unicode scalars, one scalar per read.  As characters are decoded
/// the location of the cursor in the source is maintained so that the tokenizer can report where
/// each token starts.
///
/// Wrap it in a `Lookahead` to get peek and unget support.
pub struct SourceBuffer<R: Read>
{
    /// The raw bytes of the source.
    bytes: Bytes<BufReader<R>>,

    /// The path to, or meaningful tag for, the source code.
    path: Rc<str>,

    /// The logical location of the cursor in the source code.
    position: Position
}


impl<R: Read> SourceBuffer<R>
{
    /// Create a new SourceBuffer with the path to, or meaningful tag for the source code and the
    /// byte stream itself.
    pub fn new(path: &str, reader: R) -> Self
    {
        SourceBuffer
            {
                bytes: BufReader::new(reader).bytes(),
                path: Rc::from(path),
                position: Position::default()
            }
    }

    /// The shared path of the source being decoded.
    pub fn path(&self) -> &Rc<str>
    {
        &self.path
    }

    /// The location the cursor is at in the source code being decoded.
    pub fn location(&self) -> SourceLocation
    {
        SourceLocation::new_at(&self.path, self.position)
    }

    fn next_byte(&mut self) -> error::Result<Option<u8>>
    {
        Ok(self.bytes.next().transpose()?)
    }

    /// Decode the next scalar.  The lead byte decides how many continuation bytes follow, the
    /// standard library then validates the whole sequence so overlong forms and surrogates are
    /// rejected as well.
    fn decode(&mut self) -> error::Result<Option<char>>
    {
        let lead = match self.next_byte()?
            {
                Some(lead) => lead,
                None => return Ok(None)
            };

        let width = match lead
            {
                0x00..=0x7f => return Ok(Some(lead as char)),
                0xc2..=0xdf => 2,
                0xe0..=0xef => 3,
                0xf0..=0xf4 => 4,
                _ => return self.malformed(format!("Invalid UTF-8 lead byte 0x{:02x}.", lead))
            };

        let mut encoded = [lead, 0, 0, 0];

        for slot in encoded.iter_mut().take(width).skip(1)
        {
            match self.next_byte()?
            {
                Some(byte) => *slot = byte,
                None => return self.malformed("Truncated UTF-8 sequence before EOF.".to_string())
            }
        }

        match std::str::from_utf8(&encoded[..width])
        {
            Ok(text) => Ok(text.chars().next()),
            Err(_) => self.malformed("Invalid UTF-8 sequence.".to_string())
        }
    }

    fn malformed<T>(&self, message: String) -> error::Result<T>
    {
        script_error(ErrorKind::Encoding, &self.location(), message)
    }
}


impl<R: Read> Source for SourceBuffer<R>
{
    type Item = Character;

    fn read(&mut self, buffer: &mut VecDeque<Character>) -> error::Result<bool>
    {
        match self.decode()?
        {
            Some(value) =>
                {
                    buffer.push_back(Character { value, position: self.position });
                    self.position.advance(value);
                    Ok(true)
                },

            None => Ok(false)
        }
    }
}
