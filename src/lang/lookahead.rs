use crate::runtime::error;
use std::collections::VecDeque;



/// A pull based producer of units for the next stage of the pipeline.  Each call reads as little
/// upstream input as it can and appends zero or more units to the end of the buffer.
pub trait Source
{
    /// The unit produced by this stage.
    type Item;

    /// Read more units into the buffer.  Returns false once the source is exhausted and nothing
    /// was added.
    fn read(&mut self, buffer: &mut VecDeque<Self::Item>) -> error::Result<bool>;
}



/// A buffered cursor over a Source with unlimited push-back.  The decoder, the tokenizer and the
/// parser are all exposed through this one type, each stage pulling from the previous only when
/// its own buffer runs dry.
pub struct Lookahead<S: Source>
{
    /// The stage that produces the units.
    source: S,

    /// Units that have been read or pushed back but not yet consumed.
    buffer: VecDeque<S::Item>,

    /// Set once the source has reported that it is exhausted.  We never read past that point.
    exhausted: bool
}


impl<S: Source> Lookahead<S>
{
    /// Wrap a source.  Nothing is read until the first unit is requested.
    pub fn new(source: S) -> Self
    {
        Lookahead
            {
                source,
                buffer: VecDeque::new(),
                exhausted: false
            }
    }

    /// Is there nothing left, either buffered or in the source?
    pub fn is_empty(&mut self) -> error::Result<bool>
    {
        Ok(!self.fill()?)
    }

    /// Take a peek at the current unit without consuming it.
    pub fn top(&mut self) -> error::Result<Option<&S::Item>>
    {
        self.fill()?;
        Ok(self.buffer.front())
    }

    /// Consume and return the current unit.
    pub fn pop(&mut self) -> error::Result<Option<S::Item>>
    {
        self.fill()?;
        Ok(self.buffer.pop_front())
    }

    /// Unget a unit.  It becomes the current unit, ahead of anything already buffered.
    pub fn push(&mut self, item: S::Item)
    {
        self.buffer.push_front(item);
    }

    /// Access the underlying source.
    pub fn source(&self) -> &S
    {
        &self.source
    }

    /// Make sure there is at least one unit in the buffer, reading on demand.
    fn fill(&mut self) -> error::Result<bool>
    {
        while self.buffer.is_empty()
        {
            if self.exhausted
            {
                return Ok(false);
            }

            if !self.source.read(&mut self.buffer)?
            {
                self.exhausted = true;
            }
        }

        Ok(true)
    }
}



#[cfg(test)]
mod tests
{
    use super::*;

    /// Counts down, producing a pair of units per read, and records how often it was asked.
    struct Countdown
    {
        next: u32,
        reads: usize
    }

    impl Source for Countdown
    {
        type Item = u32;

        fn read(&mut self, buffer: &mut VecDeque<u32>) -> error::Result<bool>
        {
            self.reads += 1;

            if self.next == 0
            {
                return Ok(false);
            }

            buffer.push_back(self.next);
            buffer.push_back(self.next + 100);
            self.next -= 1;

            Ok(true)
        }
    }

    #[test]
    fn reads_on_demand_and_preserves_order()
    {
        let mut cursor = Lookahead::new(Countdown { next: 2, reads: 0 });

        assert_eq!(cursor.source().reads, 0);
        assert_eq!(cursor.top().unwrap(), Some(&2));
        assert_eq!(cursor.source().reads, 1);

        assert_eq!(cursor.pop().unwrap(), Some(2));
        assert_eq!(cursor.pop().unwrap(), Some(102));
        assert_eq!(cursor.source().reads, 1);

        assert_eq!(cursor.pop().unwrap(), Some(1));
        assert_eq!(cursor.source().reads, 2);
    }

    #[test]
    fn push_restores_exact_order()
    {
        let mut cursor = Lookahead::new(Countdown { next: 1, reads: 0 });

        let first = cursor.pop().unwrap().unwrap();
        let second = cursor.pop().unwrap().unwrap();

        cursor.push(second);
        cursor.push(first);

        assert_eq!(cursor.pop().unwrap(), Some(1));
        assert_eq!(cursor.pop().unwrap(), Some(101));
        assert!(cursor.is_empty().unwrap());
    }

    #[test]
    fn never_reads_past_exhaustion()
    {
        let mut cursor = Lookahead::new(Countdown { next: 0, reads: 0 });

        assert!(cursor.is_empty().unwrap());
        assert!(cursor.is_empty().unwrap());
        assert_eq!(cursor.pop().unwrap(), None);
        assert_eq!(cursor.source().reads, 1);

        cursor.push(7);
        assert_eq!(cursor.pop().unwrap(), Some(7));
        assert_eq!(cursor.pop().unwrap(), None);
        assert_eq!(cursor.source().reads, 1);
    }
}
