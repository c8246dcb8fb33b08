//! SPIR-V instruction stream reader.
use super::{Error, Result};

/// Iterator over the instructions following the module header. A malformed
/// word count yields one `Err` and ends the iteration.
pub struct Instrs<'a> {
    words: &'a [u32],
    poisoned: bool,
}
impl<'a> Instrs<'a> {
    pub fn new(words: &'a [u32]) -> Instrs<'a> {
        Instrs { words: words, poisoned: false }
    }
}
impl<'a> Iterator for Instrs<'a> {
    type Item = Result<Instr<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned { return None; }
        let head = *self.words.first()?;
        let len = (head >> 16) as usize;
        if len == 0 || len > self.words.len() {
            self.poisoned = true;
            return Some(Err(Error::CorruptedSpirv));
        }
        let instr = Instr {
            opcode: head & 0xFFFF,
            operands: &self.words[1..len],
        };
        self.words = &self.words[len..];
        Some(Ok(instr))
    }
}


pub struct Instr<'a> {
    opcode: u32,
    operands: &'a [u32],
}
impl<'a> Instr<'a> {
    /// Get the opcode of the instruction.
    pub fn opcode(&self) -> u32 { self.opcode }
    /// Get the word count of the instruction, including the first word
    /// containing the word count and opcode.
    pub fn word_count(&self) -> usize { self.operands.len() + 1 }
    /// Get an instruction operand reader.
    pub fn operands(&self) -> Operands<'a> { Operands(self.operands) }
}

pub struct Operands<'a>(&'a [u32]);
impl<'a> Operands<'a> {
    pub fn read_bool(&mut self) -> Result<bool> { self.read_u32().map(|x| x != 0) }
    pub fn read_u32(&mut self) -> Result<u32> {
        if let Some(x) = self.0.first() {
            self.0 = &self.0[1..];
            Ok(*x)
        } else { Err(Error::CorruptedSpirv) }
    }
    /// Read a nul-terminated UTF-8 literal string packed into little-endian
    /// words.
    pub fn read_str(&mut self) -> Result<String> {
        let mut bytes = Vec::with_capacity(self.0.len() * 4);
        for (i, word) in self.0.iter().enumerate() {
            for byte in word.to_le_bytes().iter() {
                if *byte == 0 {
                    self.0 = &self.0[i + 1..];
                    return String::from_utf8(bytes)
                        .map_err(|_| Error::CorruptedSpirv);
                }
                bytes.push(*byte);
            }
        }
        Err(Error::CorruptedSpirv)
    }
    pub fn read_list(&mut self) -> Result<&'a [u32]> {
        let rv = self.0;
        self.0 = &[];
        Ok(rv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_str() {
        // "main" followed by a padding word and a trailing operand.
        let words = [0x6e69616d, 0x00000000, 42];
        let mut operands = Operands(&words);
        assert_eq!(operands.read_str().unwrap(), "main");
        assert_eq!(operands.read_u32().unwrap(), 42);
        assert!(operands.read_u32().is_err());
    }
    #[test]
    fn test_unterminated_str() {
        let words = [0x6e69616d];
        assert!(Operands(&words).read_str().is_err());
    }
    #[test]
    fn test_zero_word_count_stops() {
        let words = [(2 << 16) | 17, 1, 0, 99];
        let mut instrs = Instrs::new(&words);
        let instr = instrs.next().unwrap().unwrap();
        assert_eq!(instr.opcode(), 17);
        assert_eq!(instr.word_count(), 2);
        assert!(instrs.next().unwrap().is_err());
        assert!(instrs.next().is_none());
    }
}
