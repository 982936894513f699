use crate::error::{Error, Result};

/// Read cursor over a map file. Integers are little-endian, strings end at
/// a line feed.
pub struct MapReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MapReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read up to the next line feed and drop any trailing CR/LF.
    ///
    /// A final line without a terminator is accepted; an exhausted stream
    /// is not. Bytes map one-to-one onto `U+0000..=U+00FF`, so nothing is
    /// lost for the encoder.
    pub fn read_line(&mut self) -> Result<String> {
        self.ensure(1)?;
        let rest = &self.data[self.pos..];
        let end = rest
            .iter()
            .position(|&b| b == b'\n')
            .map_or(rest.len(), |i| i + 1);
        self.pos += end;

        let mut line = &rest[..end];
        while let [head @ .., b'\r' | b'\n'] = line {
            line = head;
        }
        Ok(line.iter().map(|&b| char::from(b)).collect())
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [0x07, 0xFE, 0xFF, 0xFF, 0xFF, 0x2A, 0x00, 0x00, 0x00];
        let mut reader = MapReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.read_i32().unwrap(), -2);
        assert_eq!(reader.read_i32().unwrap(), 42);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_line_strips_crlf() {
        let data = b"hello\r\nworld\n\r\nlast";
        let mut reader = MapReader::new(data);

        assert_eq!(reader.read_line().unwrap(), "hello");
        assert_eq!(reader.read_line().unwrap(), "world");
        assert_eq!(reader.read_line().unwrap(), "");
        assert_eq!(reader.read_line().unwrap(), "last");
        assert!(reader.read_line().is_err());
    }

    #[test]
    fn test_read_line_keeps_high_bytes() {
        let data = [b'a', 0xE9, 0xFF, b'\r', b'\n'];
        let mut reader = MapReader::new(&data);
        assert_eq!(reader.read_line().unwrap(), "a\u{e9}\u{ff}");
    }

    #[test]
    fn test_eof_reports_offset() {
        let data = [0x01, 0x02];
        let mut reader = MapReader::new(&data);
        reader.skip(1).unwrap();

        match reader.read_i32() {
            Err(Error::UnexpectedEof { offset, need, have }) => {
                assert_eq!((offset, need, have), (1, 4, 1));
            }
            other => panic!("expected eof, got {other:?}"),
        }
    }
}
