//! Little-endian primitive encoding shared by every object kind.

use crate::error::CodecError;
use crate::geometry::limits;
use crate::model::Vec2;

#[derive(Debug, Default)]
pub struct StreamWriter {
    buf: Vec<u8>,
}

impl StreamWriter {
    pub fn new() -> Self {
        Self { buf: Vec::with_capacity(256) }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Lengths and counts are written as u32.
    pub fn write_len(&mut self, len: usize) {
        self.write_u32(len as u32);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_len(s.len());
        self.buf.extend_from_slice(s.as_bytes());
    }

    pub fn write_vec2(&mut self, v: Vec2) {
        self.write_f32(v.x);
        self.write_f32(v.y);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an encoded stream. Also carries the running object and point
/// budgets so a hostile stream cannot allocate without bound.
#[derive(Debug)]
pub struct StreamReader<'a> {
    data: &'a [u8],
    pos: usize,
    objects: usize,
    points: usize,
}

impl<'a> StreamReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, objects: 0, points: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.data.len() - self.pos < n {
            return Err(CodecError::UnexpectedEnd);
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_f32(&mut self) -> Result<f32, CodecError> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(f32::from_le_bytes(bytes))
    }

    /// Read a count and reject it when it exceeds `max`.
    pub fn read_len(&mut self, max: usize, what: &'static str) -> Result<usize, CodecError> {
        let n = self.read_u32()? as usize;
        if n > max {
            return Err(CodecError::LimitExceeded(what));
        }
        Ok(n)
    }

    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let len = self.read_len(limits::MAX_STRING_BYTES, "string length")?;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidString)
    }

    pub fn read_vec2(&mut self) -> Result<Vec2, CodecError> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        if !limits::in_coord_bounds(x) || !limits::in_coord_bounds(y) {
            return Err(CodecError::InvalidCoordinate);
        }
        Ok(Vec2::new(x, y))
    }

    pub(crate) fn charge_object(&mut self) -> Result<(), CodecError> {
        self.objects += 1;
        if self.objects > limits::MAX_OBJECTS {
            return Err(CodecError::LimitExceeded("object count"));
        }
        Ok(())
    }

    pub(crate) fn charge_points(&mut self, n: usize) -> Result<(), CodecError> {
        self.points += n;
        if self.points > limits::MAX_POINTS_TOTAL {
            return Err(CodecError::LimitExceeded("total points"));
        }
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Succeeds only if the whole stream was consumed.
    pub fn finish(self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_read_back() {
        let mut w = StreamWriter::new();
        w.write_u8(7);
        w.write_u32(0xDEAD_BEEF);
        w.write_str("spline");
        w.write_vec2(Vec2::new(1.5, -2.0));
        let bytes = w.into_bytes();
        let mut r = StreamReader::new(&bytes);
        assert_eq!(r.read_u8().unwrap(), 7);
        assert_eq!(r.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(r.read_string().unwrap(), "spline");
        assert_eq!(r.read_vec2().unwrap(), Vec2::new(1.5, -2.0));
        assert!(r.finish().is_ok());
    }

    #[test]
    fn test_truncated_input() {
        let mut r = StreamReader::new(&[1, 2, 3]);
        assert_eq!(r.read_u32(), Err(CodecError::UnexpectedEnd));
    }

    #[test]
    fn test_string_length_is_capped() {
        let mut w = StreamWriter::new();
        w.write_u32(u32::MAX);
        let bytes = w.into_bytes();
        let mut r = StreamReader::new(&bytes);
        assert_eq!(r.read_string(), Err(CodecError::LimitExceeded("string length")));
    }

    #[test]
    fn test_invalid_utf8_and_coordinates() {
        let mut r = StreamReader::new(&[2, 0, 0, 0, 0xff, 0xfe]);
        assert_eq!(r.read_string(), Err(CodecError::InvalidString));

        let mut w = StreamWriter::new();
        w.write_f32(f32::NAN);
        w.write_f32(0.0);
        let bytes = w.into_bytes();
        let mut r = StreamReader::new(&bytes);
        assert_eq!(r.read_vec2(), Err(CodecError::InvalidCoordinate));
    }

    #[test]
    fn test_trailing_bytes_detected() {
        let r = StreamReader::new(&[0]);
        assert_eq!(r.finish(), Err(CodecError::TrailingBytes(1)));
    }
}
