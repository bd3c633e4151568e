//! Owned value buffers produced by bulk materialization.

use crate::format::ValueFormat;

/// A freshly decoded, natively laid out value buffer.
///
/// The variant matches the [`ValueFormat`] the values were declared with in
/// the file header. Two materializations of the same descriptor yield
/// byte-identical buffers.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueArray {
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    UnsignedChar(Vec<u8>),
    Char(Vec<i8>),
}

impl ValueArray {
    /// The format of the stored values.
    pub fn format(&self) -> ValueFormat {
        match self {
            ValueArray::Int(_) => ValueFormat::Int,
            ValueArray::Float(_) => ValueFormat::Float,
            ValueArray::Double(_) => ValueFormat::Double,
            ValueArray::UnsignedChar(_) => ValueFormat::UnsignedChar,
            ValueArray::Char(_) => ValueFormat::Char,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            ValueArray::Int(v) => v.len(),
            ValueArray::Float(v) => v.len(),
            ValueArray::Double(v) => v.len(),
            ValueArray::UnsignedChar(v) => v.len(),
            ValueArray::Char(v) => v.len(),
        }
    }

    /// True if the buffer holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total payload size in bytes.
    pub fn byte_len(&self) -> usize {
        self.len() * self.format().size()
    }

    /// The raw native-layout bytes of the buffer, e.g. for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ValueArray::Int(v) => bytemuck::cast_slice(v),
            ValueArray::Float(v) => bytemuck::cast_slice(v),
            ValueArray::Double(v) => bytemuck::cast_slice(v),
            ValueArray::UnsignedChar(v) => v,
            ValueArray::Char(v) => bytemuck::cast_slice(v),
        }
    }

    /// Reads component `i` widened to `f64`, or `None` past the end.
    ///
    /// The geometry engine works through this accessor so one fill path
    /// serves every point format.
    pub fn component(&self, i: usize) -> Option<f64> {
        match self {
            ValueArray::Int(v) => v.get(i).map(|&x| f64::from(x)),
            ValueArray::Float(v) => v.get(i).map(|&x| f64::from(x)),
            ValueArray::Double(v) => v.get(i).copied(),
            ValueArray::UnsignedChar(v) => v.get(i).map(|&x| f64::from(x)),
            ValueArray::Char(v) => v.get(i).map(|&x| f64::from(x)),
        }
    }

    /// The values as an `i32` slice, if that is their format.
    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            ValueArray::Int(v) => Some(v),
            _ => None,
        }
    }

    /// The values as an `f32` slice, if that is their format.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            ValueArray::Float(v) => Some(v),
            _ => None,
        }
    }

    /// The values as an `f64` slice, if that is their format.
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            ValueArray::Double(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_len_follows_format() {
        let a = ValueArray::Double(vec![1.0; 6]);
        assert_eq!(a.byte_len(), 48);
        assert_eq!(a.as_bytes().len(), 48);

        let b = ValueArray::UnsignedChar(vec![0; 5]);
        assert_eq!(b.byte_len(), 5);
    }

    #[test]
    fn test_component_widens() {
        let a = ValueArray::Int(vec![-3, 7]);
        assert_eq!(a.component(0), Some(-3.0));
        assert_eq!(a.component(1), Some(7.0));
        assert_eq!(a.component(2), None);

        let b = ValueArray::Char(vec![-1]);
        assert_eq!(b.component(0), Some(-1.0));
    }

    #[test]
    fn test_typed_slice_access() {
        let a = ValueArray::Float(vec![0.5, 1.5]);
        assert_eq!(a.as_f32(), Some(&[0.5f32, 1.5][..]));
        assert_eq!(a.as_i32(), None);
    }
}
