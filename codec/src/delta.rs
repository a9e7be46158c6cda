//! Differential encoding against a shared baseline.
//!
//! A differential record declares its fields as data through
//! [`Differential::FIELDS`]. The encoded body is one presence bit per field in
//! declared order (1 = changed) followed by the encoded value of every changed
//! field, in the same order.
//!
//! Applying a differential onto a value other than the baseline it was
//! generated from is not detected; unchanged fields simply keep whatever the
//! target holds.

use bitstream::{BitReader, BitWriter};
use schema::{FieldCodec, RecordLayout, ScalarCodec};

use crate::error::{CodecError, CodecResult, ValueReason};
use crate::quant::{read_scalar, same_quantized, write_scalar};

/// A record that can be encoded as a difference from a baseline.
pub trait Differential: Clone + 'static {
    /// Record name used in layouts and diagnostics.
    const NAME: &'static str;

    /// Ordered field descriptors. The order is the wire order.
    const FIELDS: &'static [DiffField<Self>];
}

/// A named field of a differential record.
pub struct DiffField<T: 'static> {
    pub name: &'static str,
    pub access: Access<T>,
}

/// Typed accessors for one field, tagged with its encoding.
pub enum Access<T: 'static> {
    Bool {
        get: fn(&T) -> bool,
        set: fn(&mut T, bool),
    },
    UInt {
        bits: u8,
        get: fn(&T) -> u64,
        set: fn(&mut T, u64),
    },
    SInt {
        bits: u8,
        get: fn(&T) -> i64,
        set: fn(&mut T, i64),
    },
    Text {
        get: fn(&T) -> &str,
        set: fn(&mut T, String),
    },
    Scalar {
        codec: ScalarCodec,
        get: fn(&T) -> f32,
        set: fn(&mut T, f32),
    },
    /// A nested record, compared with `eq` and encoded in full.
    Record {
        eq: fn(&T, &T) -> bool,
        write: fn(&T, &mut BitWriter<'_>) -> CodecResult<()>,
        read: fn(&mut T, &mut BitReader<'_>) -> CodecResult<()>,
    },
}

impl<T: 'static> DiffField<T> {
    #[must_use]
    pub const fn bool(name: &'static str, get: fn(&T) -> bool, set: fn(&mut T, bool)) -> Self {
        Self {
            name,
            access: Access::Bool { get, set },
        }
    }

    #[must_use]
    pub const fn uint(
        name: &'static str,
        bits: u8,
        get: fn(&T) -> u64,
        set: fn(&mut T, u64),
    ) -> Self {
        Self {
            name,
            access: Access::UInt { bits, get, set },
        }
    }

    #[must_use]
    pub const fn sint(
        name: &'static str,
        bits: u8,
        get: fn(&T) -> i64,
        set: fn(&mut T, i64),
    ) -> Self {
        Self {
            name,
            access: Access::SInt { bits, get, set },
        }
    }

    #[must_use]
    pub const fn text(name: &'static str, get: fn(&T) -> &str, set: fn(&mut T, String)) -> Self {
        Self {
            name,
            access: Access::Text { get, set },
        }
    }

    #[must_use]
    pub const fn scalar(
        name: &'static str,
        codec: ScalarCodec,
        get: fn(&T) -> f32,
        set: fn(&mut T, f32),
    ) -> Self {
        Self {
            name,
            access: Access::Scalar { codec, get, set },
        }
    }

    #[must_use]
    pub const fn record(
        name: &'static str,
        eq: fn(&T, &T) -> bool,
        write: fn(&T, &mut BitWriter<'_>) -> CodecResult<()>,
        read: fn(&mut T, &mut BitReader<'_>) -> CodecResult<()>,
    ) -> Self {
        Self {
            name,
            access: Access::Record { eq, write, read },
        }
    }

    /// The schema codec describing this field.
    #[must_use]
    pub const fn codec(&self) -> FieldCodec {
        match self.access {
            Access::Bool { .. } => FieldCodec::Bool,
            Access::UInt { bits, .. } => FieldCodec::UInt { bits },
            Access::SInt { bits, .. } => FieldCodec::SInt { bits },
            Access::Text { .. } => FieldCodec::Text,
            Access::Scalar { codec, .. } => FieldCodec::Scalar(codec),
            Access::Record { .. } => FieldCodec::Record,
        }
    }

    /// Returns `true` if the field differs between `a` and `b` on the wire.
    #[must_use]
    pub fn changed(&self, a: &T, b: &T) -> bool {
        match &self.access {
            Access::Bool { get, .. } => get(a) != get(b),
            Access::UInt { get, .. } => get(a) != get(b),
            Access::SInt { get, .. } => get(a) != get(b),
            Access::Text { get, .. } => get(a) != get(b),
            Access::Scalar { codec, get, .. } => !same_quantized(*codec, get(a), get(b)),
            Access::Record { eq, .. } => !eq(a, b),
        }
    }

    fn check(&self, value: &T) -> CodecResult<()> {
        match &self.access {
            Access::UInt { bits, get, .. } => check_uint(self.name, *bits, get(value)),
            Access::SInt { bits, get, .. } => encode_sint(self.name, *bits, get(value)).map(|_| ()),
            Access::Scalar { codec, .. } => Ok(codec.validate()?),
            _ => Ok(()),
        }
    }

    fn write(&self, value: &T, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        match &self.access {
            Access::Bool { get, .. } => writer.write_bool(get(value))?,
            Access::UInt { bits, get, .. } => {
                let raw = get(value);
                check_uint(self.name, *bits, raw)?;
                writer.write_bits(raw, usize::from(*bits))?;
            }
            Access::SInt { bits, get, .. } => {
                let raw = encode_sint(self.name, *bits, get(value))?;
                writer.write_bits(raw, usize::from(*bits))?;
            }
            Access::Text { get, .. } => writer.write_string(get(value))?,
            Access::Scalar { codec, get, .. } => write_scalar(*codec, get(value), writer)?,
            Access::Record { write, .. } => write(value, writer)?,
        }
        Ok(())
    }

    fn read(&self, target: &mut T, reader: &mut BitReader<'_>) -> CodecResult<()> {
        match &self.access {
            Access::Bool { set, .. } => set(target, reader.read_bool()?),
            Access::UInt { bits, set, .. } => set(target, reader.read_bits(usize::from(*bits))?),
            Access::SInt { bits, set, .. } => {
                let raw = reader.read_bits(usize::from(*bits))?;
                set(target, decode_sint(*bits, raw));
            }
            Access::Text { set, .. } => set(target, reader.read_string()?),
            Access::Scalar { codec, set, .. } => set(target, read_scalar(*codec, reader)?),
            Access::Record { read, .. } => read(target, reader)?,
        }
        Ok(())
    }
}

/// Presence bits of a differential body, one per field in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMask {
    bits: Vec<bool>,
}

impl FieldMask {
    /// Creates a mask of `len` clear bits.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns `true` if the field at `index` is marked changed.
    #[must_use]
    pub fn is_set(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    pub fn set(&mut self, index: usize, changed: bool) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = changed;
        }
    }

    /// Number of fields marked changed.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// Returns `true` if no field is marked changed.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        !self.bits.iter().any(|&bit| bit)
    }

    /// Iterates the indices of changed fields in ascending order.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(index, &bit)| bit.then_some(index))
    }

    /// Names of the changed fields of `T`, in declared order.
    #[must_use]
    pub fn changed_names<T: Differential>(&self) -> Vec<&'static str> {
        self.iter_set()
            .filter_map(|index| T::FIELDS.get(index).map(|field| field.name))
            .collect()
    }
}

/// Computes which fields of `candidate` differ from `baseline`.
#[must_use]
pub fn field_mask<T: Differential>(candidate: &T, baseline: &T) -> FieldMask {
    let mut mask = FieldMask::new(T::FIELDS.len());
    for (index, field) in T::FIELDS.iter().enumerate() {
        mask.set(index, field.changed(candidate, baseline));
    }
    mask
}

/// Writes the differential of `candidate` against `baseline`.
///
/// Identical inputs produce an all-zero mask and a body of exactly
/// `T::FIELDS.len()` bits. Returns the mask that was written.
///
/// # Errors
///
/// Returns [`CodecError::InvalidValue`] if a changed integer does not fit its
/// declared width, or [`CodecError::Schema`] if a changed float field has
/// invalid quantization; nothing is written in either case. Buffer overflow
/// is reported as [`CodecError::Bitstream`].
pub fn generate_differential<T: Differential>(
    candidate: &T,
    baseline: &T,
    writer: &mut BitWriter<'_>,
) -> CodecResult<FieldMask> {
    let mask = field_mask(candidate, baseline);
    for index in mask.iter_set() {
        T::FIELDS[index].check(candidate)?;
    }

    for index in 0..mask.len() {
        writer.write_bool(mask.is_set(index))?;
    }
    for index in mask.iter_set() {
        T::FIELDS[index].write(candidate, writer)?;
    }
    Ok(mask)
}

/// Applies a differential body onto `target`.
///
/// Changed fields are decoded onto a staged copy that replaces `target` only
/// once every field decoded, so a truncated or malformed body leaves `target`
/// untouched. Returns the mask that was read.
pub fn apply_differential<T: Differential>(
    target: &mut T,
    reader: &mut BitReader<'_>,
) -> CodecResult<FieldMask> {
    let mut mask = FieldMask::new(T::FIELDS.len());
    for index in 0..mask.len() {
        mask.set(index, reader.read_bool()?);
    }
    if mask.is_clear() {
        return Ok(mask);
    }

    let mut staged = target.clone();
    for index in mask.iter_set() {
        T::FIELDS[index].read(&mut staged, reader)?;
    }
    *target = staged;
    Ok(mask)
}

/// Describes a differential record as a schema layout.
#[must_use]
pub fn layout_of<T: Differential>() -> RecordLayout {
    T::FIELDS
        .iter()
        .fold(RecordLayout::new(T::NAME), |layout, field| {
            layout.field(field.name, field.codec())
        })
}

fn check_uint(field: &'static str, bits: u8, value: u64) -> CodecResult<()> {
    if bits >= 64 || value >> bits == 0 {
        return Ok(());
    }
    Err(CodecError::InvalidValue {
        field,
        reason: ValueReason::UnsignedOutOfRange { bits, value },
    })
}

fn encode_sint(field: &'static str, bits: u8, value: i64) -> CodecResult<u64> {
    if bits == 0 {
        return Err(CodecError::InvalidValue {
            field,
            reason: ValueReason::SignedOutOfRange { bits, value },
        });
    }
    if bits >= 64 {
        return Ok(value as u64);
    }
    let min = -(1i128 << (bits - 1));
    let max = (1i128 << (bits - 1)) - 1;
    let wide = i128::from(value);
    if wide < min || wide > max {
        return Err(CodecError::InvalidValue {
            field,
            reason: ValueReason::SignedOutOfRange { bits, value },
        });
    }
    let mask = (1u64 << bits) - 1;
    Ok((value as u64) & mask)
}

fn decode_sint(bits: u8, raw: u64) -> i64 {
    if bits >= 64 {
        return raw as i64;
    }
    if bits == 0 {
        return 0;
    }
    let sign_bit = 1u64 << (bits - 1);
    if raw & sign_bit == 0 {
        raw as i64
    } else {
        let mask = (1u64 << bits) - 1;
        ((raw & mask) as i64) - (1i64 << bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitstream::BitBuffer;
    use schema::{AngleQuant, LinearQuant};

    use crate::record::Serializable;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Tag {
        id: u16,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Probe {
        alive: bool,
        level: u8,
        offset: i32,
        label: String,
        heading: f32,
        tag: Tag,
    }

    fn label(probe: &Probe) -> &str {
        &probe.label
    }

    impl Differential for Probe {
        const NAME: &'static str = "Probe";
        const FIELDS: &'static [DiffField<Self>] = &[
            DiffField::bool("alive", |p: &Self| p.alive, |p: &mut Self, v| p.alive = v),
            DiffField::uint(
                "level",
                6,
                |p: &Self| u64::from(p.level),
                |p: &mut Self, v| p.level = v as u8,
            ),
            DiffField::sint(
                "offset",
                12,
                |p: &Self| i64::from(p.offset),
                |p: &mut Self, v| p.offset = v as i32,
            ),
            DiffField::text("label", label, |p: &mut Self, v| p.label = v),
            DiffField::scalar(
                "heading",
                ScalarCodec::Angle(AngleQuant::new(12)),
                |p: &Self| p.heading,
                |p: &mut Self, v| p.heading = v,
            ),
            DiffField::record(
                "tag",
                |a: &Self, b: &Self| a.tag == b.tag,
                |p: &Self, w: &mut BitWriter<'_>| p.tag.id.serialize(w),
                |p: &mut Self, r: &mut BitReader<'_>| {
                    p.tag.id = u16::deserialize(r)?;
                    Ok(())
                },
            ),
        ];
    }

    fn encode(candidate: &Probe, baseline: &Probe) -> (BitBuffer, FieldMask, usize) {
        let mut buffer = BitBuffer::new(64);
        let mut writer = BitWriter::new(&mut buffer);
        let mask = generate_differential(candidate, baseline, &mut writer).unwrap();
        let bits = writer.bits_written();
        (buffer, mask, bits)
    }

    #[test]
    fn identical_values_write_only_the_mask() {
        let probe = Probe {
            label: "idle".to_string(),
            ..Probe::default()
        };
        let (buffer, mask, bits) = encode(&probe, &probe);
        assert!(mask.is_clear());
        assert_eq!(bits, Probe::FIELDS.len());

        let mut target = probe.clone();
        let mut reader = BitReader::new(&buffer);
        apply_differential(&mut target, &mut reader).unwrap();
        assert_eq!(target, probe);
    }

    #[test]
    fn single_change_sets_single_bit() {
        let baseline = Probe::default();
        let candidate = Probe {
            label: "Plot twist !".to_string(),
            ..Probe::default()
        };
        let (buffer, mask, bits) = encode(&candidate, &baseline);
        assert_eq!(mask.count(), 1);
        assert!(mask.is_set(3));
        assert_eq!(mask.changed_names::<Probe>(), vec!["label"]);
        assert_eq!(bits, Probe::FIELDS.len() + 16 + 12 * 8);

        let mut target = baseline;
        let mut reader = BitReader::new(&buffer);
        apply_differential(&mut target, &mut reader).unwrap();
        assert_eq!(target, candidate);
    }

    #[test]
    fn every_field_kind_roundtrips() {
        let baseline = Probe::default();
        let candidate = Probe {
            alive: true,
            level: 63,
            offset: -2048,
            label: "toast".to_string(),
            heading: 1.0,
            tag: Tag { id: 4079 },
        };
        let (buffer, mask, _) = encode(&candidate, &baseline);
        assert_eq!(mask.count(), 6);

        let mut target = baseline;
        let mut reader = BitReader::new(&buffer);
        apply_differential(&mut target, &mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(target.level, 63);
        assert_eq!(target.offset, -2048);
        assert_eq!(target.tag, candidate.tag);
        assert!((target.heading - 1.0).abs() < 0.002);
    }

    #[test]
    fn scalar_change_below_one_step_is_not_sent() {
        let baseline = Probe {
            heading: 1.0,
            ..Probe::default()
        };
        let candidate = Probe {
            heading: 1.0 + 1e-5,
            ..Probe::default()
        };
        assert!(field_mask(&candidate, &baseline).is_clear());
    }

    #[test]
    fn out_of_range_uint_is_rejected_before_writing() {
        let candidate = Probe {
            level: 64,
            ..Probe::default()
        };
        let mut buffer = BitBuffer::new(16);
        let mut writer = BitWriter::new(&mut buffer);
        let err = generate_differential(&candidate, &Probe::default(), &mut writer).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidValue {
                field: "level",
                reason: ValueReason::UnsignedOutOfRange { bits: 6, value: 64 },
            }
        );
        assert_eq!(writer.bits_written(), 0);
    }

    #[test]
    fn out_of_range_sint_is_rejected() {
        let candidate = Probe {
            offset: 2048,
            ..Probe::default()
        };
        let mut buffer = BitBuffer::new(16);
        let mut writer = BitWriter::new(&mut buffer);
        let err = generate_differential(&candidate, &Probe::default(), &mut writer).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidValue {
                field: "offset",
                reason: ValueReason::SignedOutOfRange { .. }
            }
        ));
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Skew {
        drift: i8,
        speed: f32,
    }

    impl Differential for Skew {
        const NAME: &'static str = "Skew";
        const FIELDS: &'static [DiffField<Self>] = &[
            DiffField::sint(
                "drift",
                0,
                |s: &Self| i64::from(s.drift),
                |s: &mut Self, v| s.drift = v as i8,
            ),
            DiffField::scalar(
                "speed",
                ScalarCodec::Linear(LinearQuant::new(-4.0, 4.0, 40)),
                |s: &Self| s.speed,
                |s: &mut Self, v| s.speed = v,
            ),
        ];
    }

    #[test]
    fn zero_width_sint_is_rejected_before_writing() {
        let candidate = Skew {
            drift: -3,
            ..Skew::default()
        };
        let mut buffer = BitBuffer::new(16);
        let mut writer = BitWriter::new(&mut buffer);
        let err = generate_differential(&candidate, &Skew::default(), &mut writer).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidValue {
                field: "drift",
                reason: ValueReason::SignedOutOfRange { bits: 0, value: -3 },
            }
        );
        assert_eq!(writer.bits_written(), 0);
        assert!(encode_sint("drift", 0, 0).is_err());
    }

    #[test]
    fn invalid_scalar_quant_is_rejected_before_writing() {
        let candidate = Skew {
            speed: 2.0,
            ..Skew::default()
        };
        let mut buffer = BitBuffer::new(16);
        let mut writer = BitWriter::new(&mut buffer);
        let err = generate_differential(&candidate, &Skew::default(), &mut writer).unwrap_err();
        assert!(matches!(err, CodecError::Schema(_)));
        assert_eq!(writer.bits_written(), 0);
    }

    #[test]
    fn truncated_body_leaves_target_untouched() {
        let baseline = Probe::default();
        let candidate = Probe {
            alive: true,
            label: "a long enough label".to_string(),
            ..Probe::default()
        };
        let (buffer, _, bits) = encode(&candidate, &baseline);

        // Keep the mask and the first value but cut the label short
        let cut = buffer.as_bytes()[..(bits / 8) - 4].to_vec();
        let truncated = BitBuffer::from_bytes(&cut);
        let mut target = baseline.clone();
        let mut reader = BitReader::new(&truncated);
        assert!(apply_differential(&mut target, &mut reader).is_err());
        assert_eq!(target, baseline);
    }

    #[test]
    fn mismatched_baseline_is_permissive() {
        let baseline = Probe::default();
        let candidate = Probe {
            level: 5,
            ..Probe::default()
        };
        let (buffer, _, _) = encode(&candidate, &baseline);

        let mut other = Probe {
            label: "stale".to_string(),
            ..Probe::default()
        };
        let mut reader = BitReader::new(&buffer);
        apply_differential(&mut other, &mut reader).unwrap();
        assert_eq!(other.level, 5);
        assert_eq!(other.label, "stale");
    }

    #[test]
    fn layout_mirrors_fields() {
        let layout = layout_of::<Probe>();
        assert_eq!(layout.name, "Probe");
        assert_eq!(layout.len(), 6);
        assert_eq!(layout.fields[1].codec, FieldCodec::UInt { bits: 6 });
        assert_eq!(layout.fields[5].codec, FieldCodec::Record);
        layout.validate().unwrap();
    }

    #[test]
    fn sint_sign_extension() {
        assert_eq!(decode_sint(12, encode_sint("x", 12, -1).unwrap()), -1);
        assert_eq!(decode_sint(12, encode_sint("x", 12, -2048).unwrap()), -2048);
        assert_eq!(decode_sint(12, encode_sint("x", 12, 2047).unwrap()), 2047);
        assert_eq!(decode_sint(64, encode_sint("x", 64, i64::MIN).unwrap()), i64::MIN);
    }

    #[test]
    fn mask_helpers() {
        let mut mask = FieldMask::new(4);
        assert!(mask.is_clear());
        mask.set(1, true);
        mask.set(3, true);
        mask.set(9, true);
        assert_eq!(mask.iter_set().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(mask.count(), 2);
        assert!(!mask.is_set(9));
    }
}
