//! 数值与扩展类型格式化
//!
//! 每种类型写入前按 [`crate::spec`] 中的最坏长度预留空间，格式化与区域设置无关。
//! 通用数值路径把非有限浮点数写成带引号的字符串，带前缀的 Float32/Float64 路径
//! 则直接格式化，不做非有限值检查。

use crate::buffer::GrowableBuffer;
use crate::spec::*;
use crate::{JsonWriteError, JsonWriteResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use uuid::Uuid;

/// 通用数值
///
/// 整数走整数格式化路径，浮点数走最短往返格式化路径。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number64 {
    Integer(i64),
    Double(f64),
}

impl Number64 {
    pub fn is_integer(&self) -> bool {
        matches!(self, Number64::Integer(_))
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number64::Integer(n) => n as f64,
            Number64::Double(f) => f,
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Number64 {
                fn from(n: $t) -> Self {
                    Number64::Integer(i64::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Number64 {
    fn from(f: f32) -> Self {
        Number64::Double(f64::from(f))
    }
}

impl From<f64> for Number64 {
    fn from(f: f64) -> Self {
        Number64::Double(f)
    }
}

impl fmt::Display for Number64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number64::Integer(n) => write!(f, "{}", n),
            Number64::Double(d) => write!(f, "{}", d),
        }
    }
}

/// 写入通用数值（无前缀）
///
/// # Brief
/// 整数按十进制写出；有限浮点数按最短往返形式写出；
/// NaN 与正负无穷写成 `"NaN"`、`"Infinity"`、`"-Infinity"`，保持严格 JSON 兼容
///
/// # Arguments
/// * `buf` - 目标缓冲区
/// * `value` - 数值
pub fn write_number(buf: &mut GrowableBuffer, value: Number64) -> JsonWriteResult<()> {
    match value {
        Number64::Integer(n) => write_integer(buf, JsonTokenType::Number, n),
        Number64::Double(f) => write_double(buf, f),
    }
}

fn write_integer(buf: &mut GrowableBuffer, kind: JsonTokenType, n: i64) -> JsonWriteResult<()> {
    let mut digits = itoa::Buffer::new();
    buf.write_formatted(kind, MAX_INT64_LENGTH, digits.format(n).as_bytes())
}

fn write_double(buf: &mut GrowableBuffer, f: f64) -> JsonWriteResult<()> {
    let sentinel = if f.is_nan() {
        Some(NAN_LITERAL)
    } else if f == f64::INFINITY {
        Some(POSITIVE_INFINITY_LITERAL)
    } else if f == f64::NEG_INFINITY {
        Some(NEGATIVE_INFINITY_LITERAL)
    } else {
        None
    };

    match sentinel {
        Some(literal) => {
            buf.ensure_remaining(literal.len() + 2)?;
            buf.write_byte(QUOTE)?;
            buf.write_bytes(literal)?;
            buf.write_byte(QUOTE)
        }
        None => {
            let mut digits = ryu::Buffer::new();
            buf.write_formatted(
                JsonTokenType::Number,
                MAX_NUMBER_LENGTH,
                digits.format_finite(f).as_bytes(),
            )
        }
    }
}

pub fn write_int8(buf: &mut GrowableBuffer, n: i8) -> JsonWriteResult<()> {
    let mut digits = itoa::Buffer::new();
    buf.write_bytes(INT8_PREFIX)?;
    buf.write_formatted(JsonTokenType::Int8, MAX_INT8_LENGTH, digits.format(n).as_bytes())
}

pub fn write_int16(buf: &mut GrowableBuffer, n: i16) -> JsonWriteResult<()> {
    let mut digits = itoa::Buffer::new();
    buf.write_bytes(INT16_PREFIX)?;
    buf.write_formatted(JsonTokenType::Int16, MAX_INT16_LENGTH, digits.format(n).as_bytes())
}

pub fn write_int32(buf: &mut GrowableBuffer, n: i32) -> JsonWriteResult<()> {
    let mut digits = itoa::Buffer::new();
    buf.write_bytes(INT32_PREFIX)?;
    buf.write_formatted(JsonTokenType::Int32, MAX_INT32_LENGTH, digits.format(n).as_bytes())
}

pub fn write_int64(buf: &mut GrowableBuffer, n: i64) -> JsonWriteResult<()> {
    buf.write_bytes(INT64_PREFIX)?;
    write_integer(buf, JsonTokenType::Int64, n)
}

pub fn write_uint32(buf: &mut GrowableBuffer, n: u32) -> JsonWriteResult<()> {
    let mut digits = itoa::Buffer::new();
    buf.write_bytes(UINT32_PREFIX)?;
    buf.write_formatted(
        JsonTokenType::UInt32,
        MAX_UINT32_LENGTH,
        digits.format(n).as_bytes(),
    )
}

/// 写入 Float32，不检查非有限值（NaN 写作 `SNaN`，无穷写作 `Sinf` / `S-inf`）
pub fn write_float32(buf: &mut GrowableBuffer, f: f32) -> JsonWriteResult<()> {
    let mut digits = ryu::Buffer::new();
    buf.write_bytes(FLOAT32_PREFIX)?;
    buf.write_formatted(
        JsonTokenType::Float32,
        MAX_NUMBER_LENGTH,
        digits.format(f).as_bytes(),
    )
}

/// 写入 Float64，与 [`write_float32`] 一样不检查非有限值
pub fn write_float64(buf: &mut GrowableBuffer, f: f64) -> JsonWriteResult<()> {
    let mut digits = ryu::Buffer::new();
    buf.write_bytes(FLOAT64_PREFIX)?;
    buf.write_formatted(
        JsonTokenType::Float64,
        MAX_NUMBER_LENGTH,
        digits.format(f).as_bytes(),
    )
}

/// 写入 Guid：`G` + 小写带连字符的 36 字符形式，直接格式化到缓冲区游标
pub fn write_guid(buf: &mut GrowableBuffer, guid: Uuid) -> JsonWriteResult<()> {
    buf.write_bytes(GUID_PREFIX)?;
    buf.ensure_remaining(MAX_GUID_LENGTH)?;

    let hyphenated = guid.hyphenated();
    let written = uuid::fmt::Hyphenated::LENGTH;
    let cursor = buf.cursor();
    if cursor.len() < written {
        return Err(JsonWriteError::Formatting {
            kind: JsonTokenType::Guid,
            needed: written,
            reserved: cursor.len(),
        });
    }
    hyphenated.encode_lower(&mut cursor[..written]);
    buf.advance(written);
    Ok(())
}

/// 写入 Binary：`B` + 标准带填充 base64，直接编码到缓冲区游标
pub fn write_binary(buf: &mut GrowableBuffer, bytes: &[u8]) -> JsonWriteResult<()> {
    let reserve = max_base64_length(bytes.len()).ok_or(JsonWriteError::BufferAllocation {
        requested: usize::MAX,
        source: None,
    })?;
    buf.write_bytes(BINARY_PREFIX)?;
    buf.ensure_remaining(reserve)?;

    let cursor = buf.cursor();
    let available = cursor.len();
    let written = STANDARD
        .encode_slice(bytes, cursor)
        .map_err(|_| JsonWriteError::Formatting {
            kind: JsonTokenType::Binary,
            needed: reserve,
            reserved: available,
        })?;
    buf.advance(written);
    Ok(())
}
