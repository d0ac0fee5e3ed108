//! 文本格式常量定义
//!
//! 结构字符、扩展类型前缀以及每种 token 写入前的最坏长度预留。

pub const VALUE_SEPARATOR: u8 = b':';
pub const MEMBER_SEPARATOR: u8 = b',';
pub const OBJECT_START: u8 = b'{';
pub const OBJECT_END: u8 = b'}';
pub const ARRAY_START: u8 = b'[';
pub const ARRAY_END: u8 = b']';
pub const QUOTE: u8 = b'"';

pub const INT8_PREFIX: &[u8] = b"I";
pub const INT16_PREFIX: &[u8] = b"H";
pub const INT32_PREFIX: &[u8] = b"L";
// Int32 前缀写两次，读取端依赖这两个字节
pub const INT64_PREFIX: &[u8] = b"LL";
pub const UINT32_PREFIX: &[u8] = b"UL";
pub const FLOAT32_PREFIX: &[u8] = b"S";
pub const FLOAT64_PREFIX: &[u8] = b"D";
pub const GUID_PREFIX: &[u8] = b"G";
pub const BINARY_PREFIX: &[u8] = b"B";

pub const TRUE_LITERAL: &[u8] = b"true";
pub const FALSE_LITERAL: &[u8] = b"false";
pub const NULL_LITERAL: &[u8] = b"null";
pub const NAN_LITERAL: &[u8] = b"NaN";
pub const POSITIVE_INFINITY_LITERAL: &[u8] = b"Infinity";
pub const NEGATIVE_INFINITY_LITERAL: &[u8] = b"-Infinity";

pub const MAX_INT8_LENGTH: usize = 4;
pub const MAX_INT16_LENGTH: usize = 6;
pub const MAX_INT32_LENGTH: usize = 11;
pub const MAX_UINT32_LENGTH: usize = 11;
pub const MAX_INT64_LENGTH: usize = 20;
pub const MAX_NUMBER_LENGTH: usize = 32;
pub const MAX_GUID_LENGTH: usize = 38;

pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// base64 编码后的最大长度：`4 * ceil(n / 3)`，溢出时返回 `None`
pub fn max_base64_length(len: usize) -> Option<usize> {
    len.div_ceil(3).checked_mul(4)
}

/// token 类型
///
/// 每次写入前都要向语法状态机登记一个 token 类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonTokenType {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    FieldName,
    String,
    Number,
    True,
    False,
    Null,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt32,
    Float32,
    Float64,
    Guid,
    Binary,
    /// 已经序列化好的完整值，原样透传
    RawValue,
}

impl JsonTokenType {
    /// 是否为值 token（标量或透传值，不含结构 token 与字段名）
    pub fn is_value(self) -> bool {
        !matches!(
            self,
            JsonTokenType::BeginObject
                | JsonTokenType::EndObject
                | JsonTokenType::BeginArray
                | JsonTokenType::EndArray
                | JsonTokenType::FieldName
        )
    }

    /// 是否为扩展类型（标准 JSON 解析器无法识别）
    pub fn is_extended(self) -> bool {
        matches!(
            self,
            JsonTokenType::Int8
                | JsonTokenType::Int16
                | JsonTokenType::Int32
                | JsonTokenType::Int64
                | JsonTokenType::UInt32
                | JsonTokenType::Float32
                | JsonTokenType::Float64
                | JsonTokenType::Guid
                | JsonTokenType::Binary
        )
    }

    /// 扩展类型的前缀字节，标准 token 返回 `None`
    pub fn prefix(self) -> Option<&'static [u8]> {
        match self {
            JsonTokenType::Int8 => Some(INT8_PREFIX),
            JsonTokenType::Int16 => Some(INT16_PREFIX),
            JsonTokenType::Int32 => Some(INT32_PREFIX),
            JsonTokenType::Int64 => Some(INT64_PREFIX),
            JsonTokenType::UInt32 => Some(UINT32_PREFIX),
            JsonTokenType::Float32 => Some(FLOAT32_PREFIX),
            JsonTokenType::Float64 => Some(FLOAT64_PREFIX),
            JsonTokenType::Guid => Some(GUID_PREFIX),
            JsonTokenType::Binary => Some(BINARY_PREFIX),
            _ => None,
        }
    }
}
