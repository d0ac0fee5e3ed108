//! 写入器接口与变体
//!
//! [`JsonWriter`] 是所有格式共享的写入能力接口；[`FormatWriter`] 是构造时选定的
//! 封闭变体集合，通过 `match` 分发。

mod text;

pub use text::JsonTextWriter;

use crate::number::Number64;
use crate::options::{SerializationFormat, WriterOptions};
use crate::spec::JsonTokenType;
use crate::JsonWriteResult;
use bytes::Bytes;
use uuid::Uuid;

/// JSON 写入能力接口
///
/// 每个写入操作依次：向语法状态机登记 token（失败立即返回，缓冲区不变）、
/// 按需插入分隔符、写出 token 字节。分隔符只由写入器插入。
pub trait JsonWriter {
    /// 写入器的序列化格式
    fn serialization_format(&self) -> SerializationFormat;

    /// 已写入的字节数
    fn current_length(&self) -> usize;

    /// 当前嵌套深度（跳过校验时恒为 0）
    fn current_depth(&self) -> usize;

    fn write_object_start(&mut self) -> JsonWriteResult<()>;

    fn write_object_end(&mut self) -> JsonWriteResult<()>;

    fn write_array_start(&mut self) -> JsonWriteResult<()>;

    fn write_array_end(&mut self) -> JsonWriteResult<()>;

    /// 写入字段名，自动加引号与 `:`
    fn write_field_name(&mut self, field_name: &str) -> JsonWriteResult<()>;

    fn write_string_value(&mut self, value: &str) -> JsonWriteResult<()>;

    /// 写入通用数值，非有限浮点数写成带引号的字符串
    fn write_number_value<N: Into<Number64>>(&mut self, value: N) -> JsonWriteResult<()>;

    fn write_bool_value(&mut self, value: bool) -> JsonWriteResult<()>;

    fn write_null_value(&mut self) -> JsonWriteResult<()>;

    fn write_int8_value(&mut self, value: i8) -> JsonWriteResult<()>;

    fn write_int16_value(&mut self, value: i16) -> JsonWriteResult<()>;

    fn write_int32_value(&mut self, value: i32) -> JsonWriteResult<()>;

    fn write_int64_value(&mut self, value: i64) -> JsonWriteResult<()>;

    fn write_uint32_value(&mut self, value: u32) -> JsonWriteResult<()>;

    fn write_float32_value(&mut self, value: f32) -> JsonWriteResult<()>;

    fn write_float64_value(&mut self, value: f64) -> JsonWriteResult<()>;

    fn write_guid_value(&mut self, value: Uuid) -> JsonWriteResult<()>;

    fn write_binary_value(&mut self, value: &[u8]) -> JsonWriteResult<()>;

    /// 写入已序列化的 token，仍然参与语法校验
    fn write_raw_json_token(
        &mut self,
        token_type: JsonTokenType,
        raw_json_token: &[u8],
    ) -> JsonWriteResult<()>;

    /// 已写入内容的只读视图，不修改状态，可重复调用
    fn result(&self) -> &[u8];
}

/// 创建指定格式的写入器
///
/// # Arguments
/// * `format` - 序列化格式
/// * `options` - 写入器配置
///
/// # Returns
/// 对应格式的 FormatWriter
pub fn create_writer(format: SerializationFormat, options: WriterOptions) -> FormatWriter {
    match format {
        SerializationFormat::Text => FormatWriter::Text(JsonTextWriter::with_options(options)),
    }
}

/// 写入器变体
#[derive(Debug, Clone)]
pub enum FormatWriter {
    Text(JsonTextWriter),
}

impl FormatWriter {
    /// 消费写入器，返回冻结后的结果
    pub fn into_bytes(self) -> Bytes {
        match self {
            FormatWriter::Text(w) => w.into_bytes(),
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $w:ident => $body:expr) => {
        match $self {
            FormatWriter::Text($w) => $body,
        }
    };
}

impl JsonWriter for FormatWriter {
    fn serialization_format(&self) -> SerializationFormat {
        dispatch!(self, w => w.serialization_format())
    }

    fn current_length(&self) -> usize {
        dispatch!(self, w => w.current_length())
    }

    fn current_depth(&self) -> usize {
        dispatch!(self, w => w.current_depth())
    }

    fn write_object_start(&mut self) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_object_start())
    }

    fn write_object_end(&mut self) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_object_end())
    }

    fn write_array_start(&mut self) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_array_start())
    }

    fn write_array_end(&mut self) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_array_end())
    }

    fn write_field_name(&mut self, field_name: &str) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_field_name(field_name))
    }

    fn write_string_value(&mut self, value: &str) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_string_value(value))
    }

    fn write_number_value<N: Into<Number64>>(&mut self, value: N) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_number_value(value))
    }

    fn write_bool_value(&mut self, value: bool) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_bool_value(value))
    }

    fn write_null_value(&mut self) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_null_value())
    }

    fn write_int8_value(&mut self, value: i8) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_int8_value(value))
    }

    fn write_int16_value(&mut self, value: i16) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_int16_value(value))
    }

    fn write_int32_value(&mut self, value: i32) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_int32_value(value))
    }

    fn write_int64_value(&mut self, value: i64) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_int64_value(value))
    }

    fn write_uint32_value(&mut self, value: u32) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_uint32_value(value))
    }

    fn write_float32_value(&mut self, value: f32) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_float32_value(value))
    }

    fn write_float64_value(&mut self, value: f64) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_float64_value(value))
    }

    fn write_guid_value(&mut self, value: Uuid) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_guid_value(value))
    }

    fn write_binary_value(&mut self, value: &[u8]) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_binary_value(value))
    }

    fn write_raw_json_token(
        &mut self,
        token_type: JsonTokenType,
        raw_json_token: &[u8],
    ) -> JsonWriteResult<()> {
        dispatch!(self, w => w.write_raw_json_token(token_type, raw_json_token))
    }

    fn result(&self) -> &[u8] {
        dispatch!(self, w => w.result())
    }
}
