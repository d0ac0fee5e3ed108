//! serde_json 值桥接模块
//!
//! 将已有的 `serde_json::Value` 逐 token 写入任意 [`JsonWriter`]。

use crate::number::Number64;
use crate::options::WriterOptions;
use crate::spec::JsonTokenType;
use crate::writer::{JsonTextWriter, JsonWriter};
use crate::{JsonWriteError, JsonWriteResult};
use bytes::Bytes;
use serde_json::{Number, Value as JsonValue};

/// 将 JSON 值写入写入器
///
/// # Brief
/// 递归遍历 JSON 值并调用对应的写入操作。对象键按原顺序写出，不去重也不排序
///
/// # 数值映射
/// - 可表示为 i64 的整数：通用数值（整数路径）
/// - 超出 i64 的无符号整数：原样透传十进制数字，保持精度
/// - 其余：通用数值（浮点路径）
///
/// # Arguments
/// * `writer` - 目标写入器
/// * `value` - 要写入的 JSON 值
///
/// # Returns
/// 成功返回 Ok(()), 写入失败返回错误
pub fn write_json_value<W: JsonWriter>(writer: &mut W, value: &JsonValue) -> JsonWriteResult<()> {
    match value {
        JsonValue::Null => writer.write_null_value(),
        JsonValue::Bool(b) => writer.write_bool_value(*b),
        JsonValue::Number(n) => write_json_number(writer, n),
        JsonValue::String(s) => writer.write_string_value(s),
        JsonValue::Array(arr) => {
            writer.write_array_start()?;
            for item in arr {
                write_json_value(writer, item)?;
            }
            writer.write_array_end()
        }
        JsonValue::Object(obj) => {
            writer.write_object_start()?;
            for (k, v) in obj {
                writer.write_field_name(k)?;
                write_json_value(writer, v)?;
            }
            writer.write_object_end()
        }
    }
}

fn write_json_number<W: JsonWriter>(writer: &mut W, n: &Number) -> JsonWriteResult<()> {
    if let Some(i) = n.as_i64() {
        writer.write_number_value(Number64::Integer(i))
    } else if let Some(u) = n.as_u64() {
        let mut digits = itoa::Buffer::new();
        writer.write_raw_json_token(JsonTokenType::Number, digits.format(u).as_bytes())
    } else if let Some(f) = n.as_f64() {
        writer.write_number_value(Number64::Double(f))
    } else {
        Err(JsonWriteError::Serialization(format!(
            "number {} has no i64, u64 or f64 representation",
            n
        )))
    }
}

/// 将 JSON 值序列化为文本
///
/// # Arguments
/// * `value` - 要序列化的 JSON 值
/// * `options` - 写入器配置
///
/// # Returns
/// 成功返回冻结的字节, 失败返回错误
pub fn to_json_bytes(value: &JsonValue, options: WriterOptions) -> JsonWriteResult<Bytes> {
    let mut writer = JsonTextWriter::with_options(options);
    write_json_value(&mut writer, value)?;
    Ok(writer.into_bytes())
}
