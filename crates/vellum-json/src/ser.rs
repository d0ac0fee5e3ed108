//! serde 序列化器
//!
//! 直接把 serde 数据模型映射为写入器的 token 调用，不构建中间值。
//! 字节数组写成 Binary 扩展类型，其余类型只使用标准 JSON token。

use crate::number::Number64;
use crate::options::WriterOptions;
use crate::spec::JsonTokenType;
use crate::writer::{JsonTextWriter, JsonWriter};
use crate::{JsonWriteError, JsonWriteResult};
use serde::ser::{self, Impossible, Serialize};

pub struct Serializer<W> {
    writer: W,
}

impl<W: JsonWriter> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_raw_number(&mut self, digits: &str) -> JsonWriteResult<()> {
        self.writer
            .write_raw_json_token(JsonTokenType::Number, digits.as_bytes())
    }

    /// 开启外部标记的枚举变体：`{"variant":`
    fn begin_variant(&mut self, variant: &str) -> JsonWriteResult<()> {
        self.writer.write_object_start()?;
        self.writer.write_field_name(variant)
    }
}

/// 将值序列化为文本字节
///
/// # Arguments
/// * `value` - 实现 Serialize 的值
/// * `options` - 写入器配置
///
/// # Returns
/// 成功返回字节向量, 失败返回错误
pub fn to_vec<T: ?Sized + Serialize>(value: &T, options: WriterOptions) -> JsonWriteResult<Vec<u8>> {
    let mut serializer = Serializer::new(JsonTextWriter::with_options(options));
    value.serialize(&mut serializer)?;
    Ok(Vec::from(serializer.into_inner().into_bytes()))
}

/// 将值序列化为字符串
pub fn to_string<T: ?Sized + Serialize>(value: &T, options: WriterOptions) -> JsonWriteResult<String> {
    let bytes = to_vec(value, options)?;
    String::from_utf8(bytes).map_err(|e| JsonWriteError::Serialization(e.to_string()))
}

impl<'a, W: JsonWriter> ser::Serializer for &'a mut Serializer<W> {
    type Ok = ();
    type Error = JsonWriteError;
    type SerializeSeq = Compound<'a, W>;
    type SerializeTuple = Compound<'a, W>;
    type SerializeTupleStruct = Compound<'a, W>;
    type SerializeTupleVariant = Compound<'a, W>;
    type SerializeMap = Compound<'a, W>;
    type SerializeStruct = Compound<'a, W>;
    type SerializeStructVariant = Compound<'a, W>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        self.writer.write_bool_value(v)
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        self.writer.write_number_value(v)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        self.writer.write_number_value(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        self.writer.write_number_value(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        self.writer.write_number_value(v)
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        match i64::try_from(v) {
            Ok(n) => self.writer.write_number_value(n),
            Err(_) => self.write_raw_number(itoa::Buffer::new().format(v)),
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        self.writer.write_number_value(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        self.writer.write_number_value(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        self.writer.write_number_value(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        match i64::try_from(v) {
            Ok(n) => self.writer.write_number_value(n),
            Err(_) => self.write_raw_number(itoa::Buffer::new().format(v)),
        }
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        match i64::try_from(v) {
            Ok(n) => self.writer.write_number_value(n),
            Err(_) => self.write_raw_number(itoa::Buffer::new().format(v)),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        // f32 按自身精度输出最短形式，避免 0.1f32 展开成 f64 的长尾
        if v.is_finite() {
            self.write_raw_number(ryu::Buffer::new().format_finite(v))
        } else {
            self.writer.write_number_value(v)
        }
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        self.writer.write_number_value(Number64::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        let mut utf8 = [0u8; 4];
        self.writer.write_string_value(v.encode_utf8(&mut utf8))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        self.writer.write_string_value(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        self.writer.write_binary_value(v)
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        self.serialize_unit()
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        self.writer.write_null_value()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        self.begin_variant(variant)?;
        value.serialize(&mut *self)?;
        self.writer.write_object_end()
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        self.writer.write_array_start()?;
        Ok(Compound {
            ser: self,
            in_variant: false,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        self.begin_variant(variant)?;
        self.writer.write_array_start()?;
        Ok(Compound {
            ser: self,
            in_variant: true,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        self.writer.write_object_start()?;
        Ok(Compound {
            ser: self,
            in_variant: false,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        self.begin_variant(variant)?;
        self.writer.write_object_start()?;
        Ok(Compound {
            ser: self,
            in_variant: true,
        })
    }
}

/// 数组/对象序列化状态，`in_variant` 表示结束时还需关闭外层变体对象
pub struct Compound<'a, W> {
    ser: &'a mut Serializer<W>,
    in_variant: bool,
}

impl<'a, W: JsonWriter> Compound<'a, W> {
    fn end_array(self) -> JsonWriteResult<()> {
        self.ser.writer.write_array_end()?;
        if self.in_variant {
            self.ser.writer.write_object_end()?;
        }
        Ok(())
    }

    fn end_object(self) -> JsonWriteResult<()> {
        self.ser.writer.write_object_end()?;
        if self.in_variant {
            self.ser.writer.write_object_end()?;
        }
        Ok(())
    }
}

impl<'a, W: JsonWriter> ser::SerializeSeq for Compound<'a, W> {
    type Ok = ();
    type Error = JsonWriteError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.end_array()
    }
}

impl<'a, W: JsonWriter> ser::SerializeTuple for Compound<'a, W> {
    type Ok = ();
    type Error = JsonWriteError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.end_array()
    }
}

impl<'a, W: JsonWriter> ser::SerializeTupleStruct for Compound<'a, W> {
    type Ok = ();
    type Error = JsonWriteError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.end_array()
    }
}

impl<'a, W: JsonWriter> ser::SerializeTupleVariant for Compound<'a, W> {
    type Ok = ();
    type Error = JsonWriteError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.end_array()
    }
}

impl<'a, W: JsonWriter> ser::SerializeMap for Compound<'a, W> {
    type Ok = ();
    type Error = JsonWriteError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        key.serialize(MapKeySerializer {
            writer: &mut self.ser.writer,
        })
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.end_object()
    }
}

impl<'a, W: JsonWriter> ser::SerializeStruct for Compound<'a, W> {
    type Ok = ();
    type Error = JsonWriteError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.ser.writer.write_field_name(key)?;
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.end_object()
    }
}

impl<'a, W: JsonWriter> ser::SerializeStructVariant for Compound<'a, W> {
    type Ok = ();
    type Error = JsonWriteError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        ser::SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.end_object()
    }
}

fn key_must_be_a_string() -> JsonWriteError {
    JsonWriteError::Serialization("Map key must be a string".to_string())
}

/// 映射键序列化器，把字符串、字符、整数和单元变体写成字段名
struct MapKeySerializer<'a, W> {
    writer: &'a mut W,
}

impl<'a, W: JsonWriter> MapKeySerializer<'a, W> {
    fn write_integer_key<I: itoa::Integer>(self, v: I) -> JsonWriteResult<()> {
        self.writer.write_field_name(itoa::Buffer::new().format(v))
    }
}

impl<'a, W: JsonWriter> ser::Serializer for MapKeySerializer<'a, W> {
    type Ok = ();
    type Error = JsonWriteError;
    type SerializeSeq = Impossible<(), JsonWriteError>;
    type SerializeTuple = Impossible<(), JsonWriteError>;
    type SerializeTupleStruct = Impossible<(), JsonWriteError>;
    type SerializeTupleVariant = Impossible<(), JsonWriteError>;
    type SerializeMap = Impossible<(), JsonWriteError>;
    type SerializeStruct = Impossible<(), JsonWriteError>;
    type SerializeStructVariant = Impossible<(), JsonWriteError>;

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        self.writer.write_field_name(v)
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        let mut utf8 = [0u8; 4];
        self.writer.write_field_name(v.encode_utf8(&mut utf8))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        self.write_integer_key(v)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        self.write_integer_key(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        self.write_integer_key(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        self.write_integer_key(v)
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        self.write_integer_key(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        self.write_integer_key(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        self.write_integer_key(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        self.write_integer_key(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        self.write_integer_key(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        self.write_integer_key(v)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.writer.write_field_name(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<Self::Ok, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(key_must_be_a_string())
    }
}

impl ser::Error for JsonWriteError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        JsonWriteError::Serialization(msg.to_string())
    }
}
