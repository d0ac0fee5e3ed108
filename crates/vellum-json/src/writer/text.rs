//! 文本格式写入器

use super::JsonWriter;
use crate::buffer::GrowableBuffer;
use crate::escape::escape;
use crate::number::{self, Number64};
use crate::options::{SerializationFormat, WriterOptions};
use crate::spec::*;
use crate::state::JsonObjectState;
use crate::JsonWriteResult;
use bytes::Bytes;
use uuid::Uuid;

/// 文本格式 JSON 写入器
///
/// 维护一个作用域栈做语法校验，输出写入内部可增长缓冲区。
/// 实例由单个调用方独占，不做任何内部加锁。
#[derive(Debug, Clone)]
pub struct JsonTextWriter {
    state: JsonObjectState,
    buffer: GrowableBuffer,
    /// 当前作用域尚未写入任何值（或刚写完字段名），下一个值前不加 `,`
    first_value: bool,
}

impl JsonTextWriter {
    /// 创建默认配置的写入器
    pub fn new() -> Self {
        Self::with_options(WriterOptions::default())
    }

    /// 使用指定配置创建写入器
    ///
    /// # Arguments
    /// * `options` - 写入器配置
    ///
    /// # Returns
    /// 新的 JsonTextWriter 实例
    pub fn with_options(options: WriterOptions) -> Self {
        Self {
            state: JsonObjectState::new(options.skip_validation),
            buffer: GrowableBuffer::with_capacity(options.initial_capacity),
            first_value: true,
        }
    }

    /// 使用指定配置创建写入器，初始容量无法分配时返回 `BufferAllocation`
    pub fn try_with_options(options: WriterOptions) -> JsonWriteResult<Self> {
        Ok(Self {
            state: JsonObjectState::new(options.skip_validation),
            buffer: GrowableBuffer::try_with_capacity(options.initial_capacity)?,
            first_value: true,
        })
    }

    /// 语法状态
    pub fn state(&self) -> &JsonObjectState {
        &self.state
    }

    /// 消费写入器，返回冻结后的结果
    pub fn into_bytes(self) -> Bytes {
        self.buffer.into_bytes()
    }

    fn register(&mut self, token: JsonTokenType) -> JsonWriteResult<()> {
        self.state.register_token(token)?;
        Ok(())
    }

    /// 登记值 token 并按需写入成员分隔符
    fn begin_value(&mut self, token: JsonTokenType) -> JsonWriteResult<()> {
        self.register(token)?;
        self.prefix_member_separator()
    }

    fn prefix_member_separator(&mut self) -> JsonWriteResult<()> {
        if !self.first_value {
            self.buffer.write_byte(MEMBER_SEPARATOR)?;
        }
        self.first_value = false;
        Ok(())
    }

    fn write_quoted(&mut self, text: &str) -> JsonWriteResult<()> {
        let escaped = escape(text);
        self.buffer.ensure_remaining(escaped.len() + 2)?;
        self.buffer.write_byte(QUOTE)?;
        self.buffer.write_bytes(escaped.as_bytes())?;
        self.buffer.write_byte(QUOTE)
    }
}

impl Default for JsonTextWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWriter for JsonTextWriter {
    fn serialization_format(&self) -> SerializationFormat {
        SerializationFormat::Text
    }

    fn current_length(&self) -> usize {
        self.buffer.position()
    }

    fn current_depth(&self) -> usize {
        self.state.current_depth()
    }

    fn write_object_start(&mut self) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::BeginObject)?;
        self.buffer.write_byte(OBJECT_START)?;
        self.first_value = true;
        Ok(())
    }

    fn write_object_end(&mut self) -> JsonWriteResult<()> {
        self.register(JsonTokenType::EndObject)?;
        self.buffer.write_byte(OBJECT_END)?;
        // 下一个兄弟值前需要分隔符
        self.first_value = false;
        Ok(())
    }

    fn write_array_start(&mut self) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::BeginArray)?;
        self.buffer.write_byte(ARRAY_START)?;
        self.first_value = true;
        Ok(())
    }

    fn write_array_end(&mut self) -> JsonWriteResult<()> {
        self.register(JsonTokenType::EndArray)?;
        self.buffer.write_byte(ARRAY_END)?;
        self.first_value = false;
        Ok(())
    }

    fn write_field_name(&mut self, field_name: &str) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::FieldName)?;
        // 字段值前不加 `,`
        self.first_value = true;
        self.write_quoted(field_name)?;
        self.buffer.write_byte(VALUE_SEPARATOR)
    }

    fn write_string_value(&mut self, value: &str) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::String)?;
        self.write_quoted(value)
    }

    fn write_number_value<N: Into<Number64>>(&mut self, value: N) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::Number)?;
        number::write_number(&mut self.buffer, value.into())
    }

    fn write_bool_value(&mut self, value: bool) -> JsonWriteResult<()> {
        if value {
            self.begin_value(JsonTokenType::True)?;
            self.buffer.write_bytes(TRUE_LITERAL)
        } else {
            self.begin_value(JsonTokenType::False)?;
            self.buffer.write_bytes(FALSE_LITERAL)
        }
    }

    fn write_null_value(&mut self) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::Null)?;
        self.buffer.write_bytes(NULL_LITERAL)
    }

    fn write_int8_value(&mut self, value: i8) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::Int8)?;
        number::write_int8(&mut self.buffer, value)
    }

    fn write_int16_value(&mut self, value: i16) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::Int16)?;
        number::write_int16(&mut self.buffer, value)
    }

    fn write_int32_value(&mut self, value: i32) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::Int32)?;
        number::write_int32(&mut self.buffer, value)
    }

    fn write_int64_value(&mut self, value: i64) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::Int64)?;
        number::write_int64(&mut self.buffer, value)
    }

    fn write_uint32_value(&mut self, value: u32) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::UInt32)?;
        number::write_uint32(&mut self.buffer, value)
    }

    fn write_float32_value(&mut self, value: f32) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::Float32)?;
        number::write_float32(&mut self.buffer, value)
    }

    fn write_float64_value(&mut self, value: f64) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::Float64)?;
        number::write_float64(&mut self.buffer, value)
    }

    fn write_guid_value(&mut self, value: Uuid) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::Guid)?;
        number::write_guid(&mut self.buffer, value)
    }

    fn write_binary_value(&mut self, value: &[u8]) -> JsonWriteResult<()> {
        self.begin_value(JsonTokenType::Binary)?;
        number::write_binary(&mut self.buffer, value)
    }

    fn write_raw_json_token(
        &mut self,
        token_type: JsonTokenType,
        raw_json_token: &[u8],
    ) -> JsonWriteResult<()> {
        // 分隔符状态按声明的 token 类型推进，与对应的结构化写入一致
        match token_type {
            JsonTokenType::EndObject | JsonTokenType::EndArray => {
                self.register(token_type)?;
                self.buffer.write_bytes(raw_json_token)?;
                self.first_value = false;
            }
            JsonTokenType::BeginObject | JsonTokenType::BeginArray | JsonTokenType::FieldName => {
                self.begin_value(token_type)?;
                self.buffer.write_bytes(raw_json_token)?;
                self.first_value = true;
            }
            _ => {
                self.begin_value(token_type)?;
                self.buffer.write_bytes(raw_json_token)?;
            }
        }
        Ok(())
    }

    fn result(&self) -> &[u8] {
        self.buffer.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GrammarError;
    use crate::JsonWriteError;
    use proptest::prelude::*;

    fn text(writer: &JsonTextWriter) -> &str {
        std::str::from_utf8(writer.result()).unwrap()
    }

    #[test]
    fn test_single_field_object() {
        let mut w = JsonTextWriter::new();
        w.write_object_start().unwrap();
        w.write_field_name("a").unwrap();
        w.write_number_value(1).unwrap();
        w.write_object_end().unwrap();
        assert_eq!(text(&w), r#"{"a":1}"#);
    }

    #[test]
    fn test_number_array() {
        let mut w = JsonTextWriter::new();
        w.write_array_start().unwrap();
        w.write_number_value(1).unwrap();
        w.write_number_value(2).unwrap();
        w.write_array_end().unwrap();
        assert_eq!(text(&w), "[1,2]");
    }

    #[test]
    fn test_nested_document() {
        let mut w = JsonTextWriter::new();
        w.write_object_start().unwrap();
        w.write_field_name("id").unwrap();
        w.write_string_value("doc-1").unwrap();
        w.write_field_name("tags").unwrap();
        w.write_array_start().unwrap();
        w.write_string_value("x").unwrap();
        w.write_array_start().unwrap();
        w.write_array_end().unwrap();
        w.write_object_start().unwrap();
        w.write_object_end().unwrap();
        w.write_array_end().unwrap();
        w.write_field_name("ok").unwrap();
        w.write_bool_value(true).unwrap();
        w.write_field_name("gone").unwrap();
        w.write_null_value().unwrap();
        w.write_field_name("f").unwrap();
        w.write_bool_value(false).unwrap();
        w.write_object_end().unwrap();
        assert_eq!(
            text(&w),
            r#"{"id":"doc-1","tags":["x",[],{}],"ok":true,"gone":null,"f":false}"#
        );
        assert!(w.state().is_complete());
    }

    #[test]
    fn test_escaped_string_value() {
        let mut w = JsonTextWriter::new();
        w.write_string_value("a\"b\nc").unwrap();
        assert_eq!(text(&w), r#""a\"b\nc""#);
    }

    #[test]
    fn test_escaped_field_name() {
        let mut w = JsonTextWriter::new();
        w.write_object_start().unwrap();
        w.write_field_name("k\t/").unwrap();
        w.write_number_value(0).unwrap();
        w.write_object_end().unwrap();
        assert_eq!(text(&w), r#"{"k\t\/":0}"#);
    }

    #[test]
    fn test_field_name_twice_fails() {
        let mut w = JsonTextWriter::new();
        w.write_object_start().unwrap();
        w.write_field_name("a").unwrap();
        let err = w.write_field_name("b").unwrap_err();
        assert!(err.is_grammar_violation());
        assert!(matches!(
            err,
            JsonWriteError::Grammar(GrammarError::ValueExpected)
        ));
        // 失败的调用不写入任何字节
        assert_eq!(text(&w), r#"{"a":"#);
    }

    #[test]
    fn test_end_array_in_object_fails() {
        let mut w = JsonTextWriter::new();
        w.write_object_start().unwrap();
        let err = w.write_array_end().unwrap_err();
        assert!(matches!(
            err,
            JsonWriteError::Grammar(GrammarError::MismatchedScopeClose { .. })
        ));
        assert_eq!(text(&w), "{");
    }

    #[test]
    fn test_second_top_level_value_fails() {
        let mut w = JsonTextWriter::new();
        w.write_string_value("one").unwrap();
        let err = w.write_string_value("two").unwrap_err();
        assert!(matches!(
            err,
            JsonWriteError::Grammar(GrammarError::MultipleTopLevelValues)
        ));
    }

    #[test]
    fn test_non_finite_generic_numbers() {
        let mut w = JsonTextWriter::new();
        w.write_array_start().unwrap();
        w.write_number_value(f64::NAN).unwrap();
        w.write_number_value(f64::INFINITY).unwrap();
        w.write_number_value(f64::NEG_INFINITY).unwrap();
        w.write_array_end().unwrap();
        assert_eq!(text(&w), r#"["NaN","Infinity","-Infinity"]"#);
    }

    #[test]
    fn test_extended_types() {
        let mut w = JsonTextWriter::new();
        w.write_array_start().unwrap();
        w.write_int8_value(-3).unwrap();
        w.write_int16_value(300).unwrap();
        w.write_int32_value(70000).unwrap();
        w.write_int64_value(-5).unwrap();
        w.write_uint32_value(4_000_000_000).unwrap();
        w.write_float32_value(1.5).unwrap();
        w.write_float64_value(2.25).unwrap();
        w.write_guid_value(Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8))
            .unwrap();
        w.write_binary_value(&[1, 2, 3]).unwrap();
        w.write_array_end().unwrap();
        assert_eq!(
            text(&w),
            "[I-3,H300,L70000,LL-5,UL4000000000,S1.5,D2.25,\
             G67e55044-10b1-426f-9247-bb680e5fe0c8,BAQID]"
        );
    }

    #[test]
    fn test_raw_token_is_grammar_checked() {
        let mut w = JsonTextWriter::new();
        w.write_object_start().unwrap();
        let err = w
            .write_raw_json_token(JsonTokenType::RawValue, br#"{"x":1}"#)
            .unwrap_err();
        assert!(err.is_grammar_violation());

        w.write_field_name("inner").unwrap();
        w.write_raw_json_token(JsonTokenType::RawValue, br#"{"x":1}"#)
            .unwrap();
        w.write_field_name("n").unwrap();
        w.write_raw_json_token(JsonTokenType::Number, b"18446744073709551615")
            .unwrap();
        w.write_object_end().unwrap();
        assert_eq!(text(&w), r#"{"inner":{"x":1},"n":18446744073709551615}"#);
    }

    #[test]
    fn test_raw_structural_tokens_keep_separators() {
        let mut w = JsonTextWriter::new();
        w.write_raw_json_token(JsonTokenType::BeginObject, b"{").unwrap();
        w.write_field_name("a").unwrap();
        w.write_number_value(1).unwrap();
        w.write_raw_json_token(JsonTokenType::FieldName, br#""b":"#)
            .unwrap();
        w.write_raw_json_token(JsonTokenType::BeginArray, b"[").unwrap();
        w.write_number_value(2).unwrap();
        w.write_number_value(3).unwrap();
        w.write_raw_json_token(JsonTokenType::EndArray, b"]").unwrap();
        w.write_field_name("c").unwrap();
        w.write_null_value().unwrap();
        w.write_raw_json_token(JsonTokenType::EndObject, b"}").unwrap();
        assert_eq!(text(&w), r#"{"a":1,"b":[2,3],"c":null}"#);
        assert!(w.state().is_complete());
        let parsed: serde_json::Value = serde_json::from_slice(w.result()).unwrap();
        assert_eq!(parsed["b"][1], 3);
    }

    #[test]
    fn test_huge_initial_capacity() {
        let options = WriterOptions::new().with_initial_capacity(usize::MAX / 2);
        let err = JsonTextWriter::try_with_options(options.clone()).unwrap_err();
        assert!(matches!(err, JsonWriteError::BufferAllocation { .. }));

        let mut w = JsonTextWriter::with_options(options);
        w.write_array_start().unwrap();
        w.write_null_value().unwrap();
        w.write_array_end().unwrap();
        assert_eq!(text(&w), "[null]");
    }

    #[test]
    fn test_skip_validation_allows_malformed_output() {
        let mut w = JsonTextWriter::with_options(WriterOptions::trusted());
        w.write_object_end().unwrap();
        w.write_number_value(1).unwrap();
        w.write_number_value(2).unwrap();
        assert_eq!(text(&w), "},1,2");
        assert_eq!(w.current_depth(), 0);
    }

    #[test]
    fn test_small_initial_capacity_grows() {
        let mut w = JsonTextWriter::with_options(WriterOptions::new().with_initial_capacity(1));
        let long = "x".repeat(1000);
        w.write_string_value(&long).unwrap();
        assert_eq!(w.current_length(), 1002);
        assert_eq!(&w.result()[1..1001], long.as_bytes());
    }

    #[test]
    fn test_result_is_idempotent() {
        let mut w = JsonTextWriter::new();
        w.write_null_value().unwrap();
        let first = w.result().to_vec();
        assert_eq!(w.result(), &first[..]);
        assert_eq!(&w.into_bytes()[..], b"null");
    }

    #[derive(Debug, Clone)]
    enum Node {
        Null,
        Bool(bool),
        Int(i64),
        Float(f64),
        Str(String),
        Array(Vec<Node>),
        Object(Vec<(String, Node)>),
    }

    fn node_strategy() -> impl Strategy<Value = Node> {
        let leaf = prop_oneof![
            Just(Node::Null),
            any::<bool>().prop_map(Node::Bool),
            any::<i64>().prop_map(Node::Int),
            any::<f64>().prop_map(Node::Float),
            ".*".prop_map(Node::Str),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Node::Array),
                prop::collection::vec((".*", inner), 0..8).prop_map(Node::Object),
            ]
        })
    }

    fn emit(w: &mut JsonTextWriter, node: &Node) -> JsonWriteResult<()> {
        match node {
            Node::Null => w.write_null_value(),
            Node::Bool(b) => w.write_bool_value(*b),
            Node::Int(n) => w.write_number_value(*n),
            Node::Float(f) => w.write_number_value(*f),
            Node::Str(s) => w.write_string_value(s),
            Node::Array(items) => {
                w.write_array_start()?;
                for item in items {
                    emit(w, item)?;
                }
                w.write_array_end()
            }
            Node::Object(fields) => {
                w.write_object_start()?;
                for (name, value) in fields {
                    w.write_field_name(name)?;
                    emit(w, value)?;
                }
                w.write_object_end()
            }
        }
    }

    proptest! {
        #[test]
        fn prop_well_formed_sequences_parse(node in node_strategy()) {
            let mut w = JsonTextWriter::new();
            emit(&mut w, &node).unwrap();
            prop_assert!(w.state().is_complete());
            let parsed: Result<serde_json::Value, _> = serde_json::from_slice(w.result());
            prop_assert!(parsed.is_ok(), "unparseable output: {}", text(&w));
        }

        #[test]
        fn prop_skip_validation_never_fails(ops in prop::collection::vec(0u8..6, 0..32)) {
            let mut w = JsonTextWriter::with_options(WriterOptions::trusted());
            for op in ops {
                let result = match op {
                    0 => w.write_object_start(),
                    1 => w.write_object_end(),
                    2 => w.write_array_start(),
                    3 => w.write_array_end(),
                    4 => w.write_field_name("k"),
                    _ => w.write_number_value(7),
                };
                prop_assert!(result.is_ok());
            }
        }
    }
}
