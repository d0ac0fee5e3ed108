//! # Vellum JSON - 带扩展类型标记的流式 JSON 文本写入器
//!
//! Vellum 文档数据库客户端使用该 crate 将查询结果、文档以及编译后的查询文本
//! 输出到单个可增长的字节缓冲区中。
//!
//! - **语法校验**：基于作用域栈的状态机，调用顺序错误时立即失败
//! - **预留式写入**：每种 token 写入前按最坏长度预留空间，摊销 O(1) 追加
//! - **扩展类型**：Int8/16/32/64、UInt32、Float32/64、Guid、Binary 通过前缀标记写出
//! - **快速转义**：字符串无需转义时直接拷贝，不产生中间分配
//!
//! ## 快速开始
//!
//! ```rust,ignore
//! use vellum_json::{create_writer, JsonWriter, SerializationFormat, WriterOptions};
//!
//! let mut writer = create_writer(SerializationFormat::Text, WriterOptions::default());
//! writer.write_object_start()?;
//! writer.write_field_name("a")?;
//! writer.write_number_value(1)?;
//! writer.write_object_end()?;
//!
//! assert_eq!(writer.result(), br#"{"a":1}"#);
//! ```
//!
//! ## 扩展类型前缀
//!
//! | 类型 | 前缀 | 示例 |
//! |---|---|---|
//! | Int8 | `I` | `I-3` |
//! | Int16 | `H` | `H300` |
//! | Int32 | `L` | `L70000` |
//! | Int64 | `LL` | `LL-5` |
//! | UInt32 | `UL` | `UL4000000000` |
//! | Float32 | `S` | `S1.5` |
//! | Float64 | `D` | `D2.25` |
//! | Guid | `G` | `G67e55044-10b1-426f-9247-bb680e5fe0c8` |
//! | Binary | `B` | `BAQID` |

pub mod buffer;
pub mod escape;
pub mod json;
pub mod number;
pub mod options;
pub mod ser;
pub mod spec;
pub mod state;
pub mod writer;

pub use buffer::GrowableBuffer;
pub use json::{to_json_bytes, write_json_value};
pub use number::Number64;
pub use options::{SerializationFormat, WriterOptions};
pub use ser::{to_string, to_vec};
pub use spec::JsonTokenType;
pub use state::{GrammarError, JsonObjectState, ScopeFrame, ScopeKind};
pub use writer::{create_writer, FormatWriter, JsonTextWriter, JsonWriter};

use std::collections::TryReserveError;
use thiserror::Error;

/// 写入器错误类型
///
/// 涵盖语法校验、缓冲区分配、格式化以及 serde 桥接过程中可能出现的所有错误
#[derive(Error, Debug)]
pub enum JsonWriteError {
    /// 调用顺序违反 JSON 语法，写入器状态不会回滚，应当丢弃该写入器
    #[error("Grammar violation: {0}")]
    Grammar(#[from] GrammarError),

    /// 缓冲区扩容失败（内存不足或长度溢出），不可恢复
    #[error("Buffer allocation failed: requested {requested} bytes")]
    BufferAllocation {
        requested: usize,
        #[source]
        source: Option<TryReserveError>,
    },

    /// 格式化结果超出预留长度，属于内部不变量被破坏
    #[error("Failed to format {kind:?}: needed {needed} bytes, reserved {reserved}")]
    Formatting {
        kind: JsonTokenType,
        needed: usize,
        reserved: usize,
    },

    /// serde 序列化过程错误
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl JsonWriteError {
    /// 是否为语法错误
    pub fn is_grammar_violation(&self) -> bool {
        matches!(self, JsonWriteError::Grammar(_))
    }
}

/// 写入操作的 Result 类型别名
pub type JsonWriteResult<T> = Result<T, JsonWriteError>;
