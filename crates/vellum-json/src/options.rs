use crate::spec::DEFAULT_INITIAL_CAPACITY;
use serde::{Deserialize, Serialize};

/// 序列化格式
///
/// 写入器变体是封闭集合，构造时选定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SerializationFormat {
    #[default]
    Text,
}

/// 写入器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// 跳过语法校验，供可信的高吞吐调用方使用
    pub skip_validation: bool,
    /// 缓冲区初始容量
    pub initial_capacity: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            skip_validation: false,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 跳过校验的配置
    pub fn trusted() -> Self {
        Self::default().with_skip_validation(true)
    }

    pub fn with_skip_validation(mut self, skip_validation: bool) -> Self {
        self.skip_validation = skip_validation;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}
