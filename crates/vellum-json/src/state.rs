//! JSON 语法状态机
//!
//! 每次写入前登记 token 类型，违反嵌套/顺序规则时立即返回 [`GrammarError`]。
//! 跳过校验模式下不做任何检查。

use crate::spec::JsonTokenType;
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// 作用域类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Object,
    Array,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Object => write!(f, "object"),
            ScopeKind::Array => write!(f, "array"),
        }
    }
}

/// 作用域栈帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeFrame {
    pub kind: ScopeKind,
    pub values_written: usize,
}

impl ScopeFrame {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            values_written: 0,
        }
    }
}

/// 语法错误，每个变体对应一条被违反的规则
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("field name expected but value found")]
    FieldNameExpected,

    #[error("value expected but field name found")]
    ValueExpected,

    #[error("field name is only allowed inside an object")]
    FieldNameOutsideObject,

    #[error("object closed while a field value is pending")]
    MissingFieldValue,

    #[error("mismatched scope close: {close:?} cannot close an open {open}")]
    MismatchedScopeClose {
        open: ScopeKind,
        close: JsonTokenType,
    },

    #[error("no open scope for {close:?}")]
    NoOpenScope { close: JsonTokenType },

    #[error("multiple top-level values")]
    MultipleTopLevelValues,
}

/// 写入器的语法状态
///
/// 作用域栈为空表示位于顶层。
#[derive(Debug, Clone)]
pub struct JsonObjectState {
    skip_validation: bool,
    scopes: SmallVec<[ScopeFrame; 16]>,
    awaiting_value: bool,
    top_level_written: bool,
}

impl JsonObjectState {
    pub fn new(skip_validation: bool) -> Self {
        Self {
            skip_validation,
            scopes: SmallVec::new(),
            awaiting_value: false,
            top_level_written: false,
        }
    }

    pub fn skip_validation(&self) -> bool {
        self.skip_validation
    }

    /// 当前嵌套深度
    pub fn current_depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn in_object_context(&self) -> bool {
        matches!(self.scopes.last(), Some(frame) if frame.kind == ScopeKind::Object)
    }

    pub fn in_array_context(&self) -> bool {
        matches!(self.scopes.last(), Some(frame) if frame.kind == ScopeKind::Array)
    }

    /// 当前作用域已写入的值个数（对象中按字段值计），顶层返回 None
    pub fn values_in_current_scope(&self) -> Option<usize> {
        self.scopes.last().map(|frame| frame.values_written)
    }

    /// 是否正在等待字段值
    pub fn awaiting_value(&self) -> bool {
        self.awaiting_value
    }

    /// 顶层值已写完且所有作用域均已关闭
    pub fn is_complete(&self) -> bool {
        self.top_level_written && self.scopes.is_empty()
    }

    /// 登记即将写入的 token
    ///
    /// # Brief
    /// 按 JSON 语法检查 token 是否允许出现在当前位置，允许则更新状态
    ///
    /// # Arguments
    /// * `token` - 即将写入的 token 类型
    ///
    /// # Returns
    /// 合法返回 Ok(()), 否则返回对应的 GrammarError，状态保持不变
    pub fn register_token(&mut self, token: JsonTokenType) -> Result<(), GrammarError> {
        if self.skip_validation {
            return Ok(());
        }

        let result = match token {
            JsonTokenType::FieldName => self.register_field_name(),
            JsonTokenType::EndObject => self.register_scope_end(ScopeKind::Object, token),
            JsonTokenType::EndArray => self.register_scope_end(ScopeKind::Array, token),
            JsonTokenType::BeginObject => self.register_scope_start(ScopeKind::Object),
            JsonTokenType::BeginArray => self.register_scope_start(ScopeKind::Array),
            _ => self.register_value(),
        };

        if let Err(e) = &result {
            debug!(
                "Rejected {:?} at depth {}: {}",
                token,
                self.scopes.len(),
                e
            );
        }
        result
    }

    fn register_field_name(&mut self) -> Result<(), GrammarError> {
        match self.scopes.last() {
            Some(frame) if frame.kind == ScopeKind::Object => {
                if self.awaiting_value {
                    return Err(GrammarError::ValueExpected);
                }
                self.awaiting_value = true;
                Ok(())
            }
            _ => Err(GrammarError::FieldNameOutsideObject),
        }
    }

    fn check_value_position(&self) -> Result<(), GrammarError> {
        match self.scopes.last() {
            None if self.top_level_written => Err(GrammarError::MultipleTopLevelValues),
            Some(frame) if frame.kind == ScopeKind::Object && !self.awaiting_value => {
                Err(GrammarError::FieldNameExpected)
            }
            _ => Ok(()),
        }
    }

    /// 在当前作用域记一个完整的值
    fn complete_value(&mut self) {
        self.awaiting_value = false;
        match self.scopes.last_mut() {
            Some(frame) => frame.values_written += 1,
            None => self.top_level_written = true,
        }
    }

    fn register_value(&mut self) -> Result<(), GrammarError> {
        self.check_value_position()?;
        self.complete_value();
        Ok(())
    }

    fn register_scope_start(&mut self, kind: ScopeKind) -> Result<(), GrammarError> {
        self.check_value_position()?;
        self.awaiting_value = false;
        self.scopes.push(ScopeFrame::new(kind));
        Ok(())
    }

    fn register_scope_end(
        &mut self,
        kind: ScopeKind,
        token: JsonTokenType,
    ) -> Result<(), GrammarError> {
        match self.scopes.last() {
            None => Err(GrammarError::NoOpenScope { close: token }),
            Some(frame) if frame.kind != kind => Err(GrammarError::MismatchedScopeClose {
                open: frame.kind,
                close: token,
            }),
            Some(_) if self.awaiting_value => Err(GrammarError::MissingFieldValue),
            Some(_) => {
                self.scopes.pop();
                // 关闭的容器在父作用域中算作一个值
                self.complete_value();
                Ok(())
            }
        }
    }
}
