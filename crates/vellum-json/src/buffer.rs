//! 可增长写入缓冲区
//!
//! 显式维护 存储区 / 容量 / 写入位置 三元组。所有写入先调用
//! [`GrowableBuffer::ensure_remaining`] 预留空间，之后的下标访问都落在已预留范围内。

use crate::spec::JsonTokenType;
use crate::{JsonWriteError, JsonWriteResult};
use bytes::Bytes;
use tracing::{debug, trace};

/// 可增长字节缓冲区
///
/// `storage.len()` 即容量，`[0, position)` 为已写入内容。
#[derive(Debug, Clone)]
pub struct GrowableBuffer {
    storage: Vec<u8>,
    position: usize,
}

impl GrowableBuffer {
    /// 创建指定初始容量的缓冲区
    ///
    /// # Brief
    /// 初始容量只是提示：预分配失败时退化为空缓冲区，首次写入时再按需扩容
    ///
    /// # Arguments
    /// * `capacity` - 初始容量（字节）
    ///
    /// # Returns
    /// 新的 GrowableBuffer 实例
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|e| {
            debug!("Initial capacity {} rejected, allocating lazily: {}", capacity, e);
            Self {
                storage: Vec::new(),
                position: 0,
            }
        })
    }

    /// 创建指定初始容量的缓冲区，预分配失败时返回错误
    ///
    /// # Arguments
    /// * `capacity` - 初始容量（字节）
    ///
    /// # Returns
    /// 成功返回 GrowableBuffer, 内存分配失败返回 `BufferAllocation`
    pub fn try_with_capacity(capacity: usize) -> JsonWriteResult<Self> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|e| JsonWriteError::BufferAllocation {
                requested: capacity,
                source: Some(e),
            })?;
        storage.resize(capacity, 0);
        Ok(Self {
            storage,
            position: 0,
        })
    }

    /// 当前写入位置
    pub fn position(&self) -> usize {
        self.position
    }

    /// 当前容量
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// 剩余可写空间
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.position
    }

    /// 确保剩余空间不少于 `n` 字节
    ///
    /// # Brief
    /// 空间不足时扩容到 `max(2 * capacity, position + n)`，摊销 O(1)
    ///
    /// # Arguments
    /// * `n` - 需要的剩余字节数
    ///
    /// # Returns
    /// 成功返回 Ok(()), 长度溢出或内存分配失败返回 `BufferAllocation`
    pub fn ensure_remaining(&mut self, n: usize) -> JsonWriteResult<()> {
        if self.remaining() >= n {
            return Ok(());
        }

        let required = self
            .position
            .checked_add(n)
            .ok_or(JsonWriteError::BufferAllocation {
                requested: usize::MAX,
                source: None,
            })?;
        let new_capacity = self.capacity().saturating_mul(2).max(required);

        self.storage
            .try_reserve_exact(new_capacity - self.storage.len())
            .map_err(|e| {
                debug!("Buffer growth to {} bytes failed: {}", new_capacity, e);
                JsonWriteError::BufferAllocation {
                    requested: new_capacity,
                    source: Some(e),
                }
            })?;
        trace!(
            "Growing buffer from {} to {} bytes",
            self.storage.len(),
            new_capacity
        );
        self.storage.resize(new_capacity, 0);
        Ok(())
    }

    /// 写入单个字节
    pub fn write_byte(&mut self, byte: u8) -> JsonWriteResult<()> {
        self.ensure_remaining(1)?;
        self.storage[self.position] = byte;
        self.position += 1;
        Ok(())
    }

    /// 写入字节切片
    pub fn write_bytes(&mut self, bytes: &[u8]) -> JsonWriteResult<()> {
        self.ensure_remaining(bytes.len())?;
        let end = self.position + bytes.len();
        self.storage[self.position..end].copy_from_slice(bytes);
        self.position = end;
        Ok(())
    }

    /// 按预留长度写入格式化结果
    ///
    /// # Brief
    /// 先预留 `reserve` 字节，格式化结果超过预留长度视为内部错误
    ///
    /// # Arguments
    /// * `kind` - 正在写入的 token 类型（仅用于错误信息）
    /// * `reserve` - 该类型的最坏长度
    /// * `formatted` - 已格式化的字节
    ///
    /// # Returns
    /// 成功返回 Ok(()), 超出预留返回 `Formatting`
    pub fn write_formatted(
        &mut self,
        kind: JsonTokenType,
        reserve: usize,
        formatted: &[u8],
    ) -> JsonWriteResult<()> {
        self.ensure_remaining(reserve)?;
        if formatted.len() > reserve {
            debug!(
                "Formatted {:?} needs {} bytes, only {} reserved",
                kind,
                formatted.len(),
                reserve
            );
            return Err(JsonWriteError::Formatting {
                kind,
                needed: formatted.len(),
                reserved: reserve,
            });
        }
        let end = self.position + formatted.len();
        self.storage[self.position..end].copy_from_slice(formatted);
        self.position = end;
        Ok(())
    }

    /// 未写入区域，需先调用 `ensure_remaining`
    pub(crate) fn cursor(&mut self) -> &mut [u8] {
        &mut self.storage[self.position..]
    }

    /// 在 `cursor()` 中写入 `n` 字节后推进位置
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining());
        self.position = (self.position + n).min(self.storage.len());
    }

    /// 已写入内容 `[0, position)` 的只读视图
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.position]
    }

    /// 冻结缓冲区，返回不可变的 `Bytes`
    pub fn into_bytes(mut self) -> Bytes {
        self.storage.truncate(self.position);
        Bytes::from(self.storage)
    }
}

impl Default for GrowableBuffer {
    fn default() -> Self {
        Self::with_capacity(crate::spec::DEFAULT_INITIAL_CAPACITY)
    }
}
