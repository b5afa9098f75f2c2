//! 数据令牌层统一错误定义
//!
//! 覆盖构造校验、定位符解析、前置条件、协作者失败与序列化等最小必要集合。
//! 解析失败之外的“解析不到”（记录已删除、类型未知）不以错误表达，
//! 而是折叠为令牌的无效状态，调用方通过 `is_valid()` 检查。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DataError {
    // --- 构造/前置条件 ---
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    // --- 定位符 ---
    #[error("malformed locator: {reason}")]
    MalformedLocator { reason: String },

    // --- 协作者 ---
    #[error("data facade error: {reason}")]
    Facade { reason: String },
    #[error("type already registered: {type_name}")]
    AlreadyRegistered { type_name: String },
    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch { expected: String, found: String },

    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

/// 统一 Result 类型别名
pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedLocator {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }
}
