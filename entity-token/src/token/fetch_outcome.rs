use crate::error::DataError;
use crate::record::Record;
use std::sync::Arc;

/// 惰性取数的结果
///
/// 令牌对外只暴露“有效 / 无效”，其余三种失败在 `data()` 中都表现为 `None`。
#[derive(Debug)]
pub enum FetchOutcome {
    Found(Arc<dyn Record>),
    /// 门面返回记录不存在（例如已被删除）
    NotFound,
    /// 序列化定位符无法解析
    Malformed(DataError),
    /// 门面自身失败
    Failed(DataError),
}

impl FetchOutcome {
    pub fn record(&self) -> Option<&Arc<dyn Record>> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn error(&self) -> Option<&DataError> {
        match self {
            Self::Malformed(err) | Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}
