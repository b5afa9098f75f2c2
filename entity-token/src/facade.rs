//! 数据门面（data facade）
//!
//! 令牌按定位符从数据门面取回实时记录。`Ok(None)` 表示记录不存在，
//! `Err` 表示门面自身失败；两者在令牌层都会折叠为无效状态，但可区分观察。
//!
use crate::error::{DataError, DataResult};
use crate::locator::DataSourceId;
use crate::record::Record;
use dashmap::DashMap;
use std::sync::Arc;

/// 数据门面
pub trait DataFacade: Send + Sync {
    fn fetch(&self, locator: &DataSourceId) -> DataResult<Option<Arc<dyn Record>>>;
}

impl<T> DataFacade for Arc<T>
where
    T: DataFacade + ?Sized,
{
    fn fetch(&self, locator: &DataSourceId) -> DataResult<Option<Arc<dyn Record>>> {
        (**self).fetch(locator)
    }
}

/// 基于内存的数据门面，以记录自身的定位符为键
#[derive(Default)]
pub struct InMemoryDataFacade {
    records: DashMap<DataSourceId, Arc<dyn Record>>,
}

impl InMemoryDataFacade {
    pub fn new() -> Self {
        Self::default()
    }

    /// 存入记录；记录必须携带定位符，同一定位符的旧记录被替换
    pub fn insert(&self, record: Arc<dyn Record>) -> DataResult<()> {
        let locator = record
            .data_source_id()
            .cloned()
            .ok_or_else(|| DataError::InvalidArgument {
                reason: format!(
                    "record of type {} has no data source id",
                    record.model().type_name
                ),
            })?;
        self.records.insert(locator, record);
        Ok(())
    }

    pub fn remove(&self, locator: &DataSourceId) -> Option<Arc<dyn Record>> {
        self.records.remove(locator).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DataFacade for InMemoryDataFacade {
    fn fetch(&self, locator: &DataSourceId) -> DataResult<Option<Arc<dyn Record>>> {
        Ok(self.records.get(locator).map(|e| Arc::clone(e.value())))
    }
}
