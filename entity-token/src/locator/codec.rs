use crate::error::{DataError, DataResult};
use crate::locator::DataSourceId;
use std::sync::Arc;

/// 定位符编解码器
pub trait LocatorCodec: Send + Sync {
    fn serialize(&self, locator: &DataSourceId) -> DataResult<String>;

    /// 解析失败返回 `DataError::MalformedLocator`
    fn deserialize(&self, serialized: &str) -> DataResult<DataSourceId>;
}

impl<T> LocatorCodec for Arc<T>
where
    T: LocatorCodec + ?Sized,
{
    fn serialize(&self, locator: &DataSourceId) -> DataResult<String> {
        (**self).serialize(locator)
    }

    fn deserialize(&self, serialized: &str) -> DataResult<DataSourceId> {
        (**self).deserialize(serialized)
    }
}

/// JSON 定位符编解码器
///
/// 形如 `{"provider":"sql","type":"Page","id":{"Id":"42"}}`；
/// `scope` 为 public 时省略，`locale` 缺省时省略。
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLocatorCodec;

impl LocatorCodec for JsonLocatorCodec {
    fn serialize(&self, locator: &DataSourceId) -> DataResult<String> {
        Ok(serde_json::to_string(locator)?)
    }

    fn deserialize(&self, serialized: &str) -> DataResult<DataSourceId> {
        let locator: DataSourceId = serde_json::from_str(serialized)
            .map_err(|e| DataError::malformed(format!("{e}: {serialized:?}")))?;

        if locator.provider_name().is_empty() {
            return Err(DataError::malformed("empty provider name"));
        }
        if locator.type_name().is_empty() {
            return Err(DataError::malformed("empty type name"));
        }

        Ok(locator)
    }
}
