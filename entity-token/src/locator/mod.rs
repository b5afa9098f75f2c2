//! 定位符（locator）
//!
//! `DataSourceId` 由提供者名、接口类型名与主键值（`DataId`）组成，唯一寻址数据门面中的一条记录；
//! `LocatorCodec` 负责其与字符串之间的往返，默认实现为稳定字段顺序的 JSON。
//!
mod codec;
mod data_id;
mod data_source_id;

pub use codec::{JsonLocatorCodec, LocatorCodec};
pub use data_id::DataId;
pub use data_source_id::{DataScope, DataSourceId};
