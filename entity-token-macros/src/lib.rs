//! entity-token 的过程宏
//!
//! - `#[derive(Record)]`：为记录类型生成静态的字段元数据表（key / version key 标记）
//!   与对象安全的 `Record` 实现；
//! - `#[value_object]`：为定位符的小型组成值补齐常用派生。
//!
use proc_macro::TokenStream;

mod record;
mod utils;
mod value_object;

/// 记录派生宏
///
/// ```ignore
/// #[derive(Record)]
/// #[record(name = "Composite.Data.Types.IPage", extends(VERSIONED))]
/// struct Page {
///     #[record(locator)]
///     data_source_id: Option<DataSourceId>,
///     #[record(key, rename = "Id")]
///     id: uuid::Uuid,
///     #[record(rename = "VersionId")]
///     version_id: uuid::Uuid,
///     title: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record(input: TokenStream) -> TokenStream {
    record::expand(input)
}

/// 值对象宏
/// - 合并/追加派生：Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq, Hash
/// - 参数：`#[value_object(debug = false)]`、`#[value_object(hash = false)]`
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}
