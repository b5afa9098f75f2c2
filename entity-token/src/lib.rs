//! 数据实体令牌基础库（entity-token）
//!
//! 提供数据记录与其稳定、可序列化的身份句柄之间的映射：
//! - 记录（`record`）与其静态字段元数据表（主键 / 版本键标记）
//! - 定位符（`locator`）：提供者 + 接口类型 + 主键值，及其编解码
//! - 类型解析（`resolver`）与数据门面（`facade`）两个外部协作者契约及内存实现
//! - 令牌（`token`）：由实时记录或序列化定位符构造，惰性解析并缓存派生属性
//!
//! 本 crate 不负责持久化、渲染与工作流执行，只消费协作者契约，
//! 以便在不同的数据层与安全子系统上进行适配。
//!
//! 典型用法：
//! 1. 使用 `#[derive(Record)]` 定义记录类型，并注册到 `TypeRegistry`；
//! 2. 组装 `DataContext`（类型解析器、定位符编解码器、数据门面）；
//! 3. `DataEntityToken::from_record` 或 `DataEntityToken::deserialize` 构造令牌；
//! 4. 经由 `EntityToken` 读取类型、来源、主键与版本键，或检查 `is_valid()`。
//!
pub mod context;
pub mod error;
pub mod facade;
pub mod locator;
pub mod record;
pub mod resolver;
pub mod token;

#[cfg(feature = "macros")]
pub use entity_token_macros::{Record, value_object};

// 允许在本 crate 内部通过 ::entity_token 进行自引用，
// 以便派生宏在本 crate 的单元测试中也能解析到 ::entity_token 路径。
extern crate self as entity_token;
