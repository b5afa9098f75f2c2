//! 实体令牌（entity token）
//!
//! 令牌是安全与导航子系统使用的稳定、可序列化的记录句柄：
//! - `EntityToken`：令牌的公共契约（类型、来源、主键、版本键、有效性、序列化、美化输出）；
//! - `DataEntityToken`：指向数据记录的令牌，由实时记录或序列化定位符构造，其余属性惰性求值并缓存；
//! - `FetchOutcome`：惰性取数的结果，区分“不存在”“定位符损坏”与“门面失败”；
//! - `SerializedEntityToken`：携带令牌种类的序列化信封，便于多态存储；
//! - `PrettyRenderer`：诊断/审计展示用的渲染钩子。
//!
mod data_entity_token;
mod entity_token;
mod fetch_outcome;
mod pretty;
mod serialized_token;

pub use data_entity_token::DataEntityToken;
pub use entity_token::EntityToken;
pub use fetch_outcome::FetchOutcome;
pub use pretty::{PrettyRenderer, TextRenderer};
pub use serialized_token::SerializedEntityToken;
