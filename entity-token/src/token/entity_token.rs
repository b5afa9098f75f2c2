use crate::error::DataResult;
use crate::token::PrettyRenderer;

/// 实体令牌契约
///
/// 描述一个可设置安全策略、可被导航的制品。解析失败（记录缺失、类型未知）
/// 以 `is_valid() == false` 表达；只有定位符损坏与在无效令牌上求主键会返回错误。
pub trait EntityToken: Send + Sync {
    /// 令牌种类，用于序列化信封
    fn kind(&self) -> &'static str;

    /// 序列化的接口类型名
    fn token_type(&self) -> DataResult<&str>;

    /// 提供者 / 来源名
    fn source(&self) -> DataResult<&str>;

    /// 序列化的主键值
    fn id(&self) -> DataResult<&str>;

    /// 序列化的版本键值，无版本时为空串
    fn version_id(&self) -> DataResult<&str>;

    fn is_valid(&self) -> bool;

    fn serialize(&self) -> DataResult<&str>;

    /// 向渲染器写入人类可读的令牌明细
    fn write_pretty(&self, renderer: &mut dyn PrettyRenderer);
}
