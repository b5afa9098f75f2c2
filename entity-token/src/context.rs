use crate::facade::DataFacade;
use crate::locator::{JsonLocatorCodec, LocatorCodec};
use crate::resolver::TypeResolver;
use bon::Builder;
use std::fmt;
use std::sync::Arc;

/// 令牌解析上下文
///
/// 承载令牌惰性解析所需的三个外部协作者：
/// - 类型解析器（`TypeResolver`）：接口类型与序列化类型名互转；
/// - 定位符编解码器（`LocatorCodec`）：缺省为 `JsonLocatorCodec`；
/// - 数据门面（`DataFacade`）：按定位符取回实时记录。
///
/// 典型用法：
/// ```rust
/// use entity_token::context::DataContext;
/// use entity_token::facade::InMemoryDataFacade;
/// use entity_token::resolver::TypeRegistry;
/// use std::sync::Arc;
///
/// let ctx = DataContext::builder()
///     .type_resolver(Arc::new(TypeRegistry::new()))
///     .facade(Arc::new(InMemoryDataFacade::new()))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct DataContext {
    type_resolver: Arc<dyn TypeResolver>,
    #[builder(default = Arc::new(JsonLocatorCodec) as Arc<dyn LocatorCodec>)]
    codec: Arc<dyn LocatorCodec>,
    facade: Arc<dyn DataFacade>,
}

impl DataContext {
    pub fn type_resolver(&self) -> &dyn TypeResolver {
        self.type_resolver.as_ref()
    }

    pub fn codec(&self) -> &dyn LocatorCodec {
        self.codec.as_ref()
    }

    pub fn facade(&self) -> &dyn DataFacade {
        self.facade.as_ref()
    }
}

impl fmt::Debug for DataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataContext").finish_non_exhaustive()
    }
}
