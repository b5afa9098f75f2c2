//! 类型解析（type resolver）
//!
//! 在接口类型句柄与其序列化类型名之间往返。`TypeRegistry` 为默认的内存实现，
//! 记录类型在注册时带入其静态元数据表。
//!
use crate::error::{DataError, DataResult};
use crate::record::{RecordModel, RecordType};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

/// 已解析的接口类型句柄
#[derive(Clone, Copy)]
pub struct InterfaceType(&'static RecordModel);

impl InterfaceType {
    pub fn of<T: RecordType>() -> Self {
        Self(T::record_model())
    }

    pub fn from_model(model: &'static RecordModel) -> Self {
        Self(model)
    }

    pub fn name(&self) -> &'static str {
        self.0.type_name
    }

    pub fn model(&self) -> &'static RecordModel {
        self.0
    }
}

impl PartialEq for InterfaceType {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for InterfaceType {}

impl Hash for InterfaceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Debug for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InterfaceType").field(&self.name()).finish()
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 类型解析器
pub trait TypeResolver: Send + Sync {
    fn serialize_type(&self, ty: InterfaceType) -> String;

    /// 无法解析时返回 `None`，调用方将其视为“未知类型”
    fn try_resolve(&self, serialized: &str) -> Option<InterfaceType>;
}

impl<T> TypeResolver for Arc<T>
where
    T: TypeResolver + ?Sized,
{
    fn serialize_type(&self, ty: InterfaceType) -> String {
        (**self).serialize_type(ty)
    }

    fn try_resolve(&self, serialized: &str) -> Option<InterfaceType> {
        (**self).try_resolve(serialized)
    }
}

/// 基于内存的类型注册表
/// - 以序列化类型名为键
/// - 重复注册同名类型返回 `AlreadyRegistered`
#[derive(Default)]
pub struct TypeRegistry {
    types: DashMap<String, InterfaceType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册记录类型
    pub fn register<T: RecordType>(&self) -> DataResult<InterfaceType> {
        self.register_model(T::record_model())
    }

    pub fn register_model(&self, model: &'static RecordModel) -> DataResult<InterfaceType> {
        let ty = InterfaceType::from_model(model);

        match self.types.entry(model.type_name.to_string()) {
            Entry::Occupied(_) => Err(DataError::AlreadyRegistered {
                type_name: model.type_name.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(ty);
                debug!(
                    type_name = model.type_name,
                    keys = ?model.key_field_names(),
                    version_keys = ?model.version_key_field_names(),
                    "Register record type"
                );
                Ok(ty)
            }
        }
    }

    /// 已注册的类型名列表（只读视图）
    pub fn registered_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.types.iter().map(|e| e.value().name()).collect();
        names.sort_unstable();
        names
    }
}

impl TypeResolver for TypeRegistry {
    fn serialize_type(&self, ty: InterfaceType) -> String {
        ty.name().to_string()
    }

    fn try_resolve(&self, serialized: &str) -> Option<InterfaceType> {
        self.types.get(serialized).map(|e| *e.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::DataSourceId;
    use entity_token_macros::Record;

    #[derive(Debug, Default, Record)]
    #[record(name = "Composite.Data.Types.IPage")]
    struct Page {
        #[record(locator)]
        data_source_id: Option<DataSourceId>,
        #[record(key)]
        id: u32,
    }

    #[derive(Debug, Default, Record)]
    struct Media {
        #[record(locator)]
        data_source_id: Option<DataSourceId>,
        #[record(key)]
        id: u32,
    }

    #[test]
    fn register_and_resolve() {
        let registry = TypeRegistry::new();
        let page = registry.register::<Page>().unwrap();
        registry.register::<Media>().unwrap();

        assert_eq!(page, InterfaceType::of::<Page>());
        assert_eq!(registry.serialize_type(page), "Composite.Data.Types.IPage");
        assert_eq!(
            registry.try_resolve("Composite.Data.Types.IPage"),
            Some(page)
        );
        assert_eq!(registry.try_resolve("Unknown"), None);
        assert_eq!(
            registry.registered_types(),
            vec!["Composite.Data.Types.IPage", "Media"]
        );
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = TypeRegistry::new();
        registry.register::<Page>().unwrap();
        let err = registry.register::<Page>().unwrap_err();
        match err {
            DataError::AlreadyRegistered { type_name } => {
                assert_eq!(type_name, "Composite.Data.Types.IPage")
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
