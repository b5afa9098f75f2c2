//! 记录（Record）与其静态元数据表
//!
//! 每个记录类型在编译期生成一份 `RecordModel`（通常由 `#[derive(Record)]` 生成），
//! 描述字段名与其身份角色（主键 / 版本键）。继承关系通过 `inherits` 指向其他
//! 静态模型表达，主键字段的查找会沿继承链合并。
//!
use crate::locator::DataSourceId;
use std::fmt;

/// 字段在记录身份中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// 主键字段：记录的逻辑身份
    Key,
    /// 版本键字段：同一逻辑记录的某个版本
    VersionKey,
}

/// 单个字段的元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldModel {
    pub name: &'static str,
    pub role: Option<KeyRole>,
}

impl FieldModel {
    pub const fn plain(name: &'static str) -> Self {
        Self { name, role: None }
    }

    pub const fn key(name: &'static str) -> Self {
        Self {
            name,
            role: Some(KeyRole::Key),
        }
    }

    pub const fn version_key(name: &'static str) -> Self {
        Self {
            name,
            role: Some(KeyRole::VersionKey),
        }
    }
}

/// 记录类型的静态元数据表
#[derive(Debug)]
pub struct RecordModel {
    /// 序列化类型名（类型解析器以此往返）
    pub type_name: &'static str,
    /// 自身声明的字段，顺序即主键序列化顺序
    pub fields: &'static [FieldModel],
    /// 继承的模型，其 key / version key 标记对本类型同样生效
    pub inherits: &'static [&'static RecordModel],
}

/// 多版本记录的通用模型：以 `VersionId` 作为版本键
pub static VERSIONED: RecordModel = RecordModel {
    type_name: "Versioned",
    fields: &[FieldModel::version_key("VersionId")],
    inherits: &[],
};

impl RecordModel {
    /// 主键字段名（包含继承），自身在前，继承链深度优先，去重
    pub fn key_field_names(&self) -> Vec<&'static str> {
        self.field_names_with(KeyRole::Key)
    }

    /// 版本键字段名（包含继承）
    pub fn version_key_field_names(&self) -> Vec<&'static str> {
        self.field_names_with(KeyRole::VersionKey)
    }

    pub fn is_versioned(&self) -> bool {
        !self.version_key_field_names().is_empty()
    }

    /// 字段角色：自身带标记的声明优先，其次沿继承链查找
    pub fn role_of(&self, name: &str) -> Option<KeyRole> {
        self.fields
            .iter()
            .find(|f| f.name == name && f.role.is_some())
            .and_then(|f| f.role)
            .or_else(|| self.inherits.iter().find_map(|m| m.role_of(name)))
    }

    pub fn field_names_with(&self, role: KeyRole) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.collect_role(role, &mut out);
        out
    }

    fn collect_role(&self, role: KeyRole, out: &mut Vec<&'static str>) {
        for f in self.fields.iter().filter(|f| f.role == Some(role)) {
            if !out.contains(&f.name) {
                out.push(f.name);
            }
        }
        for parent in self.inherits {
            parent.collect_role(role, out);
        }
    }
}

impl PartialEq for RecordModel {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

impl Eq for RecordModel {}

/// 数据记录抽象（对象安全，可作为 `Arc<dyn Record>` 在协作者之间传递）
pub trait Record: Send + Sync + fmt::Debug {
    /// 具体类型的元数据表
    fn model(&self) -> &'static RecordModel;

    /// 记录自身携带的定位符；尚未持久化的记录可能没有
    fn data_source_id(&self) -> Option<&DataSourceId>;

    /// 按字段名取值（字符串化），未知字段返回 `None`
    fn field_value(&self, name: &str) -> Option<String>;
}

/// 可注册到类型解析器的具体记录类型
pub trait RecordType: Record + Sized {
    fn record_model() -> &'static RecordModel;
}

/// 定位符字段的统一访问，允许记录以 `DataSourceId` 或 `Option<DataSourceId>` 持有
pub trait LocatorField {
    fn as_locator(&self) -> Option<&DataSourceId>;
}

impl LocatorField for DataSourceId {
    fn as_locator(&self) -> Option<&DataSourceId> {
        Some(self)
    }
}

impl LocatorField for Option<DataSourceId> {
    fn as_locator(&self) -> Option<&DataSourceId> {
        self.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_token_macros::Record;

    static AUDITED: RecordModel = RecordModel {
        type_name: "Audited",
        fields: &[FieldModel::key("TenantId")],
        inherits: &[&VERSIONED],
    };

    #[derive(Debug, Default, Record)]
    #[record(name = "Composite.Data.Types.IPage", extends(AUDITED))]
    struct Page {
        #[record(locator)]
        data_source_id: Option<DataSourceId>,
        #[record(key, rename = "Id")]
        id: String,
        #[record(rename = "TenantId")]
        tenant_id: u32,
        #[record(rename = "VersionId")]
        version_id: String,
        title: String,
        #[record(skip)]
        tags: Vec<String>,
    }

    #[derive(Debug, Default, Record)]
    struct Note {
        #[record(locator)]
        data_source_id: DataSourceId,
        #[record(key)]
        id: u64,
    }

    // 自身主键在前，继承的主键在后
    #[test]
    fn key_fields_include_inherited_tags() {
        let model = Page::record_model();
        assert_eq!(model.type_name, "Composite.Data.Types.IPage");
        assert_eq!(model.key_field_names(), vec!["Id", "TenantId"]);
        assert_eq!(model.version_key_field_names(), vec!["VersionId"]);
        assert!(model.is_versioned());
        assert_eq!(model.role_of("VersionId"), Some(KeyRole::VersionKey));
        assert_eq!(model.role_of("title"), None);
    }

    #[test]
    fn default_type_name_and_unversioned_model() {
        let model = Note::record_model();
        assert_eq!(model.type_name, "Note");
        assert_eq!(model.key_field_names(), vec!["id"]);
        assert!(model.version_key_field_names().is_empty());
        assert!(!model.is_versioned());
    }

    #[test]
    fn field_values_are_stringified_and_skip_is_honoured() {
        let page = Page {
            id: "p-1".into(),
            tenant_id: 7,
            title: "home".into(),
            tags: vec!["a".into()],
            ..Default::default()
        };
        assert_eq!(page.field_value("Id").as_deref(), Some("p-1"));
        assert_eq!(page.field_value("TenantId").as_deref(), Some("7"));
        assert_eq!(page.field_value("title").as_deref(), Some("home"));
        assert_eq!(page.field_value("tags"), None);
        assert_eq!(page.field_value("id"), None);
        assert!(page.data_source_id().is_none());

        let note = Note::default();
        assert!(note.data_source_id().is_some());
    }

    #[test]
    fn record_is_object_safe() {
        let items: Vec<Box<dyn Record>> = vec![Box::new(Page::default()), Box::new(Note::default())];
        let names: Vec<_> = items.iter().map(|r| r.model().type_name).collect();
        assert_eq!(names, vec!["Composite.Data.Types.IPage", "Note"]);
    }
}
