use crate::error::DataResult;
use crate::locator::DataId;
use crate::record::Record;
use bon::Builder;
use entity_token_macros::value_object;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 记录所处的数据作用域
#[value_object]
#[derive(Copy)]
#[serde(rename_all = "lowercase")]
pub enum DataScope {
    /// 已发布数据
    #[default]
    Public,
    /// 管理端（未发布）数据
    Administrated,
}

impl DataScope {
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}

impl fmt::Display for DataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Administrated => f.write_str("administrated"),
        }
    }
}

/// 定位符：在数据门面中唯一寻址一条记录
///
/// 由提供者名、接口类型名、主键值及数据作用域 / 区域组成。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Builder, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSourceId {
    #[builder(into)]
    #[serde(rename = "provider")]
    provider_name: String,
    #[builder(into)]
    #[serde(rename = "type")]
    type_name: String,
    #[serde(rename = "id")]
    data_id: DataId,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "DataScope::is_public")]
    scope: DataScope,
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
}

impl DataSourceId {
    /// 为记录构建定位符，类型名取自记录的元数据表
    pub fn for_record(provider_name: impl Into<String>, record: &dyn Record) -> DataResult<Self> {
        Ok(Self {
            provider_name: provider_name.into(),
            type_name: record.model().type_name.to_string(),
            data_id: DataId::for_record(record)?,
            scope: DataScope::default(),
            locale: None,
        })
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn data_id(&self) -> &DataId {
        &self.data_id
    }

    pub fn scope(&self) -> DataScope {
        self.scope
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn with_scope(mut self, scope: DataScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}
