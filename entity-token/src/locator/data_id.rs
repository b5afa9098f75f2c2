use crate::error::{DataError, DataResult};
use crate::record::Record;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 记录的身份值：按主键顺序排列的 (字段名, 字段值) 列表
///
/// 以 JSON 对象序列化，保持插入顺序，从而保证同一记录的序列化结果稳定。
/// 相等与哈希与字段顺序无关：字段名唯一，同名同值即同一身份。
#[derive(Debug, Clone, Default)]
pub struct DataId {
    pairs: Vec<(String, String)>,
}

impl DataId {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加或覆盖字段值，保持字段首次出现的位置
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 从记录的主键与版本键字段值构建
    pub fn for_record(record: &dyn Record) -> DataResult<Self> {
        let model = record.model();
        let names = model
            .key_field_names()
            .into_iter()
            .chain(model.version_key_field_names());

        let mut id = Self::new();
        for name in names {
            let value = record
                .field_value(name)
                .ok_or_else(|| DataError::InvalidArgument {
                    reason: format!(
                        "record type {} has no value for key field {name}",
                        model.type_name
                    ),
                })?;
            id.insert(name, value);
        }
        Ok(id)
    }

    /// 按给定字段名序列化
    ///
    /// - 无字段：空串
    /// - 单个字段：字段值本身
    /// - 多个字段：按给定顺序的 JSON 对象
    pub fn serialize_fields(&self, names: &[&str]) -> DataResult<String> {
        match names {
            [] => Ok(String::new()),
            [name] => self.require(name).map(str::to_string),
            _ => {
                let mut subset = Self::new();
                for name in names {
                    subset.insert(*name, self.require(name)?);
                }
                Ok(serde_json::to_string(&subset)?)
            }
        }
    }

    fn require(&self, name: &str) -> DataResult<&str> {
        self.get(name)
            .ok_or_else(|| DataError::invalid_state(format!("key field {name} missing from data id")))
    }
}

impl PartialEq for DataId {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(n, v)| other.get(n) == Some(v))
    }
}

impl Eq for DataId {}

impl Hash for DataId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable();
        pairs.hash(state);
    }
}

impl Serialize for DataId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (name, value) in &self.pairs {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DataId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DataIdVisitor;

        impl<'de> Visitor<'de> for DataIdVisitor {
            type Value = DataId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of key field names to string values")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<DataId, M::Error> {
                let mut id = DataId::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    if id.get(&name).is_some() {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate key field {name}"
                        )));
                    }
                    id.pairs.push((name, value));
                }
                Ok(id)
            }
        }

        deserializer.deserialize_map(DataIdVisitor)
    }
}
