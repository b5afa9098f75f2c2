use crate::context::DataContext;
use crate::error::{DataError, DataResult};
use crate::locator::DataSourceId;
use crate::record::{KeyRole, Record, RecordModel};
use crate::resolver::InterfaceType;
use crate::token::{EntityToken, FetchOutcome, PrettyRenderer};
use once_cell::sync::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, warn};

/// 指向一条数据记录的实体令牌
///
/// 由实时记录（`from_record`）或序列化定位符（`deserialize`）二者之一构造，
/// 另一侧在首次访问时推导并缓存。缓存基于 `OnceCell`，每个惰性值至多计算一次，
/// 并发访问时也不会重复取数。
pub struct DataEntityToken {
    ctx: DataContext,
    serialized: OnceCell<String>,
    locator: OnceCell<DataSourceId>,
    outcome: OnceCell<FetchOutcome>,
    interface_type: OnceCell<Option<InterfaceType>>,
    type_name: OnceCell<String>,
    id: OnceCell<String>,
    version_id: OnceCell<String>,
}

impl DataEntityToken {
    pub const KIND: &'static str = "DataEntityToken";

    /// 由实时记录构造
    ///
    /// 记录必须携带与自身相符的定位符：提供者与类型名非空、类型名与记录模型一致、
    /// 主键与版本键字段齐全。接口类型仍经由类型解析器从定位符推导，
    /// 与反序列化得到的令牌保持一致。
    pub fn from_record(ctx: DataContext, record: Arc<dyn Record>) -> DataResult<Self> {
        let model = record.model();
        let locator = record
            .data_source_id()
            .cloned()
            .ok_or_else(|| DataError::InvalidArgument {
                reason: format!("record of type {} has no data source id", model.type_name),
            })?;
        check_locator(model, &locator)?;

        let token = Self::empty(ctx);
        let _ = token.locator.set(locator);
        let _ = token.outcome.set(FetchOutcome::Found(record));
        Ok(token)
    }

    /// 由序列化定位符构造，不做任何校验
    pub fn deserialize(ctx: DataContext, serialized: impl Into<String>) -> Self {
        let token = Self::empty(ctx);
        let _ = token.serialized.set(serialized.into());
        token
    }

    fn empty(ctx: DataContext) -> Self {
        Self {
            ctx,
            serialized: OnceCell::new(),
            locator: OnceCell::new(),
            outcome: OnceCell::new(),
            interface_type: OnceCell::new(),
            type_name: OnceCell::new(),
            id: OnceCell::new(),
            version_id: OnceCell::new(),
        }
    }

    /// 定位符；序列化串无法解析时返回 `MalformedLocator`（失败不缓存）
    pub fn locator(&self) -> DataResult<&DataSourceId> {
        self.locator.get_or_try_init(|| -> DataResult<DataSourceId> {
            let serialized = self
                .serialized
                .get()
                .ok_or_else(|| DataError::invalid_state("token has no locator to resolve"))?;
            self.ctx.codec().deserialize(serialized)
        })
    }

    /// 接口类型；无法解析时为 `None`（未知类型，不视为错误）
    pub fn interface_type(&self) -> Option<InterfaceType> {
        *self.interface_type.get_or_init(|| {
            let locator = self.locator().ok()?;
            let resolved = self.ctx.type_resolver().try_resolve(locator.type_name());
            if resolved.is_none() {
                debug!(type_name = locator.type_name(), "Unresolved interface type");
            }
            resolved
        })
    }

    /// 实时记录；取数失败（含记录不存在）时为 `None`
    pub fn data(&self) -> Option<&Arc<dyn Record>> {
        self.fetch_outcome().record()
    }

    /// 惰性取数的完整结果，仅尝试一次
    pub fn fetch_outcome(&self) -> &FetchOutcome {
        self.outcome.get_or_init(|| self.fetch())
    }

    fn fetch(&self) -> FetchOutcome {
        let locator = match self.locator() {
            Ok(locator) => locator,
            Err(err) => {
                debug!(error = %err, "Malformed locator, token is invalid");
                return FetchOutcome::Malformed(err);
            }
        };

        let provider = locator.provider_name();
        let type_name = locator.type_name();
        debug!(provider, type_name, "Fetch record");

        match self.ctx.facade().fetch(locator) {
            Ok(Some(record)) => FetchOutcome::Found(record),
            Ok(None) => {
                debug!(provider, type_name, "Record not found, token is invalid");
                FetchOutcome::NotFound
            }
            Err(err) => {
                warn!(provider, type_name, error = %err, "Data facade failed, token is invalid");
                FetchOutcome::Failed(err)
            }
        }
    }

    /// 按记录具体类型（含继承）上标记的字段序列化
    fn serialize_key_fields(&self, role: KeyRole) -> DataResult<String> {
        let record = self.data().ok_or_else(|| {
            DataError::invalid_state(
                "failed to resolve data from data source id, the data has probably been removed",
            )
        })?;
        let names = record.model().field_names_with(role);
        self.locator()?.data_id().serialize_fields(&names)
    }

    fn key_field_entries(&self, record: &dyn Record) -> Vec<(&'static str, String)> {
        let model = record.model();
        let Ok(locator) = self.locator() else {
            return Vec::new();
        };

        model
            .key_field_names()
            .into_iter()
            .chain(model.version_key_field_names())
            .filter_map(|name| {
                locator
                    .data_id()
                    .get(name)
                    .map(str::to_string)
                    .or_else(|| record.field_value(name))
                    .map(|value| (name, value))
            })
            .collect()
    }
}

impl EntityToken for DataEntityToken {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn token_type(&self) -> DataResult<&str> {
        self.type_name
            .get_or_try_init(|| -> DataResult<String> {
                let locator = self.locator()?;
                Ok(match self.interface_type() {
                    Some(ty) => self.ctx.type_resolver().serialize_type(ty),
                    None => locator.type_name().to_string(),
                })
            })
            .map(String::as_str)
    }

    fn source(&self) -> DataResult<&str> {
        self.locator().map(DataSourceId::provider_name)
    }

    fn id(&self) -> DataResult<&str> {
        self.id
            .get_or_try_init(|| self.serialize_key_fields(KeyRole::Key))
            .map(String::as_str)
    }

    fn version_id(&self) -> DataResult<&str> {
        self.version_id
            .get_or_try_init(|| self.serialize_key_fields(KeyRole::VersionKey))
            .map(String::as_str)
    }

    fn is_valid(&self) -> bool {
        self.data().is_some()
    }

    fn serialize(&self) -> DataResult<&str> {
        self.serialized
            .get_or_try_init(|| -> DataResult<String> {
                let locator = self
                    .locator
                    .get()
                    .ok_or_else(|| DataError::invalid_state("record has no data source id"))?;
                self.ctx.codec().serialize(locator)
            })
            .map(String::as_str)
    }

    fn write_pretty(&self, renderer: &mut dyn PrettyRenderer) {
        if let Ok(ty) = self.token_type() {
            renderer.add_row("Type", ty);
        }
        if let Ok(source) = self.source() {
            renderer.add_row("Source", source);
        }

        let Some(record) = self.data() else {
            renderer.add_row("Id", "item not found");
            return;
        };

        let type_name = self
            .interface_type()
            .map(|ty| ty.name())
            .unwrap_or(record.model().type_name);
        let fields = self.key_field_entries(record.as_ref());
        let entries: Vec<(&str, &str)> = std::iter::once(("Type", type_name))
            .chain(fields.iter().map(|(n, v)| (*n, v.as_str())))
            .collect();
        renderer.add_full_row("Id", &entries);

        if let Ok(version_id) = self.version_id() {
            if !version_id.is_empty() {
                renderer.add_row("VersionId", version_id);
            }
        }
    }
}

/// 比较键：可解析的令牌按定位符比较，其余按原始序列化串比较
#[derive(PartialEq, Eq, Hash)]
enum Identity<'a> {
    Locator(&'a DataSourceId),
    Raw(Option<&'a str>),
}

impl DataEntityToken {
    fn identity(&self) -> Identity<'_> {
        match self.locator() {
            Ok(locator) => Identity::Locator(locator),
            Err(_) => Identity::Raw(self.serialize().ok()),
        }
    }
}

impl PartialEq for DataEntityToken {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for DataEntityToken {}

impl Hash for DataEntityToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

fn check_locator(model: &RecordModel, locator: &DataSourceId) -> DataResult<()> {
    let invalid = |reason: String| Err(DataError::InvalidArgument { reason });

    if locator.provider_name().is_empty() || locator.type_name().is_empty() {
        return invalid(format!(
            "record of type {} has a data source id without provider or type",
            model.type_name
        ));
    }
    if locator.type_name() != model.type_name {
        return invalid(format!(
            "data source id type {} does not match record type {}",
            locator.type_name(),
            model.type_name
        ));
    }
    let missing = model
        .key_field_names()
        .into_iter()
        .chain(model.version_key_field_names())
        .find(|name| locator.data_id().get(name).is_none());
    if let Some(name) = missing {
        return invalid(format!(
            "data source id of record type {} lacks key field {name}",
            model.type_name
        ));
    }
    Ok(())
}

impl fmt::Debug for DataEntityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataEntityToken")
            .field("serialized", &self.serialized.get())
            .field("locator", &self.locator.get())
            .field("resolved", &self.outcome.get().map(FetchOutcome::is_found))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::{DataFacade, InMemoryDataFacade};
    use crate::locator::DataId;
    use crate::resolver::{TypeRegistry, TypeResolver};
    use crate::token::TextRenderer;
    use entity_token_macros::Record;
    use std::sync::Mutex;

    #[derive(Debug, Default, Record)]
    #[record(name = "Composite.Data.Types.IMediaFile")]
    struct MediaFile {
        #[record(locator)]
        data_source_id: Option<DataSourceId>,
        #[record(key, rename = "Id")]
        id: String,
        title: String,
    }

    fn media(id: &str) -> Arc<dyn Record> {
        let mut m = MediaFile {
            id: id.to_string(),
            title: format!("file {id}"),
            ..Default::default()
        };
        m.data_source_id = Some(DataSourceId::for_record("media", &m).unwrap());
        Arc::new(m)
    }

    #[derive(Default)]
    struct CountingResolver {
        inner: TypeRegistry,
        resolve_calls: Mutex<usize>,
        serialize_calls: Mutex<usize>,
    }

    impl TypeResolver for CountingResolver {
        fn serialize_type(&self, ty: InterfaceType) -> String {
            *self.serialize_calls.lock().unwrap() += 1;
            self.inner.serialize_type(ty)
        }

        fn try_resolve(&self, serialized: &str) -> Option<InterfaceType> {
            *self.resolve_calls.lock().unwrap() += 1;
            self.inner.try_resolve(serialized)
        }
    }

    struct FailingFacade;

    impl DataFacade for FailingFacade {
        fn fetch(&self, _locator: &DataSourceId) -> DataResult<Option<Arc<dyn Record>>> {
            Err(DataError::Facade {
                reason: "connection reset".into(),
            })
        }
    }

    fn ctx_with(
        resolver: Arc<dyn TypeResolver>,
        facade: Arc<dyn DataFacade>,
    ) -> DataContext {
        DataContext::builder()
            .type_resolver(resolver)
            .facade(facade)
            .build()
    }

    #[test]
    fn from_record_without_locator_is_invalid_argument() {
        let ctx = ctx_with(
            Arc::new(TypeRegistry::new()),
            Arc::new(InMemoryDataFacade::new()),
        );
        let err = DataEntityToken::from_record(ctx, Arc::new(MediaFile::default())).unwrap_err();
        match err {
            DataError::InvalidArgument { .. } => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn type_resolution_is_memoized() {
        let resolver = Arc::new(CountingResolver::default());
        resolver.inner.register::<MediaFile>().unwrap();
        let facade = Arc::new(InMemoryDataFacade::new());
        let record = media("a");
        facade.insert(Arc::clone(&record)).unwrap();

        let serialized = DataEntityToken::from_record(ctx_with(resolver.clone(), facade.clone()), record)
            .unwrap()
            .serialize()
            .unwrap()
            .to_string();

        let token = DataEntityToken::deserialize(ctx_with(resolver.clone(), facade), serialized);
        for _ in 0..3 {
            assert_eq!(token.token_type().unwrap(), "Composite.Data.Types.IMediaFile");
            assert_eq!(
                token.interface_type(),
                Some(InterfaceType::of::<MediaFile>())
            );
        }
        assert_eq!(*resolver.resolve_calls.lock().unwrap(), 1);
        assert_eq!(*resolver.serialize_calls.lock().unwrap(), 1);
    }

    #[test]
    fn unresolved_type_falls_back_to_locator_type_name() {
        let facade = Arc::new(InMemoryDataFacade::new());
        let ctx = ctx_with(Arc::new(TypeRegistry::new()), facade);
        let locator = DataSourceId::builder()
            .provider_name("media")
            .type_name("Legacy.Type")
            .data_id(DataId::new().with("Id", "1"))
            .build();
        let serialized = ctx.codec().serialize(&locator).unwrap();

        let token = DataEntityToken::deserialize(ctx, serialized);
        assert_eq!(token.interface_type(), None);
        assert_eq!(token.token_type().unwrap(), "Legacy.Type");
        assert_eq!(token.source().unwrap(), "media");
        assert!(!token.is_valid());
    }

    #[test]
    fn facade_failure_degrades_to_invalid() {
        let ctx = ctx_with(Arc::new(TypeRegistry::new()), Arc::new(FailingFacade));
        let serialized = ctx
            .codec()
            .serialize(media("x").data_source_id().unwrap())
            .unwrap();

        let token = DataEntityToken::deserialize(ctx, serialized);
        assert!(!token.is_valid());
        assert!(token.data().is_none());
        match token.fetch_outcome() {
            FetchOutcome::Failed(DataError::Facade { reason }) => {
                assert_eq!(reason, "connection reset")
            }
            other => panic!("unexpected {other:?}"),
        }
        match token.id().unwrap_err() {
            DataError::InvalidState { .. } => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_locator_outcome() {
        let ctx = ctx_with(
            Arc::new(TypeRegistry::new()),
            Arc::new(InMemoryDataFacade::new()),
        );
        let token = DataEntityToken::deserialize(ctx, "not-a-locator");
        assert!(!token.is_valid());
        assert!(matches!(token.fetch_outcome(), FetchOutcome::Malformed(_)));
        assert!(token.fetch_outcome().error().is_some());
        assert_eq!(token.interface_type(), None);
        assert!(token.token_type().is_err());
        // 序列化原样返回输入串
        assert_eq!(token.serialize().unwrap(), "not-a-locator");
    }

    #[test]
    fn pretty_output_for_valid_and_invalid_tokens() {
        let registry = Arc::new(TypeRegistry::new());
        registry.register::<MediaFile>().unwrap();
        let facade = Arc::new(InMemoryDataFacade::new());
        let record = media("42");
        facade.insert(Arc::clone(&record)).unwrap();

        let token = DataEntityToken::from_record(ctx_with(registry.clone(), facade.clone()), record).unwrap();
        let mut out = TextRenderer::new();
        token.write_pretty(&mut out);
        assert_eq!(
            out.as_str(),
            "Type: Composite.Data.Types.IMediaFile\n\
             Source: media\n\
             Id:\n  Type: Composite.Data.Types.IMediaFile\n  Id: 42\n"
        );

        let missing = ctx_with(registry.clone(), facade.clone())
            .codec()
            .serialize(media("404").data_source_id().unwrap())
            .unwrap();
        let token = DataEntityToken::deserialize(ctx_with(registry, facade), missing);
        let mut out = TextRenderer::new();
        token.write_pretty(&mut out);
        assert!(out.as_str().ends_with("Id: item not found\n"));
    }

    #[test]
    fn tokens_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DataEntityToken>();
    }
}
