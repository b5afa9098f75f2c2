//! 数据实体令牌解析示例
//!
//! 展示记录类型定义、类型注册、令牌序列化与惰性解析，以及记录被删除后令牌失效。
//!
//! 运行示例：
//! ```bash
//! RUST_LOG=debug cargo run -p entity-token --example token_resolution
//! ```

use anyhow::Result as AnyResult;
use entity_token::Record;
use entity_token::context::DataContext;
use entity_token::facade::InMemoryDataFacade;
use entity_token::locator::DataSourceId;
use entity_token::record::{self, Record as _};
use entity_token::resolver::TypeRegistry;
use entity_token::token::{
    DataEntityToken, EntityToken, FetchOutcome, SerializedEntityToken, TextRenderer,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Default, Record)]
#[record(name = "Composite.Data.Types.IPage", extends(record::VERSIONED))]
struct Page {
    #[record(locator)]
    data_source_id: Option<DataSourceId>,
    #[record(key, rename = "Id")]
    id: Uuid,
    #[record(rename = "VersionId")]
    version_id: Uuid,
    title: String,
}

impl Page {
    fn new(title: &str) -> AnyResult<Self> {
        let mut page = Self {
            data_source_id: None,
            id: Uuid::new_v4(),
            version_id: Uuid::new_v4(),
            title: title.to_string(),
        };
        page.data_source_id = Some(DataSourceId::for_record("sql", &page)?);
        Ok(page)
    }
}

fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== 数据实体令牌解析示例 ===\n");

    // 1. 注册类型并组装上下文
    let registry = Arc::new(TypeRegistry::new());
    registry.register::<Page>()?;
    let facade = Arc::new(InMemoryDataFacade::new());
    let ctx = DataContext::builder()
        .type_resolver(registry.clone())
        .facade(facade.clone())
        .build();
    println!("1. 已注册类型: {:?}\n", registry.registered_types());

    // 2. 由实时记录构造令牌并序列化
    let record: Arc<dyn entity_token::record::Record> = Arc::new(Page::new("首页")?);
    facade.insert(Arc::clone(&record))?;
    let token = DataEntityToken::from_record(ctx.clone(), record)?;
    println!("2. 序列化令牌: {}\n", token.serialize()?);

    // 3. 放入信封并还原
    let envelope = SerializedEntityToken::from_token(&token)?;
    let json = envelope.to_json()?;
    println!("3. 信封: {json}");
    let restored = SerializedEntityToken::from_json(&json)?.to_data_token(ctx.clone())?;
    println!("   还原后与原令牌相等: {}\n", restored == token);

    // 4. 惰性解析属性
    println!("4. 解析属性");
    println!("   Type: {}", restored.token_type()?);
    println!("   Source: {}", restored.source()?);
    println!("   Id: {}", restored.id()?);
    println!("   VersionId: {}", restored.version_id()?);
    if let Some(data) = restored.data() {
        println!("   title: {}", data.field_value("title").unwrap_or_default());
    }

    let mut out = TextRenderer::new();
    restored.write_pretty(&mut out);
    println!("\n   明细:\n{}", out.as_str());

    // 5. 删除记录后，新令牌失效
    let locator = restored.locator()?.clone();
    facade.remove(&locator);
    let stale = DataEntityToken::deserialize(ctx.clone(), token.serialize()?);
    println!("5. 删除记录后");
    println!("   新令牌有效: {}", stale.is_valid());
    println!("   取数结果为 NotFound: {}", matches!(stale.fetch_outcome(), FetchOutcome::NotFound));
    if let Err(err) = stale.id() {
        println!("   读取 Id 失败: {err}");
    }

    // 6. 非法定位符
    let broken = DataEntityToken::deserialize(ctx, "{\"provider\":\"sql\"}");
    println!("\n6. 非法定位符");
    println!("   令牌有效: {}", broken.is_valid());
    if let Err(err) = broken.locator() {
        println!("   定位符错误: {err}");
    }

    Ok(())
}
