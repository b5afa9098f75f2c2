use entity_token::locator::DataSourceId;
use entity_token::record::{self, Record as _, RecordType};
use entity_token_macros::Record;

#[derive(Debug, Default, Record)]
#[record(name = "Composite.Data.Types.IPage", extends(record::VERSIONED))]
struct Page {
    #[record(locator)]
    data_source_id: Option<DataSourceId>,
    #[record(key, rename = "Id")]
    id: uuid::Uuid,
    #[record(rename = "VersionId")]
    version_id: uuid::Uuid,
    title: String,
    #[record(skip)]
    cache: Vec<u8>,
}

#[derive(Debug, Default, Record)]
struct Setting {
    #[record(locator)]
    data_source_id: DataSourceId,
    #[record(key)]
    name: String,
    #[record(version_key)]
    revision: u32,
}

fn main() {
    let model = Page::record_model();
    let _ = model.key_field_names();
    let _ = model.version_key_field_names();

    let page = Page::default();
    let _ = page.field_value("title");
    let _ = page.data_source_id();
    let _ = page.cache.len();

    let setting = Setting::default();
    let _ = setting.model().type_name;
}
