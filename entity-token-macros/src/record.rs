use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{DeriveInput, Ident, LitStr, Path, Result, parse_macro_input};

/// #[derive(Record)] 宏实现
/// - 结构体参数：`#[record(name = "...", extends(PATH, ...))]`
///   - `name` 默认为结构体名，即类型解析器中的序列化类型名
///   - `extends` 指向 `static RecordModel`，继承其中的 key / version key 标记
/// - 字段参数：`#[record(key)]`、`#[record(version_key)]`、`#[record(locator)]`、
///   `#[record(skip)]`、`#[record(rename = "...")]`
/// - 生成 `RecordType`（静态元数据表）与 `Record`（对象安全访问）实现
pub(crate) fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_derive(&input) {
        Ok(ts) => ts.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_derive(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let cfg = RecordAttrConfig::from_attrs(&input.attrs)?;

    let fields = match &input.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(f),
            ..
        }) => &f.named,
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "#[derive(Record)] only supports named-field struct",
            ));
        }
    };

    let mut locator: Option<Ident> = None;
    let mut field_models = Vec::new();
    let mut value_arms = Vec::new();

    for field in fields.iter() {
        let ident = field.ident.clone().expect("named field");
        let fcfg = FieldAttrConfig::from_attrs(&field.attrs)?;

        match fcfg.kind {
            FieldKind::Skip => continue,
            FieldKind::Locator => {
                if locator.is_some() {
                    return Err(syn::Error::new(
                        ident.span(),
                        "duplicate #[record(locator)] field",
                    ));
                }
                locator = Some(ident);
                continue;
            }
            _ => {}
        }

        let name = fcfg
            .rename
            .map(|lit| lit.value())
            .unwrap_or_else(|| ident.to_string());

        let role = match fcfg.kind {
            FieldKind::Key => {
                quote! { ::core::option::Option::Some(::entity_token::record::KeyRole::Key) }
            }
            FieldKind::VersionKey => {
                quote! { ::core::option::Option::Some(::entity_token::record::KeyRole::VersionKey) }
            }
            _ => quote! { ::core::option::Option::None },
        };
        field_models.push(quote! {
            ::entity_token::record::FieldModel { name: #name, role: #role }
        });
        value_arms.push(quote! {
            #name => ::core::option::Option::Some(::std::string::ToString::to_string(&self.#ident))
        });
    }

    let Some(locator) = locator else {
        return Err(syn::Error::new(
            input.ident.span(),
            "#[derive(Record)] requires one #[record(locator)] field",
        ));
    };

    let ident = &input.ident;
    let type_name = cfg
        .name
        .map(|lit| lit.value())
        .unwrap_or_else(|| ident.to_string());
    let extends = cfg.extends;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::entity_token::record::RecordType for #ident #ty_generics #where_clause {
            fn record_model() -> &'static ::entity_token::record::RecordModel {
                // 每个记录类型一份元数据表，编译期生成
                static MODEL: ::entity_token::record::RecordModel =
                    ::entity_token::record::RecordModel {
                        type_name: #type_name,
                        fields: &[ #( #field_models ),* ],
                        inherits: &[ #( &#extends ),* ],
                    };
                &MODEL
            }
        }

        impl #impl_generics ::entity_token::record::Record for #ident #ty_generics #where_clause {
            fn model(&self) -> &'static ::entity_token::record::RecordModel {
                <Self as ::entity_token::record::RecordType>::record_model()
            }

            fn data_source_id(&self) -> ::core::option::Option<&::entity_token::locator::DataSourceId> {
                ::entity_token::record::LocatorField::as_locator(&self.#locator)
            }

            fn field_value(&self, name: &str) -> ::core::option::Option<::std::string::String> {
                match name {
                    #( #value_arms, )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

// -------- parsing --------

struct RecordAttrConfig {
    name: Option<LitStr>,
    extends: Vec<Path>,
}

impl RecordAttrConfig {
    fn from_attrs(attrs: &[syn::Attribute]) -> Result<Self> {
        let mut cfg = Self {
            name: None,
            extends: Vec::new(),
        };

        for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    if cfg.name.is_some() {
                        return Err(meta.error("duplicate key 'name' in attribute"));
                    }
                    cfg.name = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("extends") {
                    meta.parse_nested_meta(|inner| {
                        cfg.extends.push(inner.path.clone());
                        Ok(())
                    })
                } else {
                    Err(meta.error("unknown key; expected 'name' | 'extends'"))
                }
            })?;
        }

        Ok(cfg)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Plain,
    Key,
    VersionKey,
    Locator,
    Skip,
}

impl FieldKind {
    fn label(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Key => "key",
            Self::VersionKey => "version_key",
            Self::Locator => "locator",
            Self::Skip => "skip",
        }
    }
}

struct FieldAttrConfig {
    kind: FieldKind,
    rename: Option<LitStr>,
}

impl FieldAttrConfig {
    fn from_attrs(attrs: &[syn::Attribute]) -> Result<Self> {
        let mut cfg = Self {
            kind: FieldKind::Plain,
            rename: None,
        };

        for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
            attr.parse_nested_meta(|meta| {
                let kind = if meta.path.is_ident("key") {
                    FieldKind::Key
                } else if meta.path.is_ident("version_key") {
                    FieldKind::VersionKey
                } else if meta.path.is_ident("locator") {
                    FieldKind::Locator
                } else if meta.path.is_ident("skip") {
                    FieldKind::Skip
                } else if meta.path.is_ident("rename") {
                    if cfg.rename.is_some() {
                        return Err(meta.error("duplicate key 'rename' in attribute"));
                    }
                    cfg.rename = Some(meta.value()?.parse()?);
                    return Ok(());
                } else {
                    return Err(meta.error(
                        "unknown key; expected 'key' | 'version_key' | 'locator' | 'skip' | 'rename'",
                    ));
                };

                if cfg.kind != FieldKind::Plain {
                    return Err(meta.error(format!(
                        "'{}' conflicts with '{}' on the same field",
                        kind.label(),
                        cfg.kind.label()
                    )));
                }
                cfg.kind = kind;
                Ok(())
            })?;
        }

        if cfg.rename.is_some() && matches!(cfg.kind, FieldKind::Locator | FieldKind::Skip) {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                "'rename' has no effect on locator or skipped fields",
            ));
        }

        Ok(cfg)
    }
}
