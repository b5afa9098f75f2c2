use crate::utils::{apply_derives, parse_bool_kv};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：Default, Clone, (Debug 可控), Serialize, Deserialize, PartialEq, Eq, (Hash 可控)
/// - 参数：`#[value_object(debug = true|false, hash = true|false)]`，均默认 true
///
/// 定位符中的组成部分（作用域、字段值等）会作为 `HashMap`/`DashMap` 的键，
/// 因此 Hash 默认开启。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Default),
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
    ];

    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    if cfg.derive_hash.unwrap_or(true) {
        required.push(syn::parse_quote!(Hash));
    }

    match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);
            TokenStream::from(quote! { #st })
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, required);
            TokenStream::from(quote! { #en })
        }
        other => syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
            .to_compile_error()
            .into(),
    }
}

// -------- parsing --------

struct ValueObjectAttrConfig {
    derive_debug: Option<bool>,
    derive_hash: Option<bool>,
}

impl Parse for ValueObjectAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self {
            derive_debug: None,
            derive_hash: None,
        };

        if input.is_empty() {
            return Ok(cfg);
        }

        let elems: Punctuated<ValueObjectAttrElem, Token![,]> =
            Punctuated::parse_terminated(input)?;

        for elem in elems {
            let (slot, key, value) = match elem {
                ValueObjectAttrElem::Debug(key, b) => (&mut cfg.derive_debug, key, b),
                ValueObjectAttrElem::Hash(key, b) => (&mut cfg.derive_hash, key, b),
            };
            if slot.is_some() {
                return Err(syn::Error::new(
                    key.span(),
                    format!("duplicate key '{key}' in attribute"),
                ));
            }
            *slot = Some(value);
        }

        Ok(cfg)
    }
}

enum ValueObjectAttrElem {
    Debug(syn::Ident, bool),
    Hash(syn::Ident, bool),
}

impl Parse for ValueObjectAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "debug" {
            let b = parse_bool_kv(input, &key)?;
            Ok(Self::Debug(key, b))
        } else if key == "hash" {
            let b = parse_bool_kv(input, &key)?;
            Ok(Self::Hash(key, b))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'debug' or 'hash'",
            ))
        }
    }
}
