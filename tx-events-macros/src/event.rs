use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    DeriveInput, Ident, Lit, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input,
};

/// #[derive(Event)] 宏实现
/// - 仅生成被覆写的方法，其余沿用 trait 默认实现
/// - 多个 `#[event(...)]` 属性合并处理，重复键报错
pub(crate) fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if let syn::Data::Union(u) = &input.data {
        return syn::Error::new(
            u.union_token.span(),
            "#[derive(Event)] supports only struct and enum types",
        )
        .to_compile_error()
        .into();
    }

    let cfg = match EventAttrConfig::from_attrs(&input.attrs) {
        Ok(cfg) => cfg,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let name_fn = cfg.name.map(|lit| {
        quote! {
            fn event_name(&self) -> &str { #lit }
        }
    });

    let transactional_fn = cfg.transactional.map(|flag| {
        quote! {
            fn transactional(&self) -> bool { #flag }
        }
    });

    let out = quote! {
        impl #impl_generics ::tx_events::Event for #ident #ty_generics #where_clause {
            #name_fn
            #transactional_fn
        }
    };

    TokenStream::from(out)
}

// -------- parsing --------

#[derive(Default)]
struct EventAttrConfig {
    name: Option<syn::LitStr>,
    transactional: Option<bool>,
}

impl EventAttrConfig {
    fn from_attrs(attrs: &[syn::Attribute]) -> Result<Self> {
        let mut cfg = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("event")) {
            let items: Punctuated<EventAttrItem, Token![,]> =
                attr.parse_args_with(Punctuated::<EventAttrItem, Token![,]>::parse_terminated)?;

            for item in items {
                match item.key.to_string().as_str() {
                    "name" => {
                        if cfg.name.is_some() {
                            return Err(syn::Error::new(
                                item.key.span(),
                                "duplicate key 'name' in attribute",
                            ));
                        }
                        let lit = match item.value {
                            Some(Lit::Str(lit)) if !lit.value().is_empty() => lit,
                            Some(Lit::Str(lit)) => {
                                return Err(syn::Error::new(
                                    lit.span(),
                                    "event name must not be empty",
                                ));
                            }
                            Some(other) => {
                                return Err(syn::Error::new(
                                    other.span(),
                                    "expected string literal for 'name'",
                                ));
                            }
                            None => {
                                return Err(syn::Error::new(
                                    item.key.span(),
                                    "expected `name = \"...\"`",
                                ));
                            }
                        };
                        cfg.name = Some(lit);
                    }
                    "transactional" => {
                        if cfg.transactional.is_some() {
                            return Err(syn::Error::new(
                                item.key.span(),
                                "duplicate key 'transactional' in attribute",
                            ));
                        }
                        let flag = match item.value {
                            None => true,
                            Some(Lit::Bool(lit)) => lit.value,
                            Some(other) => {
                                return Err(syn::Error::new(
                                    other.span(),
                                    "expected boolean literal for 'transactional'",
                                ));
                            }
                        };
                        cfg.transactional = Some(flag);
                    }
                    _ => {
                        return Err(syn::Error::new(
                            item.key.span(),
                            "unknown key; expected 'name' | 'transactional'",
                        ));
                    }
                }
            }
        }

        Ok(cfg)
    }
}

// `key` 或 `key = literal`
struct EventAttrItem {
    key: Ident,
    value: Option<Lit>,
}

impl Parse for EventAttrItem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let value = if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            Some(input.parse()?)
        } else {
            None
        };
        Ok(Self { key, value })
    }
}
