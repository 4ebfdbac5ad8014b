use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, DeriveInput, LitStr, Token};

struct IndexSpec {
    fields: Vec<String>,
    unique: bool,
    non_empty: bool,
    sort_order: i32,
    name: Option<String>,
}

pub fn expand_index_model_provider(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    match expand(&ast) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let mut index_exprs = vec![];

    for attr in &ast.attrs {
        if !attr.path().is_ident("mongo_index") {
            continue;
        }
        let spec = parse_index_attr(attr)?;
        if spec.fields.is_empty() {
            return Err(syn::Error::new_spanned(attr, "mongo_index requires fields[\"...\"]"));
        }
        index_exprs.push(index_model_tokens(&spec));
    }

    Ok(quote! {
        impl MongoIndexModelProvider for #name {
            fn index_models() -> Vec<mongodb::IndexModel> {
                vec![
                    #(#index_exprs),*
                ]
            }
        }
    })
}

fn parse_index_attr(attr: &syn::Attribute) -> syn::Result<IndexSpec> {
    let mut spec = IndexSpec { fields: vec![], unique: false, non_empty: false, sort_order: 1, name: None };
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("fields") {
            let content;
            syn::bracketed!(content in meta.input);
            let lits = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
            spec.fields.extend(lits.iter().map(LitStr::value));
        } else if meta.path.is_ident("unique") {
            spec.unique = true;
        } else if meta.path.is_ident("non_empty") {
            spec.non_empty = true;
        } else if meta.path.is_ident("order") {
            let content;
            syn::parenthesized!(content in meta.input);
            let lit: LitStr = content.parse()?;
            if lit.value().eq_ignore_ascii_case("desc") {
                spec.sort_order = -1;
            }
        } else if meta.path.is_ident("name") {
            let content;
            syn::parenthesized!(content in meta.input);
            let lit: LitStr = content.parse()?;
            spec.name = Some(lit.value());
        } else {
            return Err(meta.error("unsupported mongo_index option"));
        }
        Ok(())
    })?;
    Ok(spec)
}

fn index_model_tokens(spec: &IndexSpec) -> TokenStream {
    let fields = &spec.fields;
    let sort_order = spec.sort_order;
    // 未指定名称时沿用 MongoDB 的默认命名规则 field_1 / field_-1
    let index_name = spec.name.clone().unwrap_or_else(|| {
        fields.iter().map(|f| format!("{}_{}", f, sort_order)).collect::<Vec<_>>().join("_")
    });
    let orders = vec![sort_order; fields.len()];
    let unique = if spec.unique { quote! { .unique(true) } } else { quote! {} };
    // 部分索引：只收录字段为非空字符串的文档，空值不参与唯一约束
    let partial = if spec.non_empty {
        quote! {
            .partial_filter_expression(Some({
                let mut filter = mongodb::bson::Document::new();
                #( filter.insert(#fields, mongodb::bson::doc! { "$gt": "" }); )*
                filter
            }))
        }
    } else {
        quote! {}
    };

    quote! {
        {
            let mut keys = mongodb::bson::Document::new();
            #( keys.insert(#fields, #orders); )*
            mongodb::IndexModel::builder()
                .keys(keys)
                .options(Some(
                    mongodb::options::IndexOptions::builder()
                        #unique
                        #partial
                        .name(Some(#index_name.to_string()))
                        .build(),
                ))
                .build()
        }
    }
}
