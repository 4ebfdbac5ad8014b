extern crate proc_macro;

mod mongo_index_macro;

use proc_macro::TokenStream;

/// 根据 `#[mongo_index(...)]` 属性生成 `MongoIndexModelProvider` 实现
///
/// ```ignore
/// #[derive(MongoIndexModelProvider)]
/// #[mongo_index(fields["profile.email"], unique, non_empty, name("uk_profile_email"))]
/// #[mongo_index(fields["profile.nickname"], order("desc"))]
/// struct AccountEntity { /* ... */ }
/// ```
#[proc_macro_derive(MongoIndexModelProvider, attributes(mongo_index))]
pub fn mongo_index_model_provider(input: TokenStream) -> TokenStream {
    mongo_index_macro::expand_index_model_provider(input)
}
