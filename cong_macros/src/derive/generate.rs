//! `Schema` trait implementation generation.
//!
//! Each named field becomes one `FieldSchema` entry. Scalars and scalar
//! sequences record their category and declared type; any other path type is
//! assumed to implement `Schema` itself and is described lazily so recursive
//! types expand without bound.

use proc_macro2::TokenStream;
use quote::quote;
use syn::visit::Visit;
use syn::{DeriveInput, Generics, Ident, Type, WherePredicate, parse_quote};

use super::classify::{Class, Leaf, classify};
use super::parse::{ParsedField, ParsedInput, last_ident, unraw};

/// Finds whether a type mentions one of the struct's type parameters.
struct MentionsParam<'a> {
    params: &'a [&'a Ident],
    found: bool,
}

impl<'ast> Visit<'ast> for MentionsParam<'_> {
    fn visit_path(&mut self, path: &'ast syn::Path) {
        if let Some(first) = path.segments.first()
            && self.params.contains(&&first.ident)
        {
            self.found = true;
        }
        syn::visit::visit_path(self, path);
    }
}

fn mentions_param(ty: &Type, params: &[&Ident]) -> bool {
    let mut visitor = MentionsParam {
        params,
        found: false,
    };
    visitor.visit_type(ty);
    visitor.found
}

fn type_name(ty: &Type) -> String {
    quote!(#ty).to_string().replace(' ', "")
}

fn leaf_tokens(krate: &TokenStream, kind: Leaf, ty: &Type) -> TokenStream {
    let variant = match kind {
        Leaf::String => quote!(String),
        Leaf::Integer => quote!(Integer),
        Leaf::Float => quote!(Float),
        Leaf::Boolean => quote!(Boolean),
    };
    let name = type_name(ty);
    quote! { #krate::LeafType::new(#krate::LeafKind::#variant, #name) }
}

/// Tokens for the `FieldKind` of `field`, plus the nested type when the
/// field refers to another schema.
fn kind_tokens<'a>(
    krate: &TokenStream,
    field: &'a ParsedField,
) -> syn::Result<(TokenStream, Option<&'a Type>)> {
    let class = classify(&field.field.ty, field.attrs.leaf);
    if field.serde.flatten && !matches!(class, Class::Nested(_)) {
        return Err(syn::Error::new_spanned(
            &field.field.ty,
            "#[serde(flatten)] is only supported on nested Schema types",
        ));
    }
    Ok(match class {
        Class::Scalar(kind, ty) => {
            let leaf = leaf_tokens(krate, kind, ty);
            (quote! { #krate::FieldKind::Scalar(#leaf) }, None)
        }
        Class::Sequence(kind, ty) => {
            let leaf = leaf_tokens(krate, kind, ty);
            (quote! { #krate::FieldKind::Sequence(#leaf) }, None)
        }
        Class::Nested(ty) => (
            quote! { #krate::FieldKind::Nested(#krate::NestedSchema::of::<#ty>()) },
            Some(ty),
        ),
        Class::Unsupported(ty) => {
            let name = type_name(ty);
            (quote! { #krate::FieldKind::Unsupported(#name) }, None)
        }
    })
}

/// Bound every type parameter by `'static` and every generic nested field
/// type by `Schema`.
///
/// References back to the deriving type are left unbounded; requiring
/// `Self: Schema` on its own impl would never resolve.
fn schema_generics(
    krate: &TokenStream,
    ident: &Ident,
    generics: &Generics,
    nested: &[&Type],
) -> Generics {
    let mut out = generics.clone();
    let params: Vec<&Ident> = generics.type_params().map(|param| &param.ident).collect();
    let predicates = &mut out.make_where_clause().predicates;
    for param in &params {
        predicates.push(parse_quote!(#param: 'static));
    }
    let is_self = |ty: &Type| last_ident(ty).is_some_and(|name| *ident == name);
    for ty in nested
        .iter()
        .filter(|&&ty| !is_self(ty) && mentions_param(ty, &params))
    {
        let predicate: WherePredicate = parse_quote!(#ty: #krate::Schema);
        predicates.push(predicate);
    }
    out
}

/// Generate the `Schema` implementation for `input`.
pub(crate) fn generate_schema_impl(
    input: &DeriveInput,
    parsed: &ParsedInput,
    krate: &TokenStream,
) -> syn::Result<TokenStream> {
    let mut entries = Vec::with_capacity(parsed.fields.len());
    let mut nested = Vec::new();
    for field in &parsed.fields {
        let (kind, nested_ty) = kind_tokens(krate, field)?;
        nested.extend(nested_ty);
        let (name, serde_name) = if field.serde.flatten {
            (String::new(), String::new())
        } else {
            let name = match (&field.attrs.map_name, &field.field.ident) {
                (Some(mapped), _) => mapped.clone(),
                (None, Some(ident)) => unraw(ident),
                (None, None) => {
                    return Err(syn::Error::new_spanned(
                        &field.field,
                        "Schema requires named fields",
                    ));
                }
            };
            (name, field.serde_name.clone())
        };
        entries.push(quote! {
            #krate::FieldSchema::new(#name, #serde_name, #kind)
        });
    }

    let ident = &input.ident;
    let generics = schema_generics(krate, ident, &input.generics, &nested);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #krate::Schema for #ident #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<#krate::FieldSchema> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}
