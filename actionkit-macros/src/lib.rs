//! Procedural macros for actionkit

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Source)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(source), supports(enum_any, struct_any))]
struct SourceOpts {
    ident: syn::Ident,
    generics: syn::Generics,
    data: darling::ast::Data<SourceVariant, ()>,

    /// Every value of this type is linked
    #[darling(default)]
    linked: bool,

    /// Type name for structs (defaults to the snake_case type name)
    #[darling(default)]
    rename: Option<String>,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(source))]
struct SourceVariant {
    ident: syn::Ident,

    /// This variant is linked from outside the selected subscriptions
    #[darling(default)]
    linked: bool,

    /// Type name override (defaults to the snake_case variant name)
    #[darling(default)]
    rename: Option<String>,
}

/// Convert PascalCase to snake_case
fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Derive macro for the Source trait
///
/// On enums, each variant is one kind of source: `type_name()` returns the
/// snake_case variant name, and an `is_{variant}()` predicate is generated
/// per variant so handler guards read as `|r, _| r.is_web_app()`.
/// On structs, `type_name()` returns the snake_case type name.
///
/// Attributes:
/// - `#[source(linked)]` on the type or a variant: `is_linked()` returns true
/// - `#[source(rename = "name")]` on a struct or a variant: override the type name
///
/// Also generates `TYPE_NAMES`, every type name this source can report.
///
/// # Example
/// ```ignore
/// #[derive(Source)]
/// enum Resource {
///     WebApp { name: String },
///     FunctionApp { name: String },
///     #[source(linked, rename = "storage")]
///     LinkedStorageAccount(String),
/// }
///
/// let r = Resource::FunctionApp { name: "fn".into() };
/// assert!(r.is_function_app());
/// assert_eq!(r.type_name(), "function_app");
/// assert!(Resource::LinkedStorageAccount("acct".into()).is_linked());
/// ```
#[proc_macro_derive(Source, attributes(source))]
pub fn derive_source(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match SourceOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();
    let container_linked = opts.linked;

    let expanded = match &opts.data {
        darling::ast::Data::Enum(variants) => {
            if opts.rename.is_some() {
                return syn::Error::new_spanned(
                    &input.ident,
                    "`rename` on an enum has no effect; rename individual variants instead",
                )
                .to_compile_error()
                .into();
            }

            let type_names: Vec<String> = variants
                .iter()
                .map(|v| {
                    v.rename
                        .clone()
                        .unwrap_or_else(|| to_snake_case(&v.ident.to_string()))
                })
                .collect();

            let name_arms = variants.iter().zip(type_names.iter()).map(|(v, s)| {
                let ident = &v.ident;
                quote! { #name::#ident { .. } => #s }
            });

            let linked_variants: Vec<_> = variants
                .iter()
                .filter(|v| v.linked)
                .map(|v| {
                    let ident = &v.ident;
                    quote! { #name::#ident { .. } }
                })
                .collect();

            let is_linked_body = if container_linked {
                quote! { true }
            } else if linked_variants.is_empty() {
                quote! { false }
            } else {
                quote! { ::core::matches!(self, #(#linked_variants)|*) }
            };

            let predicates = variants.iter().map(|v| {
                let ident = &v.ident;
                let fn_name = format_ident!("is_{}", to_snake_case(&ident.to_string()));
                let doc = format!("Whether this is `{}::{}`", name, ident);
                quote! {
                    #[doc = #doc]
                    pub fn #fn_name(&self) -> bool {
                        ::core::matches!(self, #name::#ident { .. })
                    }
                }
            });

            let name_match = if variants.is_empty() {
                quote! { match *self {} }
            } else {
                quote! {
                    match self {
                        #(#name_arms),*
                    }
                }
            };

            quote! {
                impl #impl_generics ::actionkit::Source for #name #ty_generics #where_clause {
                    fn type_name(&self) -> &'static str {
                        #name_match
                    }

                    fn is_linked(&self) -> bool {
                        #is_linked_body
                    }
                }

                impl #impl_generics #name #ty_generics #where_clause {
                    /// Every type name this source can report
                    pub const TYPE_NAMES: &'static [&'static str] = &[#(#type_names),*];

                    #(#predicates)*
                }
            }
        }
        darling::ast::Data::Struct(_) => {
            let type_name = opts
                .rename
                .clone()
                .unwrap_or_else(|| to_snake_case(&name.to_string()));

            quote! {
                impl #impl_generics ::actionkit::Source for #name #ty_generics #where_clause {
                    fn type_name(&self) -> &'static str {
                        #type_name
                    }

                    fn is_linked(&self) -> bool {
                        #container_linked
                    }
                }

                impl #impl_generics #name #ty_generics #where_clause {
                    /// Every type name this source can report
                    pub const TYPE_NAMES: &'static [&'static str] = &[#type_name];
                }
            }
        }
    };

    TokenStream::from(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("WebApp"), "web_app");
        assert_eq!(to_snake_case("ContainerRegistry"), "container_registry");
        assert_eq!(to_snake_case("Vm"), "vm");
    }
}
