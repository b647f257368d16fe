//! Derive macro marking a struct as a table mapping.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Ident, LitStr, Result, parse_macro_input};

/// Mark a struct as a table mapping and register it with the linked scan
/// registry.
///
/// The table name defaults to the snake_case of the type name; override it
/// with `#[table(name = "...")]`.
///
/// # Example
/// ```ignore
/// #[derive(TableMapped)]
/// #[table(name = "guild_members")]
/// struct Member {
///     id: u64,
/// }
/// ```
#[proc_macro_derive(TableMapped, attributes(table))]
pub fn derive_table_mapped(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedMapping::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct ParsedMapping {
    ident: Ident,
    table_name: String,
}

impl ParsedMapping {
    fn from_input(input: &DeriveInput) -> Result<Self> {
        if !matches!(input.data, Data::Struct(_)) {
            return Err(Error::new_spanned(
                &input.ident,
                "TableMapped can only be derived for structs",
            ));
        }
        if !input.generics.params.is_empty() {
            return Err(Error::new_spanned(
                &input.generics,
                "TableMapped cannot be derived for generic structs",
            ));
        }

        let mut table_name = None;
        for attr in &input.attrs {
            if attr.path().is_ident("table") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("name") {
                        let value: LitStr = meta.value()?.parse()?;
                        table_name = Some(value.value());
                        Ok(())
                    } else {
                        Err(meta.error("unsupported `table` attribute; expected `name`"))
                    }
                })?;
            }
        }

        Ok(Self {
            ident: input.ident.clone(),
            table_name: table_name.unwrap_or_else(|| to_snake_case(&input.ident.to_string())),
        })
    }

    fn emit(&self) -> proc_macro2::TokenStream {
        let ident = &self.ident;
        let type_name = self.ident.to_string();
        let table_name = &self.table_name;

        quote! {
            impl ::dbscout::TableMapping for #ident {
                const TABLE: &'static str = #table_name;

                fn descriptor() -> ::dbscout::TypeDescriptor {
                    ::dbscout::TypeDescriptor::new(
                        #type_name,
                        ::core::module_path!(),
                        #table_name,
                    )
                }
            }

            ::dbscout::inventory::submit! {
                ::dbscout::scan::MappedType::new(
                    #type_name,
                    ::core::module_path!(),
                    #table_name,
                )
            }
        }
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_defaults_to_snake_case() {
        let input: DeriveInput = syn::parse_quote! {
            struct GuildMember {
                id: u64,
            }
        };
        let parsed = ParsedMapping::from_input(&input).expect("parse");
        assert_eq!(parsed.table_name, "guild_member");
    }

    #[test]
    fn table_attribute_overrides_the_name() {
        let input: DeriveInput = syn::parse_quote! {
            #[table(name = "members")]
            struct GuildMember {
                id: u64,
            }
        };
        let parsed = ParsedMapping::from_input(&input).expect("parse");
        assert_eq!(parsed.table_name, "members");
    }

    #[test]
    fn rejects_non_structs() {
        let input: DeriveInput = syn::parse_quote! {
            enum NotAMapping {
                A,
            }
        };
        assert!(ParsedMapping::from_input(&input).is_err());
    }

    #[test]
    fn rejects_generic_structs() {
        let input: DeriveInput = syn::parse_quote! {
            struct Wrapper<T> {
                inner: T,
            }
        };
        assert!(ParsedMapping::from_input(&input).is_err());
    }

    #[test]
    fn rejects_unknown_table_attributes() {
        let input: DeriveInput = syn::parse_quote! {
            #[table(schema = "public")]
            struct Guild {
                id: u64,
            }
        };
        assert!(ParsedMapping::from_input(&input).is_err());
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("Guild"), "guild");
        assert_eq!(to_snake_case("GuildMember"), "guild_member");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }
}
