use std::collections::BTreeSet;

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Variant, parse_macro_input};

use crate::utils;

/// One unit variant with its canonical spelling and lower-cased aliases.
struct ValueVariant {
    ident: Ident,
    canonical: String,
    accepted: Vec<String>,
}

/// Case-insensitive `parse`, `FromStr`, canonical kebab-case `Display`, an
/// `EXPECTED` string (`a|b|c`) and `ALL` for unit-variant enums.
pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "CliValue can only be derived for enums",
        ));
    };

    let option_name = option_name(&input.ident, &input.attrs)?;
    let variants = data_enum
        .variants
        .iter()
        .map(value_variant)
        .collect::<syn::Result<Vec<_>>>()?;

    let mut taken = BTreeSet::new();
    for variant in &variants {
        for value in &variant.accepted {
            if !taken.insert(value.as_str()) {
                return Err(syn::Error::new_spanned(
                    &variant.ident,
                    format!("`{value}` is accepted by more than one variant"),
                ));
            }
        }
    }

    let enum_ident = &input.ident;
    let idents: Vec<&Ident> = variants.iter().map(|v| &v.ident).collect();
    let canonical: Vec<LitStr> = variants.iter().map(|v| lit(&v.canonical)).collect();
    let accepted: Vec<TokenStream2> = variants
        .iter()
        .map(|v| {
            let values = v.accepted.iter().map(|value| lit(value));
            quote! { #(#values)|* }
        })
        .collect();
    let expected = lit(
        &variants
            .iter()
            .map(|v| v.canonical.as_str())
            .collect::<Vec<_>>()
            .join("|"),
    );
    let option_lit = lit(&option_name);

    Ok(quote! {
        impl #enum_ident {
            pub const EXPECTED: &'static str = #expected;
            pub const ALL: &'static [Self] = &[#(Self::#idents),*];

            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    #(#accepted => Ok(Self::#idents),)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option_lit,
                        raw,
                        Self::EXPECTED
                    ))),
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    #(Self::#idents => #canonical,)*
                }
            }
        }

        impl std::str::FromStr for #enum_ident {
            type Err = crate::Error;

            fn from_str(raw: &str) -> crate::Result<Self> {
                Self::parse(raw)
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    })
}

/// `#[cli_value(option = "...")]`, else the kebab-cased enum name.
fn option_name(enum_ident: &Ident, attrs: &[Attribute]) -> syn::Result<String> {
    let mut name = utils::to_kebab_case(&enum_ident.to_string());
    for attr in attrs.iter().filter(|a| a.path().is_ident("cli_value")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                name = meta.value()?.parse::<LitStr>()?.value();
                Ok(())
            } else {
                Err(meta.error("expected `option = \"...\"`"))
            }
        })?;
    }
    Ok(name)
}

fn value_variant(variant: &Variant) -> syn::Result<ValueVariant> {
    if !matches!(variant.fields, Fields::Unit) {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "CliValue variants cannot carry data",
        ));
    }

    let mut canonical = utils::to_kebab_case(&variant.ident.to_string());
    let mut aliases = Vec::new();
    for attr in variant.attrs.iter().filter(|a| a.path().is_ident("cli")) {
        attr.parse_nested_meta(|meta| {
            let value = meta.value()?.parse::<LitStr>()?.value();
            if meta.path.is_ident("name") {
                canonical = value;
            } else if meta.path.is_ident("alias") {
                aliases.push(value.to_ascii_lowercase());
            } else {
                return Err(meta.error("expected `name` or `alias`"));
            }
            Ok(())
        })?;
    }

    let mut accepted = vec![canonical.to_ascii_lowercase()];
    accepted.extend(aliases);
    Ok(ValueVariant {
        ident: variant.ident.clone(),
        canonical,
        accepted,
    })
}

fn lit(value: &str) -> LitStr {
    LitStr::new(value, Span::call_site())
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::expand;

    #[test]
    fn expand_joins_canonical_names_into_expected() {
        let input: DeriveInput = parse_quote! {
            enum StrategyKind {
                #[cli(alias = "2-opt")]
                TwoOpt,
                Dropout,
            }
        };
        let tokens = expand(&input).expect("expand").to_string();
        assert!(tokens.contains("\"two-opt|dropout\""));
        assert!(tokens.contains("\"2-opt\""));
        assert!(tokens.contains("\"strategy-kind\""));
    }

    #[test]
    fn expand_rejects_alias_shared_by_two_variants() {
        let input: DeriveInput = parse_quote! {
            enum LogLevel {
                Warn,
                #[cli(alias = "WARN")]
                Warning,
            }
        };
        let err = expand(&input).expect_err("duplicate alias");
        assert!(err.to_string().contains("`warn` is accepted by more than one variant"));
    }

    #[test]
    fn expand_rejects_data_variants_and_structs() {
        let with_data: DeriveInput = parse_quote! {
            enum Mode { Fixed(u32) }
        };
        assert!(expand(&with_data).is_err());

        let not_enum: DeriveInput = parse_quote! {
            struct Mode { seed: u64 }
        };
        assert!(expand(&not_enum).is_err());
    }

    #[test]
    fn expand_honors_option_override() {
        let input: DeriveInput = parse_quote! {
            #[cli_value(option = "log-format")]
            enum LogFormat { Compact, Pretty }
        };
        let tokens = expand(&input).expect("expand").to_string();
        assert!(tokens.contains("\"log-format\""));
        assert!(!tokens.contains("\"format\""));
    }
}
