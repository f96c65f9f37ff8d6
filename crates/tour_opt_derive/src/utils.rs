use quote::quote;
use syn::{Attribute, Expr, ExprLit, Lit, Meta, Path, Type, TypePath};

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (idx, ch) in s.chars().enumerate() {
        if ch == '_' {
            out.push('-');
        } else if ch.is_ascii_uppercase() {
            if idx != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn is_bool(ty: &Type) -> bool {
    matches!(ty, Type::Path(TypePath { qself: None, path }) if path.is_ident("bool"))
}

/// Joins the `///` lines of a field into one help sentence.
pub fn doc_text(attrs: &[Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let Meta::NameValue(nv) = &attr.meta
            && let Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) = &nv.value
        {
            let line = lit.value();
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }
    }
    lines.join(" ")
}

/// `<u64>`-style placeholder taken from the last path segment of the field type.
pub fn placeholder_for_type(ty: &Type) -> String {
    if let Type::Path(TypePath { path, .. }) = ty
        && let Some(seg) = path.segments.last()
    {
        let name = seg.ident.to_string();
        return match name.as_str() {
            "String" | "PathBuf" => String::from("<path>"),
            _ => format!("<{}>", to_kebab_case(&name)),
        };
    }
    String::from("<value>")
}

pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    if let Some(parse_with) = parse_with {
        quote! { #parse_with(&raw)? }
    } else {
        quote! {
            raw.parse::<#ty>()
                .map_err(|e| crate::Error::invalid_input(format!(
                    "Invalid value for --{name}: {raw} ({e})"
                )))?
        }
    }
}

pub fn build_bool_parse_expr() -> proc_macro2::TokenStream {
    quote! {
        match raw.as_str() {
            "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => true,
            "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => false,
            _ => {
                return Err(crate::Error::invalid_input(format!(
                    "Invalid boolean for --{name}: {raw} (expected true/false)"
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{doc_text, is_bool, placeholder_for_type, to_kebab_case};

    #[test]
    fn to_kebab_case_handles_pascal_and_snake_names() {
        assert_eq!(to_kebab_case("LogLevel"), "log-level");
        assert_eq!(to_kebab_case("TwoOpt"), "two-opt");
        assert_eq!(to_kebab_case("dropout_threshold"), "dropout-threshold");
        assert_eq!(to_kebab_case("X"), "x");
    }

    #[test]
    fn is_bool_only_matches_plain_bool() {
        let flag: syn::Type = parse_quote!(bool);
        let wrapped: syn::Type = parse_quote!(Option<bool>);
        let number: syn::Type = parse_quote!(u64);

        assert!(is_bool(&flag));
        assert!(!is_bool(&wrapped));
        assert!(!is_bool(&number));
    }

    #[test]
    fn placeholder_for_type_uses_last_segment() {
        let seed: syn::Type = parse_quote!(u64);
        let strategy: syn::Type = parse_quote!(crate::options::StrategyKind);
        let path: syn::Type = parse_quote!(String);

        assert_eq!(placeholder_for_type(&seed), "<u64>");
        assert_eq!(placeholder_for_type(&strategy), "<strategy-kind>");
        assert_eq!(placeholder_for_type(&path), "<path>");
    }

    #[test]
    fn doc_text_joins_non_empty_doc_lines() {
        let field: syn::Field = parse_quote! {
            /// Number of restarts.
            ///
            /// Runs in parallel.
            pub restarts: usize
        };
        assert_eq!(doc_text(&field.attrs), "Number of restarts. Runs in parallel.");
    }
}
