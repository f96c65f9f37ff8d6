use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Path, parse_macro_input, spanned::Spanned};

use crate::utils;

pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "CliOptions can only be derived for structs")
            .to_compile_error()
            .into();
    };

    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "CliOptions requires named fields")
            .to_compile_error()
            .into();
    };

    let mut arms = Vec::new();
    let mut usage_specs = Vec::new();
    let mut usage_helps = Vec::new();
    let mut display_keys = Vec::new();
    let mut display_vals = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };

        let mut long_name: Option<String> = None;
        let mut parse_with: Option<Path> = None;

        for attr in &field.attrs {
            if !attr.path().is_ident("cli") {
                continue;
            }
            let parse_result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("long") {
                    let lit: LitStr = meta.value()?.parse()?;
                    long_name = Some(lit.value());
                    return Ok(());
                }
                if meta.path.is_ident("parse_with") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parse_with = Some(syn::parse_str(&lit.value())?);
                    return Ok(());
                }
                Err(meta.error("unsupported cli attribute; expected long/parse_with"))
            });
            if let Err(err) = parse_result {
                return err.to_compile_error().into();
            }
        }

        display_keys.push(field_ident.to_string());
        display_vals.push(quote! { &self.#field_ident });

        let Some(long_name) = long_name else {
            continue;
        };
        let long_lit = LitStr::new(&long_name, Span::call_site());
        let help = utils::doc_text(&field.attrs);

        if utils::is_bool(&field.ty) {
            let negated = format!("no-{long_name}");
            let negated_lit = LitStr::new(&negated, Span::call_site());
            let parse_expr = utils::build_bool_parse_expr();

            arms.push(quote! {
                #long_lit => {
                    self.#field_ident = match value {
                        Some(raw) => #parse_expr,
                        None => true,
                    };
                    Ok(true)
                }
            });
            arms.push(quote! {
                #negated_lit => {
                    if value.is_some() {
                        return Err(crate::Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    self.#field_ident = false;
                    Ok(true)
                }
            });
            usage_specs.push(format!("--{long_name}[=<bool>]"));
            usage_helps.push(help);
            usage_specs.push(format!("--{negated}"));
            usage_helps.push(String::new());
        } else {
            let parse_expr = utils::build_cli_parse_expr(&field.ty, parse_with.as_ref());
            arms.push(quote! {
                #long_lit => {
                    let raw = value.ok_or_else(|| {
                        crate::Error::invalid_input(format!("Missing value for --{name}"))
                    })?;
                    self.#field_ident = #parse_expr;
                    Ok(true)
                }
            });
            usage_specs.push(format!(
                "--{long_name} {}",
                utils::placeholder_for_type(&field.ty)
            ));
            usage_helps.push(help);
        }
    }

    let spec_width = usage_specs.iter().map(String::len).max().unwrap_or(0);
    let usage_text = usage_specs
        .iter()
        .zip(&usage_helps)
        .map(|(spec, help)| {
            if help.is_empty() {
                format!("  {spec}\n")
            } else {
                format!("  {spec:<spec_width$}  {help}\n")
            }
        })
        .collect::<String>();
    let usage_lit = LitStr::new(&usage_text, Span::call_site());

    let key_width = display_keys.iter().map(String::len).max().unwrap_or(0);
    let display_format = display_keys
        .iter()
        .map(|key| format!("\n\t{key:<key_width$} = {{}}"))
        .collect::<String>();
    let display_lit = LitStr::new(&display_format, Span::call_site());

    let expanded = quote! {
        impl #struct_ident {
            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                if let Some((k, v)) = raw_name.split_once('=') {
                    return (k.to_string(), Some(v.to_string()));
                }

                let value = match args.peek() {
                    Some(next) if !next.starts_with("--") => args.next(),
                    _ => None,
                };

                (raw_name.to_string(), value)
            }

            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms,)*
                    _ => Ok(false),
                }
            }

            /// One line per recognised option, aligned for `--help` output.
            pub fn option_lines() -> &'static str {
                #usage_lit
            }
        }

        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, #display_lit, #(#display_vals),*)
            }
        }
    };

    TokenStream::from(expanded)
}
