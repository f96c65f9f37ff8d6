mod cli_options;
mod cli_value;
mod timer;
mod utils;

use proc_macro::TokenStream;

/// Logs the wall time of the annotated function at debug level.
/// The label defaults to the function name.
#[proc_macro_attribute]
pub fn timer(attr: TokenStream, item: TokenStream) -> TokenStream {
    timer::timer_inner(attr, item)
}

#[proc_macro_derive(CliValue, attributes(cli_value, cli))]
pub fn derive_cli_value(item: TokenStream) -> TokenStream {
    cli_value::derive_cli_value_inner(item)
}

/// Generates `--long value` parsing, usage lines and a key/value `Display`
/// for an options struct. Field docs become the usage help text.
#[proc_macro_derive(CliOptions, attributes(cli))]
pub fn derive_cli_options(item: TokenStream) -> TokenStream {
    cli_options::derive_cli_options_inner(item)
}
