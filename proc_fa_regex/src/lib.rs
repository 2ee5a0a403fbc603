use quote::ToTokens;
use syn::{parse_macro_input, LitStr};

mod codegen;

/// Compiles a pattern into a minimized DFA at build time and expands to a value with a
/// `const fn test(&self, s: &str) -> bool` matcher. Malformed patterns are compile errors.
#[proc_macro]
pub fn regex(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let pattern = parse_macro_input!(input as LitStr);

    match fa_regex_compiler::compile(&pattern.value()) {
        Ok(compiled) => codegen::Matcher::new(compiled.minimized())
            .to_token_stream()
            .into(),
        Err(e) => syn::Error::new(pattern.span(), e.to_string())
            .to_compile_error()
            .into(),
    }
}
