#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;
use syn::ItemFn;
use syn::parse_macro_input;
use syn::punctuated::Punctuated;
use syn::token::Comma;

/// A macro that makes the function marked as a `#[test]` function and also initializes the test_logger().
///
/// With `#[pdbg_test(reset)]` the run counters of the default debugger are
/// cleared before the body runs, so that tests using the `pd!` macro start
/// from the first run.
#[proc_macro_attribute]
pub fn pdbg_test(attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let flags = parse_macro_input!(attr with Punctuated::<Ident, Comma>::parse_terminated);
    let input = parse_macro_input!(item as ItemFn);

    let mut reset = false;
    for flag in &flags {
        if flag == "reset" {
            reset = true;
        } else {
            return syn::Error::new(flag.span(), format!("unknown pdbg_test option `{flag}`"))
                .to_compile_error()
                .into();
        }
    }

    pdbg_test_impl(input, reset).into()
}

fn pdbg_test_impl(input: ItemFn, reset: bool) -> TokenStream {
    let block = &input.block;
    let attrs = &input.attrs;
    let sig = &input.sig;

    let reset_stmt = if reset {
        quote! { ::pdbg::reset(); }
    } else {
        quote! {}
    };

    quote! {
        #[test]
        #(#attrs)*
        #sig {
            let __logger = pdbg_utilities::test_logger();
            #reset_stmt
            #block
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn test_pdbg_test_wraps_body() {
        let input: ItemFn = parse_quote! {
            fn prints_once() {
                assert!(true);
            }
        };

        let output = pdbg_test_impl(input, false).to_string();
        assert!(output.starts_with("# [test]"));
        assert!(output.contains("test_logger"));
        assert!(!output.contains("reset"));
    }

    #[test]
    fn test_pdbg_test_reset() {
        let input: ItemFn = parse_quote! {
            fn prints_once() {}
        };

        let output = pdbg_test_impl(input, true).to_string();
        assert!(output.contains(":: pdbg :: reset ()"));
    }
}
