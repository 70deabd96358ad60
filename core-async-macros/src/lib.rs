//! Attribute macros for `core-async`.
//!
//! - `#[core_async::test]` runs an `async fn` test on a single-threaded runtime.
//! - `#[core_async::main]` runs an `async fn main` through
//!   `core_async::bridge::run_to_drain`, so tasks spawned by `main` are
//!   drained before the process exits.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, ItemFn};

#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr, item, MacroKind::Test)
}

#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr, item, MacroKind::Main)
}

enum MacroKind {
    Test,
    Main,
}

fn expand(attr: TokenStream, item: TokenStream, kind: MacroKind) -> TokenStream {
    if !attr.is_empty() {
        let tokens = TokenStream2::from(attr);
        return syn::Error::new_spanned(
            tokens,
            "core_async attribute macros do not accept arguments",
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(item as ItemFn);

    if input.sig.asyncness.is_none() {
        return syn::Error::new_spanned(
            input.sig.fn_token,
            "core_async attribute macros require `async fn`",
        )
        .to_compile_error()
        .into();
    }

    let mut sync_sig = input.sig.clone();
    sync_sig.asyncness = None;

    let attrs = input.attrs;
    let vis = input.vis;
    let block = input.block;

    match kind {
        MacroKind::Test => expand_test(attrs, vis, sync_sig, block),
        MacroKind::Main => expand_main(attrs, vis, sync_sig, block),
    }
}

fn expand_test(
    attrs: Vec<syn::Attribute>,
    vis: syn::Visibility,
    sync_sig: syn::Signature,
    block: Box<syn::Block>,
) -> TokenStream {
    quote! {
        #(#attrs)*
        #[test]
        #vis #sync_sig {
            core_async::runtime::block_on(async move #block)
        }
    }
    .into()
}

fn expand_main(
    attrs: Vec<syn::Attribute>,
    vis: syn::Visibility,
    sync_sig: syn::Signature,
    block: Box<syn::Block>,
) -> TokenStream {
    quote! {
        #(#attrs)*
        #vis #sync_sig {
            match core_async::bridge::run_to_drain(async move #block) {
                Ok(output) => output,
                Err(err) => panic!("core_async::main: {}", err),
            }
        }
    }
    .into()
}
