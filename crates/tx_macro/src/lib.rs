extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, FnArg, ItemFn, Pat};

/// Wraps an async service method in a MongoDB transaction. The method
/// must take a `session: &mut Session` argument and return a `Result`
/// whose error converts from `mongodb::error::Error`. The original body
/// is emitted as `<name>_no_tx` for callers already inside a
/// transaction.
#[proc_macro_attribute]
pub fn tx(_args: TokenStream, input: TokenStream) -> TokenStream {
    let tx_fn = parse_macro_input!(input as ItemFn);
    let vis = &tx_fn.vis;
    let name = &tx_fn.sig.ident;
    let args = &tx_fn.sig.inputs;
    let ret = &tx_fn.sig.output;
    let body = &tx_fn.block;

    let inner = format_ident!("{}_no_tx", name);
    let mut forwarded = Vec::new();
    for arg in args {
        match arg {
            FnArg::Receiver(receiver) => {
                if receiver.reference.is_some() && receiver.mutability.is_none() {
                    forwarded.push(quote!(&self));
                } else {
                    forwarded.push(quote!(self));
                }
            }
            FnArg::Typed(typed) => {
                if let Pat::Ident(pat) = typed.pat.as_ref() {
                    let ident = &pat.ident;
                    forwarded.push(quote!(#ident));
                }
            }
        }
    }

    TokenStream::from(quote! {
        #vis async fn #inner(#args) #ret #body

        #vis async fn #name(#args) #ret {
            session.start_transaction().await?;
            match Self::#inner(#(#forwarded),*).await {
                Ok(value) => {
                    session.commit_transaction().await?;
                    Ok(value)
                }
                Err(err) => {
                    session.abort_transaction().await?;
                    Err(err)
                }
            }
        }
    })
}
