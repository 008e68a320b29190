use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, ImplItem, ImplItemFn, ItemImpl, Stmt, Variant,
    Visibility,
};

/// Procedural macro that completes an error enum for use across the FFI boundary.
///
/// This macro automatically:
/// 1. Adds `#[derive(Debug, thiserror::Error, uniffi::Error)]` and `#[uniffi(flat_error)]`
/// 2. Adds a `Generic { message: String }` variant if not already present
/// 3. Implements `From<anyhow::Error>` so `anyhow` chains collapse into `Generic`
///
/// # Usage
///
/// ```rust,ignore
/// #[vouch_error]
/// pub enum SessionError {
///     #[error("session expired after {seconds} seconds")]
///     Expired { seconds: u32 },
/// }
/// ```
#[proc_macro_attribute]
pub fn vouch_error(_args: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(&input, "vouch_error can only be applied to enums")
            .to_compile_error()
            .into();
    };

    let enum_name = &input.ident;
    let visibility = &input.vis;
    let generics = &input.generics;

    // Strip pre-existing derive/uniffi attributes so ours don't conflict.
    let attrs: Vec<_> = input
        .attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("derive") && !attr.path().is_ident("uniffi"))
        .collect();

    let mut variants = data_enum.variants.clone();

    let has_generic = variants.iter().any(|variant| variant.ident == "Generic");
    if !has_generic {
        let generic_variant: Variant = syn::parse_quote! {
            /// A generic error that can wrap any anyhow error.
            #[error("Generic error: {message}")]
            Generic {
                /// The error message from the wrapped error.
                message: String
            }
        };
        variants.push(generic_variant);
    }

    let expanded = quote! {
        // Automatically import anyhow::Context for convenience
        use anyhow::Context;

        #[derive(Debug, thiserror::Error, uniffi::Error)]
        #[uniffi(flat_error)]
        #(#attrs)*
        #visibility enum #enum_name #generics {
            #variants
        }

        impl #generics From<anyhow::Error> for #enum_name #generics {
            fn from(err: anyhow::Error) -> Self {
                Self::Generic {
                    message: {
                        // Include the full error chain in the message
                        let mut message = err.to_string();

                        let chain: Vec<String> = err.chain().skip(1).map(|e| e.to_string()).collect();
                        if !chain.is_empty() {
                            message.push_str(" (caused by: ");
                            message.push_str(&chain.join(" -> "));
                            message.push(')');
                        }

                        message
                    }
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Procedural macro that wraps `uniffi::export` and automatically injects logging context
///
/// This macro automatically:
/// 1. Forwards the attribute to `#[uniffi::export]`
/// 2. Injects `let _vouch_logger_ctx = crate::primitives::logger::LogContext::new("TypeName");`
///    at the start of every `pub fn`, so log lines from the method carry a `[Vouch][TypeName]` prefix
/// 3. Automatically adds `async_runtime = "tokio"` if any public async functions are detected
///
/// # Usage
///
/// ```rust,ignore
/// #[vouch_export]
/// impl VerificationBridge {
///     pub async fn launch_verification(&self, request: VerificationRequest) -> ... {
///         // _vouch_logger_ctx is automatically injected here
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn vouch_export(args: TokenStream, input: TokenStream) -> TokenStream {
    let input_impl = parse_macro_input!(input as ItemImpl);

    // The self type of the impl block names the logging context.
    let type_name = match &*input_impl.self_ty {
        syn::Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map_or_else(|| "Unknown".to_string(), |segment| segment.ident.to_string()),
        _ => "Unknown".to_string(),
    };

    let has_async_functions = has_public_async_fns(&input_impl.items);

    let mut new_items = Vec::new();
    for item in &input_impl.items {
        match item {
            ImplItem::Fn(method) if matches!(method.vis, Visibility::Public(_)) => {
                let mut new_method = method.clone();
                inject_logging_context(&mut new_method, &type_name);
                new_items.push(ImplItem::Fn(new_method));
            }
            // Private methods and other items pass through unchanged.
            _ => new_items.push(item.clone()),
        }
    }

    let new_impl = ItemImpl {
        items: new_items,
        ..input_impl
    };

    let mut args = proc_macro2::TokenStream::from(args);
    if has_async_functions {
        args = if args.is_empty() {
            quote! { async_runtime = "tokio" }
        } else {
            quote! { #args, async_runtime = "tokio" }
        };
    }

    quote! {
        #[uniffi::export(#args)]
        #new_impl
    }
    .into()
}

/// Check whether any public function in the impl items is async
fn has_public_async_fns(impl_items: &[ImplItem]) -> bool {
    impl_items.iter().any(|item| {
        if let ImplItem::Fn(method) = item {
            matches!(method.vis, Visibility::Public(_)) && method.sig.asyncness.is_some()
        } else {
            false
        }
    })
}

/// Inject the logging context statement at the start of a function body
fn inject_logging_context(method: &mut ImplItemFn, type_name: &str) {
    let context_stmt: Stmt = syn::parse_quote! {
        let _vouch_logger_ctx = crate::primitives::logger::LogContext::new(#type_name);
    };

    method.block.stmts.insert(0, context_stmt);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_async_detection_with_public_async_fn() {
        let impl_block: ItemImpl = syn::parse_quote! {
            impl VerificationBridge {
                pub fn attach_host(&self) {}

                pub async fn launch_verification(&self) -> u32 {
                    42
                }
            }
        };

        assert!(has_public_async_fns(&impl_block.items));
    }

    #[test]
    fn test_async_detection_without_async_fns() {
        let impl_block: ItemImpl = syn::parse_quote! {
            impl VouchConfig {
                pub fn environment(&self) -> String {
                    "staging".to_string()
                }
            }
        };

        assert!(!has_public_async_fns(&impl_block.items));
    }

    #[test]
    fn test_async_detection_ignores_private_async_fns() {
        let impl_block: ItemImpl = syn::parse_quote! {
            impl VerificationBridge {
                pub fn teardown(&self) {}

                async fn launch_from_call(&self) -> u32 {
                    7
                }
            }
        };

        assert!(!has_public_async_fns(&impl_block.items));
    }

    #[test]
    fn test_context_injection_prepends_statement() {
        let impl_block: ItemImpl = syn::parse_quote! {
            impl VerificationBridge {
                pub fn detach_host(&self) {
                    let _ = 1;
                }
            }
        };

        let ImplItem::Fn(method) = &impl_block.items[0] else {
            panic!("expected a method");
        };
        let mut method = method.clone();
        let before = method.block.stmts.len();
        inject_logging_context(&mut method, "VerificationBridge");
        assert_eq!(method.block.stmts.len(), before + 1);
    }
}
