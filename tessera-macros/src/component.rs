//! The `#[component]` attribute.

use proc_macro::TokenStream;
use quote::quote;
use syn::{FnArg, Ident, ItemFn, LitStr, ReturnType, Token, parse::Parse, parse_macro_input};

/// Arguments for the `#[component]` macro.
pub(crate) struct ComponentArgs {
    /// Element name the factory is registered under.
    pub element: LitStr,
}

impl Parse for ComponentArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut element = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "element" => {
                    let lit: LitStr = input.parse()?;
                    if lit.value().trim().is_empty() {
                        return Err(syn::Error::new(lit.span(), "element name must not be empty"));
                    }
                    element = Some(lit);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        match element {
            Some(element) => Ok(ComponentArgs { element }),
            None => Err(input.error("missing `element = \"...\"`")),
        }
    }
}

pub fn component_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ComponentArgs);
    let input = parse_macro_input!(item as ItemFn);

    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let fn_block = &input.block;
    let element = &args.element;

    if let Some(asyncness) = &input.sig.asyncness {
        return syn::Error::new_spanned(asyncness, "component factory must not be async")
            .to_compile_error()
            .into();
    }

    let inputs = &input.sig.inputs;
    let (props_pat, props_type) = match (inputs.len(), inputs.first()) {
        (1, Some(FnArg::Typed(pat_type))) => (&pat_type.pat, &pat_type.ty),
        _ => {
            return syn::Error::new_spanned(
                inputs,
                "component factory must take exactly one argument: fn(props: Props)",
            )
            .to_compile_error()
            .into();
        }
    };

    let output = match &input.sig.output {
        ReturnType::Type(_, ty) => ty,
        ReturnType::Default => {
            return syn::Error::new_spanned(
                &input.sig,
                "component factory must return the component it builds",
            )
            .to_compile_error()
            .into();
        }
    };

    let static_name = Ident::new(
        &format!("__COMPONENT_INSTANCE_{}", fn_name).to_uppercase(),
        fn_name.span(),
    );

    let expanded = quote! {
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #[doc = concat!("Auto-generated ComponentFactory from `#[tessera::component]` on `", stringify!(#fn_name), "`")]
        #fn_vis struct #fn_name;

        impl #fn_name {
            /// Element name the component is registered under.
            pub const ELEMENT: &'static str = #element;
        }

        impl ::tessera::ComponentFactory for #fn_name {
            fn element(&self) -> &str {
                #element
            }

            fn create(&self, __props: ::tessera::Props) -> ::std::boxed::Box<dyn ::tessera::Component> {
                fn __build(#props_pat: #props_type) -> #output #fn_block
                ::std::boxed::Box::new(__build(__props))
            }
        }

        #[allow(non_upper_case_globals)]
        static #static_name: #fn_name = #fn_name;

        ::tessera::inventory::submit! {
            ::tessera::source::ComponentRegistration {
                element: #element,
                factory: &#static_name,
            }
        }
    };

    TokenStream::from(expanded)
}
