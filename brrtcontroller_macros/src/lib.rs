//! `#[actions]`: builds a controller's action table from its `impl` block.
//!
//! Every method taking `&self` or `&mut self` whose name ends in `_action`
//! becomes an action. `pub` methods are public, all others protected.
//! `#[action]` registers a method regardless of its name, `#[action(skip)]`
//! leaves one out.
//!
//! Parameters are bound by name; `#[param(default = expr)]` declares a
//! default, and `Option<T>` parameters default to `None`.
//!
//! ```ignore
//! #[actions]
//! impl TestController {
//!     pub fn some_other_action(
//!         &mut self,
//!         some_param: String,
//!         other_param: String,
//!         #[param(default = "wow")] param_with_default: String,
//!     ) -> String {
//!         format!("{some_param} {other_param} {param_with_default}")
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Expr, FnArg, ImplItem, ImplItemFn, ItemImpl, Pat, Type,
    Visibility,
};

struct ParamDef {
    ident: syn::Ident,
    ty: Type,
    default: Option<Expr>,
}

struct ActionDef {
    ident: syn::Ident,
    public: bool,
    params: Vec<ParamDef>,
}

fn is_option(ty: &Type) -> bool {
    if let Type::Path(p) = ty {
        if let Some(seg) = p.path.segments.last() {
            return seg.ident == "Option";
        }
    }
    false
}

/// `Some(true)` for `#[action]`, `Some(false)` for `#[action(skip)]`.
fn action_attr(attrs: &[Attribute]) -> syn::Result<Option<bool>> {
    let mut found = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("action")) {
        let mut include = true;
        if let syn::Meta::List(_) = &attr.meta {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    include = false;
                    Ok(())
                } else {
                    Err(meta.error("expected `skip`"))
                }
            })?;
        }
        found = Some(include);
    }
    Ok(found)
}

fn param_default(attrs: &[Attribute]) -> syn::Result<Option<Expr>> {
    let mut default = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("param")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                default = Some(meta.value()?.parse::<Expr>()?);
                Ok(())
            } else {
                Err(meta.error("expected `default = ...`"))
            }
        })?;
    }
    Ok(default)
}

fn parse_action(method: &mut ImplItemFn) -> syn::Result<Option<ActionDef>> {
    let explicit = action_attr(&method.attrs)?;
    method.attrs.retain(|a| !a.path().is_ident("action"));

    let sig = &mut method.sig;
    let has_receiver = matches!(sig.inputs.first(), Some(FnArg::Receiver(_)));
    let included = match explicit {
        Some(include) => include,
        None => has_receiver && sig.ident.to_string().ends_with("_action"),
    };
    if !included {
        return Ok(None);
    }

    match sig.inputs.first() {
        Some(FnArg::Receiver(r)) if r.reference.is_some() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                "action methods must take `&self` or `&mut self`",
            ))
        }
    }
    if sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(sig.asyncness, "action methods cannot be async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "action methods cannot be generic",
        ));
    }

    let mut params = Vec::new();
    for input in sig.inputs.iter_mut().skip(1) {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        let default = param_default(&pat_type.attrs)?;
        pat_type.attrs.retain(|a| !a.path().is_ident("param"));

        let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
            return Err(syn::Error::new_spanned(
                &pat_type.pat,
                "action parameters must be plain identifiers",
            ));
        };
        if let Type::Reference(_) = pat_type.ty.as_ref() {
            return Err(syn::Error::new_spanned(
                &pat_type.ty,
                "action parameters must be owned types",
            ));
        }
        let ident = pat_ident.ident.clone();
        params.push(ParamDef {
            ident,
            ty: (*pat_type.ty).clone(),
            default,
        });
    }

    Ok(Some(ActionDef {
        ident: sig.ident.clone(),
        public: matches!(method.vis, Visibility::Public(_)),
        params,
    }))
}

fn registration(self_ty: &Type, action: &ActionDef) -> TokenStream2 {
    let method = &action.ident;
    let name = method.to_string();
    let register = if action.public {
        quote!(public)
    } else {
        quote!(protected)
    };

    let specs = action.params.iter().map(|p| {
        let pname = p.ident.to_string();
        match &p.default {
            Some(expr) => quote! {
                ::brrtcontroller::ParamSpec::with_default(#pname, #expr)
            },
            None if is_option(&p.ty) => quote! {
                ::brrtcontroller::ParamSpec::with_default(
                    #pname,
                    ::brrtcontroller::__private::serde_json::Value::Null,
                )
            },
            None => quote! { ::brrtcontroller::ParamSpec::required(#pname) },
        }
    });

    let bindings = action.params.iter().enumerate().map(|(i, p)| {
        let ident = &p.ident;
        let ty = &p.ty;
        quote! { let #ident: #ty = __brrtc_args.extract::<#ty>(#i)?; }
    });
    let idents = action.params.iter().map(|p| &p.ident);

    quote! {
        .#register(
            #name,
            ::std::vec![#(#specs),*],
            |__brrtc_controller: &mut #self_ty, __brrtc_args: &::brrtcontroller::ActionArgs|
                -> ::std::result::Result<::brrtcontroller::ActionResult, ::brrtcontroller::DispatchError>
            {
                #(#bindings)*
                ::brrtcontroller::IntoActionResult::into_action_result(
                    __brrtc_controller.#method(#(#idents),*)
                )
            },
        )
    }
}

fn expand(mut item: ItemImpl) -> syn::Result<TokenStream2> {
    if item.trait_.is_some() {
        return Err(syn::Error::new_spanned(
            &item.self_ty,
            "#[actions] goes on an inherent impl block, not a trait impl",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[actions] does not support generic controllers",
        ));
    }

    let mut actions = Vec::new();
    for impl_item in &mut item.items {
        if let ImplItem::Fn(method) = impl_item {
            if let Some(action) = parse_action(method)? {
                actions.push(action);
            }
        }
    }

    let self_ty = item.self_ty.as_ref().clone();
    let registrations = actions.iter().map(|a| registration(&self_ty, a));

    Ok(quote! {
        #item

        impl ::brrtcontroller::Actions for #self_ty {
            fn actions() -> &'static ::brrtcontroller::ActionTable<Self> {
                static TABLE: ::brrtcontroller::__private::Lazy<::brrtcontroller::ActionTable<#self_ty>> =
                    ::brrtcontroller::__private::Lazy::new(|| {
                        ::brrtcontroller::ActionTable::new()
                            #(#registrations)*
                    });
                &TABLE
            }
        }
    })
}

/// Generate `Actions` for a controller from its inherent `impl` block.
#[proc_macro_attribute]
pub fn actions(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[actions] takes no arguments",
        )
        .to_compile_error()
        .into();
    }
    let input = parse_macro_input!(item as ItemImpl);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
