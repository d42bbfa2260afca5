//! 构造函数登记宏实现
//!
//! 把 `new`（或指定的关联函数）的参数列表登记为构造函数签名，并生成按顺序取出实参的工厂

use crate::utils::{
    classify_parameter, generate_unique_ident, is_result_type, string_value, type_to_string,
    ParameterKind,
};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, FnArg, ImplItem,
    ImplItemFn, ItemImpl, Meta, Pat, Result, ReturnType, Token, Type,
};

/// 构造函数登记参数
#[derive(Debug, Clone)]
pub struct AutowireArgs {
    /// 构造函数名称
    pub constructor: String,
}

impl Default for AutowireArgs {
    fn default() -> Self {
        Self {
            constructor: "new".to_string(),
        }
    }
}

impl Parse for AutowireArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = AutowireArgs::default();

        for meta in Punctuated::<Meta, Token![,]>::parse_terminated(input)? {
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("constructor") => {
                    args.constructor = string_value(&nv.value)?;
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "未知参数，可用参数: constructor = \"..\"",
                    ))
                }
            }
        }

        Ok(args)
    }
}

/// 实现 #[autowire] 宏
pub fn autowire_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let autowire_args = match syn::parse::<AutowireArgs>(args) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };

    let input_impl = parse_macro_input!(input as ItemImpl);

    match generate_constructor_registration(&input_impl, &autowire_args) {
        Ok(registration) => TokenStream::from(quote! {
            #input_impl

            #registration
        }),
        Err(e) => {
            let error = e.to_compile_error();
            TokenStream::from(quote! {
                #input_impl

                #error
            })
        }
    }
}

fn generate_constructor_registration(
    input_impl: &ItemImpl,
    args: &AutowireArgs,
) -> Result<TokenStream2> {
    if let Some((_, trait_path, _)) = &input_impl.trait_ {
        return Err(syn::Error::new_spanned(
            trait_path,
            "#[autowire] 只能用于固有 impl 块",
        ));
    }
    if !input_impl.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&input_impl.generics, "组件不能带泛型参数"));
    }

    let self_ty = input_impl.self_ty.as_ref();
    let Type::Path(self_path) = self_ty else {
        return Err(syn::Error::new_spanned(self_ty, "#[autowire] 只能用于具名结构体"));
    };
    let Some(self_ident) = self_path.path.segments.last().map(|segment| &segment.ident) else {
        return Err(syn::Error::new_spanned(self_ty, "#[autowire] 只能用于具名结构体"));
    };

    let constructor = find_constructor(input_impl, &args.constructor)?;
    let constructor_name = &constructor.sig.ident;

    if constructor.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(&constructor.sig, "构造函数不能是 async"));
    }
    if !constructor.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &constructor.sig.generics,
            "构造函数不能带泛型参数",
        ));
    }

    let mut parameters = Vec::new();
    let mut extractions = Vec::new();
    let mut bindings = Vec::new();

    for (index, input) in constructor.sig.inputs.iter().enumerate() {
        let FnArg::Typed(pat_type) = input else {
            return Err(syn::Error::new_spanned(input, "构造函数不能接收 self"));
        };
        let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
            return Err(syn::Error::new_spanned(
                &pat_type.pat,
                "构造函数参数必须是简单标识符",
            ));
        };

        let name = pat_ident.ident.to_string();
        let name = name.trim_start_matches('_').to_string();
        let binding = generate_unique_ident("argument", &index.to_string());
        let ty = pat_type.ty.as_ref();

        let (parameter, extraction) = match classify_parameter(ty)? {
            ParameterKind::Interface(path) => (
                quote! {
                    ::infrastructure_common::ConstructorParameter::typed(
                        #name,
                        <dyn #path as ::infrastructure_common::Named>::NAME,
                    )
                },
                quote! { arguments.interface::<dyn #path>(#name)? },
            ),
            ParameterKind::Class(inner) => (
                quote! {
                    ::infrastructure_common::ConstructorParameter::typed(
                        #name,
                        <#inner as ::infrastructure_common::Named>::NAME,
                    )
                },
                quote! { arguments.class::<#inner>(#name)? },
            ),
            ParameterKind::Builtin(builtin) => {
                let type_name = type_to_string(builtin);
                (
                    quote! { ::infrastructure_common::ConstructorParameter::builtin(#name, #type_name) },
                    quote! { arguments.literal::<#builtin>(#name)? },
                )
            }
            ParameterKind::Untyped(other) => (
                quote! { ::infrastructure_common::ConstructorParameter::untyped(#name) },
                quote! { arguments.literal::<#other>(#name)? },
            ),
        };

        parameters.push(parameter);
        extractions.push(quote! { let #binding = #extraction; });
        bindings.push(binding);
    }

    let returns_result = match &constructor.sig.output {
        ReturnType::Type(_, ty) => is_result_type(ty),
        ReturnType::Default => {
            return Err(syn::Error::new_spanned(
                &constructor.sig,
                "构造函数必须返回 Self 或 Result<Self, E>",
            ))
        }
    };

    let call = quote! { <#self_ty>::#constructor_name(#(#bindings),*) };
    let instance = if returns_result {
        quote! {
            #call.map_err(|e| ::infrastructure_common::DependencyError::ComponentCreationFailed {
                type_name: arguments.type_name().to_string(),
                source: ::core::convert::Into::into(e),
            })?
        }
    } else {
        call
    };

    let registration_fn_name =
        generate_unique_ident(&self_ident.to_string(), "register_constructor");

    Ok(quote! {
        #[::ctor::ctor]
        fn #registration_fn_name() {
            fn factory(
                arguments: &mut ::infrastructure_common::Arguments,
            ) -> ::core::result::Result<
                ::infrastructure_common::Instance,
                ::infrastructure_common::DependencyError,
            > {
                #(#extractions)*
                let instance = #instance;
                ::core::result::Result::Ok(
                    ::std::sync::Arc::new(instance) as ::infrastructure_common::Instance
                )
            }

            ::infrastructure_common::global_type_registry().register_constructor(
                <#self_ty as ::infrastructure_common::Named>::NAME,
                ::std::vec![#(#parameters),*],
                factory,
            );
        }
    })
}

fn find_constructor<'a>(input_impl: &'a ItemImpl, name: &str) -> Result<&'a ImplItemFn> {
    input_impl
        .items
        .iter()
        .find_map(|item| match item {
            ImplItem::Fn(function) if function.sig.ident == name => Some(function),
            _ => None,
        })
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input_impl.self_ty,
                format!("impl 块中没有找到构造函数 `{}`", name),
            )
        })
}
