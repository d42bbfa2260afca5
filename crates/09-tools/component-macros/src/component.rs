//! 组件注册宏实现

use crate::utils::{generate_unique_ident, is_valid_type_name, string_value};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Fields, Ident,
    ItemStruct, Meta, Path, Result, Token,
};

/// 组件配置参数
#[derive(Debug, Clone, Default)]
pub struct ComponentArgs {
    /// 实现 `Service`
    pub service: bool,
    /// 实现 `CliService`
    pub cli: bool,
    /// 实现的其他接口
    pub implements: Vec<Path>,
    /// 自定义完全限定名称
    pub name: Option<String>,
    /// 通过 `Default` 创建实例
    pub default: bool,
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = ComponentArgs::default();

        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        for meta in parsed {
            match meta {
                Meta::Path(path) if path.is_ident("service") => args.service = true,
                Meta::Path(path) if path.is_ident("cli") => args.cli = true,
                Meta::Path(path) if path.is_ident("default") => args.default = true,
                Meta::List(list) if list.path.is_ident("implements") => {
                    let paths =
                        list.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)?;
                    args.implements.extend(paths);
                }
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    let name = string_value(&nv.value)?;
                    if !is_valid_type_name(&name) {
                        return Err(syn::Error::new_spanned(&nv.value, "无效的类型名称"));
                    }
                    args.name = Some(name);
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "未知参数，可用参数: service, cli, default, implements(..), name = \"..\"",
                    ))
                }
            }
        }

        Ok(args)
    }
}

/// 实现 #[component] 宏
pub fn component_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let component_args = if args.is_empty() {
        ComponentArgs::default()
    } else {
        match syn::parse::<ComponentArgs>(args) {
            Ok(args) => args,
            Err(e) => return e.to_compile_error().into(),
        }
    };

    let input_struct = parse_macro_input!(input as ItemStruct);

    if !input_struct.generics.params.is_empty() {
        return syn::Error::new_spanned(&input_struct.generics, "组件不能带泛型参数")
            .to_compile_error()
            .into();
    }

    let struct_name = &input_struct.ident;
    let name_expr = type_name_expr(struct_name, component_args.name.as_deref());
    let named_impl = quote! {
        impl ::infrastructure_common::Named for #struct_name {
            const NAME: &'static str = #name_expr;
        }
    };

    let registration_code =
        generate_registration_code(struct_name, &input_struct.fields, &component_args);

    let expanded = quote! {
        #input_struct

        #named_impl

        #registration_code
    };

    TokenStream::from(expanded)
}

/// 默认名称为 `模块路径::类型名`
pub fn type_name_expr(ident: &Ident, custom: Option<&str>) -> TokenStream2 {
    match custom {
        Some(name) => quote! { #name },
        None => quote! { concat!(module_path!(), "::", stringify!(#ident)) },
    }
}

/// 生成向上转换函数，返回 `CastFn`
pub fn generate_cast_fn(struct_name: &Ident, interface: &TokenStream2) -> TokenStream2 {
    quote! {
        {
            fn __cast(
                instance: ::infrastructure_common::Instance,
            ) -> ::core::option::Option<::std::boxed::Box<dyn ::std::any::Any>> {
                let concrete = instance.downcast::<#struct_name>().ok()?;
                let upcast: ::std::sync::Arc<#interface> = concrete;
                ::core::option::Option::Some(::std::boxed::Box::new(upcast))
            }
            __cast as ::infrastructure_common::CastFn
        }
    }
}

/// 生成组件自动注册代码
fn generate_registration_code(
    struct_name: &Ident,
    fields: &Fields,
    args: &ComponentArgs,
) -> TokenStream2 {
    let registration_fn_name =
        generate_unique_ident(&struct_name.to_string(), "register_component");

    let mut interfaces: Vec<TokenStream2> = Vec::new();
    if args.service {
        interfaces.push(quote! { dyn ::infrastructure_common::Service });
    }
    if args.cli {
        interfaces.push(quote! { dyn ::infrastructure_common::CliService });
    }
    interfaces.extend(args.implements.iter().map(|path| quote! { dyn #path }));

    let implements = interfaces.iter().map(|interface| {
        let cast = generate_cast_fn(struct_name, interface);
        quote! {
            .implements_with(<#interface as ::infrastructure_common::Named>::NAME, #cast)
        }
    });

    // 没有字段的结构体或者显式要求 Default 时直接生成工厂
    let construct = if args.default {
        Some(quote! { <#struct_name as ::core::default::Default>::default() })
    } else {
        match fields {
            Fields::Unit => Some(quote! { #struct_name }),
            Fields::Named(named) if named.named.is_empty() => Some(quote! { #struct_name {} }),
            Fields::Unnamed(unnamed) if unnamed.unnamed.is_empty() => {
                Some(quote! { #struct_name() })
            }
            _ => None,
        }
    };
    let factory = construct.map(|construct| {
        quote! {
            .with_factory(|_arguments| {
                ::core::result::Result::Ok(
                    ::std::sync::Arc::new(#construct) as ::infrastructure_common::Instance
                )
            })
        }
    });

    quote! {
        // 使用 ctor 在程序启动时自动登记类型
        #[::ctor::ctor]
        fn #registration_fn_name() {
            let descriptor = ::infrastructure_common::TypeDescriptor::concrete(
                <#struct_name as ::infrastructure_common::Named>::NAME,
            )
            #(#implements)*
            #factory
            .with_source(concat!(file!(), ":", line!()));

            ::infrastructure_common::global_type_registry().register(descriptor);
        }
    }
}
