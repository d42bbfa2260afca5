//! 接口登记宏实现

use crate::component::type_name_expr;
use crate::utils::{generate_unique_ident, is_valid_type_name, string_value};
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, ItemTrait, Meta,
    Path, Result, Token,
};

/// 接口配置参数
#[derive(Debug, Clone, Default)]
pub struct InterfaceArgs {
    /// 继承的接口
    pub extends: Vec<Path>,
    /// 自定义完全限定名称
    pub name: Option<String>,
}

impl Parse for InterfaceArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = InterfaceArgs::default();

        for meta in Punctuated::<Meta, Token![,]>::parse_terminated(input)? {
            match meta {
                Meta::List(list) if list.path.is_ident("extends") => {
                    let paths =
                        list.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)?;
                    args.extends.extend(paths);
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
                        "未知参数，可用参数: extends(..), name = \"..\"",
                    ))
                }
            }
        }

        Ok(args)
    }
}

/// 实现 #[interface] 宏
pub fn interface_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let interface_args = match syn::parse::<InterfaceArgs>(args) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };

    let input_trait = parse_macro_input!(input as ItemTrait);

    if !input_trait.generics.params.is_empty() {
        return syn::Error::new_spanned(&input_trait.generics, "接口不能带泛型参数")
            .to_compile_error()
            .into();
    }

    let trait_name = &input_trait.ident;
    let name_expr = type_name_expr(trait_name, interface_args.name.as_deref());
    let registration_fn_name =
        generate_unique_ident(&trait_name.to_string(), "register_interface");
    let extends = interface_args.extends.iter().map(|parent| {
        quote! {
            .implements(<dyn #parent as ::infrastructure_common::Named>::NAME)
        }
    });

    let expanded = quote! {
        #input_trait

        impl ::infrastructure_common::Named for dyn #trait_name {
            const NAME: &'static str = #name_expr;
        }

        #[::ctor::ctor]
        fn #registration_fn_name() {
            let descriptor = ::infrastructure_common::TypeDescriptor::interface(
                <dyn #trait_name as ::infrastructure_common::Named>::NAME,
            )
            #(#extends)*
            .with_source(concat!(file!(), ":", line!()));

            ::infrastructure_common::global_type_registry().register(descriptor);
        }
    };

    TokenStream::from(expanded)
}
