//! 宏工具函数

use proc_macro2::Span;
use quote::ToTokens;
use syn::{Expr, GenericArgument, Ident, Lit, Path, PathArguments, Result, Type, TypeParamBound};

/// 基础类型，按字面量注入
const BUILTIN_TYPES: &[&str] = &[
    "bool", "char", "str", "String", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16",
    "u32", "u64", "u128", "usize", "f32", "f64", "Vec", "HashMap", "BTreeMap", "HashSet",
    "BTreeSet", "Option",
];

/// 构造函数参数的分类
pub enum ParameterKind<'a> {
    /// `Arc<dyn Trait>`
    Interface(&'a Path),
    /// `Arc<T>`
    Class(&'a Type),
    /// 基础类型
    Builtin(&'a Type),
    /// 其他类型，只能由手动定义提供
    Untyped(&'a Type),
}

/// 对构造函数参数的类型分类
pub fn classify_parameter(ty: &Type) -> Result<ParameterKind<'_>> {
    match ty {
        Type::Reference(reference) => Err(syn::Error::new_spanned(
            reference,
            "自动装配的构造函数参数不能是引用，请使用 Arc<T> 或 Arc<dyn Trait>",
        )),
        Type::Tuple(_) | Type::Array(_) => Ok(ParameterKind::Builtin(ty)),
        Type::Path(type_path) => {
            let Some(segment) = type_path.path.segments.last() else {
                return Ok(ParameterKind::Untyped(ty));
            };
            if segment.ident == "Arc" {
                return match extract_generic_type(ty) {
                    Some(Type::TraitObject(object)) => {
                        interface_path(object).map(ParameterKind::Interface)
                    }
                    Some(inner) => Ok(ParameterKind::Class(inner)),
                    None => Ok(ParameterKind::Untyped(ty)),
                };
            }
            if BUILTIN_TYPES.iter().any(|builtin| segment.ident == builtin) {
                Ok(ParameterKind::Builtin(ty))
            } else {
                Ok(ParameterKind::Untyped(ty))
            }
        }
        _ => Ok(ParameterKind::Untyped(ty)),
    }
}

/// `dyn Trait` 只能有一个 trait 约束
fn interface_path(object: &syn::TypeTraitObject) -> Result<&Path> {
    let mut traits = object.bounds.iter().filter_map(|bound| match bound {
        TypeParamBound::Trait(bound) => Some(&bound.path),
        _ => None,
    });
    match (traits.next(), traits.next()) {
        (Some(path), None) if object.bounds.len() == 1 => Ok(path),
        _ => Err(syn::Error::new_spanned(
            object,
            "接口参数只能是单个 trait 对象，例如 Arc<dyn Logger>，额外的约束请写在 trait 定义上",
        )),
    }
}

/// 从类型中提取泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner_type)) => Some(inner_type),
            _ => None,
        },
        _ => None,
    }
}

/// 检查类型是否为 Result<T, E>
pub fn is_result_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "Result")
            .unwrap_or(false),
        _ => false,
    }
}

/// 类型的紧凑文本形式，用于描述符
pub fn type_to_string(ty: &Type) -> String {
    ty.to_token_stream().to_string().replace(' ', "")
}

/// 从 `name = "..."` 中取出字符串
pub fn string_value(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.value()),
            other => Err(syn::Error::new_spanned(other, "期望字符串字面量")),
        },
        other => Err(syn::Error::new_spanned(other, "期望字符串字面量")),
    }
}

/// 将驼峰命名转换为蛇形命名
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            // 检查前一个字符是否为小写，或者下一个字符是否为小写
            let prev_is_lower = chars.get(i - 1).map_or(false, |c| c.is_lowercase());
            let next_is_lower = chars.get(i + 1).map_or(false, |c| c.is_lowercase());

            if prev_is_lower || next_is_lower {
                result.push('_');
            }
        }
        result.push(ch.to_lowercase().next().unwrap_or(ch));
    }

    result
}

/// 验证完全限定名称的每一段是否为有效标识符
pub fn is_valid_type_name(s: &str) -> bool {
    !s.is_empty() && s.split("::").all(is_valid_identifier)
}

/// 验证标识符是否有效
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first_char) = chars.next() else {
        return false;
    };

    // 第一个字符必须是字母或下划线
    if !first_char.is_alphabetic() && first_char != '_' {
        return false;
    }

    // 其余字符必须是字母、数字或下划线
    chars.all(|ch| ch.is_alphanumeric() || ch == '_')
}

/// 生成唯一的标识符
pub fn generate_unique_ident(base_name: &str, suffix: &str) -> Ident {
    let unique_name = format!("__{}__{}", to_snake_case(base_name), suffix);
    Ident::new(&unique_name, Span::call_site())
}
