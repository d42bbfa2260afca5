//! 约定规范定义
//!
//! 提供命名空间、文件名和参数名之间的命名约定

/// 命名空间分隔符
pub const NAMESPACE_SEPARATOR: &str = "::";

/// 保留给解析器自身启动参数的参数名，基础类型也不会报错
pub const RESERVED_PARAMETERS: [&str; 2] = ["psr4_prefixes", "project_namespace"];

/// 命名约定规范
#[derive(Debug)]
pub struct NamingConventions;

impl NamingConventions {
    /// 获取简短的类型名称（最后一个命名空间段）
    pub fn simple_name(type_name: &str) -> &str {
        type_name
            .rsplit(NAMESPACE_SEPARATOR)
            .next()
            .unwrap_or(type_name)
            .trim()
    }

    /// 从完全限定名称得到文件名索引键
    ///
    /// 例如 `app::mail::Mailer` => `mailer`
    pub fn filename_key(type_name: &str) -> String {
        Self::lower_first(Self::simple_name(type_name))
    }

    /// 首字母小写
    pub fn lower_first(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// 首字母大写
    pub fn upper_first(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// 将蛇形命名转换为小驼峰命名
    pub fn snake_to_lower_camel(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut upper_next = false;

        for ch in s.chars() {
            if ch == '_' {
                upper_next = !result.is_empty();
                continue;
            }
            if upper_next {
                result.extend(ch.to_uppercase());
                upper_next = false;
            } else {
                result.push(ch);
            }
        }

        result
    }

    /// 检查文件主名是否可能是一个类型：大写字母开头，后跟至少一个字母或数字
    pub fn is_type_file_stem(stem: &str) -> bool {
        let mut chars = stem.chars();
        match chars.next() {
            Some(first) if first.is_ascii_uppercase() => {
                let rest = chars.as_str();
                !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_alphanumeric())
            }
            _ => false,
        }
    }

    /// 检查参数名是否为保留参数
    pub fn is_reserved_parameter(name: &str) -> bool {
        RESERVED_PARAMETERS.contains(&name)
    }
}
