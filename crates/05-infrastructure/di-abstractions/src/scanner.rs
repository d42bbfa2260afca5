//! 命名空间扫描器抽象接口
//!
//! 提供在根命名空间下发现候选类型的能力

use indexmap::IndexMap;
use infrastructure_common::{AutowireError, NAMESPACE_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 命名空间扫描器 trait
pub trait NamespaceScanner: Send + Sync {
    /// 扫描指定根命名空间下的候选类型
    fn scan(&self, namespace: &str) -> Result<Vec<CandidateType>, AutowireError>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}

/// 候选类型
///
/// 只在扫描阶段存在，验证后变成类型描述符
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateType {
    /// 完全限定名称
    pub name: String,
    /// 发现该类型的源文件
    pub source: Option<PathBuf>,
}

impl CandidateType {
    /// 创建候选类型
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
        }
    }

    /// 设置源文件
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// 命名空间前缀到源码目录的映射
///
/// 前缀以命名空间分隔符结尾，例如 `shop::` => `["src/shop"]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Psr4Prefixes {
    prefixes: IndexMap<String, Vec<PathBuf>>,
}

impl Psr4Prefixes {
    /// 创建空映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加命名空间目录，前缀缺少分隔符时自动补齐
    pub fn add(mut self, prefix: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.ends_with(NAMESPACE_SEPARATOR) {
            prefix.push_str(NAMESPACE_SEPARATOR);
        }
        self.prefixes.entry(prefix).or_default().push(base_dir.into());
        self
    }

    /// 根命名空间对应的第一个目录
    pub fn base_dir(&self, namespace: &str) -> Option<&Path> {
        let key = format!("{}{}", namespace, NAMESPACE_SEPARATOR);
        self.prefixes
            .get(&key)
            .and_then(|dirs| dirs.first())
            .map(PathBuf::as_path)
    }

    /// 前缀数量
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// 扫描选项
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 源文件后缀
    pub file_suffix: String,
    /// 是否跟随符号链接
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            file_suffix: ".rs".to_string(),
            follow_links: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_lookup_uses_first_directory() {
        let prefixes = Psr4Prefixes::new()
            .add("shop", "/src/shop")
            .add("shop::", "/vendor/shop")
            .add("other::", "/src/other");

        assert_eq!(prefixes.len(), 2);
        assert_eq!(prefixes.base_dir("shop"), Some(Path::new("/src/shop")));
        assert_eq!(prefixes.base_dir("missing"), None);
    }
}
