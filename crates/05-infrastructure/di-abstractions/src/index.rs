//! 装配索引
//!
//! 文件名索引和接口索引只在解析接口类型参数时使用

use indexmap::{IndexMap, IndexSet};

/// 文件名索引
///
/// 把首字母小写的简短类型名映射到共享该名称的所有类型
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilenameIndex {
    entries: IndexMap<String, Vec<String>>,
}

impl FilenameIndex {
    /// 创建空索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个类型
    pub fn insert(&mut self, key: impl Into<String>, class_name: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(class_name.into());
    }

    /// 获取共享该键的类型
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// 所有键
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// 键数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 接口索引
///
/// 把类型映射到它实现的全部接口（包括继承得到的接口）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceIndex {
    entries: IndexMap<String, IndexSet<String>>,
}

impl InterfaceIndex {
    /// 创建空索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录类型实现的接口
    pub fn insert(&mut self, class_name: impl Into<String>, interfaces: IndexSet<String>) {
        self.entries.insert(class_name.into(), interfaces);
    }

    /// 获取类型实现的接口
    pub fn interfaces_of(&self, class_name: &str) -> Option<&IndexSet<String>> {
        self.entries.get(class_name)
    }

    /// 是否记录了该类型
    pub fn contains(&self, class_name: &str) -> bool {
        self.entries.contains_key(class_name)
    }

    /// 检查类型是否实现了接口
    pub fn implements(&self, class_name: &str, interface: &str) -> bool {
        self.entries
            .get(class_name)
            .is_some_and(|interfaces| interfaces.contains(interface))
    }

    /// 记录的类型数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
