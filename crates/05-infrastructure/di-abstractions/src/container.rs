//! 依赖注入容器抽象接口
//!
//! 定义装配计划（定义列表）以及消费它的容器

use indexmap::IndexMap;
use infrastructure_common::{DependencyError, Instance};
use serde::{Deserialize, Serialize};

/// 构造参数定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    /// 引用另一个类的定义
    Class(String),
    /// 字面量
    Literal(serde_json::Value),
}

impl Argument {
    /// 创建类引用
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    /// 创建字面量
    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        Self::Literal(value.into())
    }

    /// 类引用的名称
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class(name) => Some(name),
            Self::Literal(_) => None,
        }
    }
}

/// 单个类的装配定义
///
/// 按构造函数参数顺序排列的实参，没有依赖时为空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definition {
    arguments: Vec<Argument>,
}

impl Definition {
    /// 没有依赖的定义
    pub fn leaf() -> Self {
        Self::default()
    }

    /// 使用指定实参创建定义
    pub fn new(arguments: Vec<Argument>) -> Self {
        Self { arguments }
    }

    /// 实参列表
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// 引用的类名称
    pub fn class_references(&self) -> impl Iterator<Item = &str> {
        self.arguments.iter().filter_map(Argument::class_name)
    }

    /// 是否没有依赖
    pub fn is_leaf(&self) -> bool {
        self.arguments.is_empty()
    }
}

/// 定义列表
///
/// 最终的装配计划，与具体容器无关
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionList {
    definitions: IndexMap<String, Definition>,
}

/// 手动定义的依赖，与定义列表结构相同
pub type ManualDefinitions = DefinitionList;

impl DefinitionList {
    /// 创建空列表
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加定义，同名定义会被替换但保留原有位置
    pub fn insert(&mut self, class_name: impl Into<String>, definition: Definition) {
        self.definitions.insert(class_name.into(), definition);
    }

    /// 链式添加定义
    pub fn with(mut self, class_name: impl Into<String>, arguments: Vec<Argument>) -> Self {
        self.insert(class_name, Definition::new(arguments));
        self
    }

    /// 获取定义
    pub fn get(&self, class_name: &str) -> Option<&Definition> {
        self.definitions.get(class_name)
    }

    /// 是否包含该类
    pub fn contains(&self, class_name: &str) -> bool {
        self.definitions.contains_key(class_name)
    }

    /// 所有类名称，按插入顺序
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// 遍历定义
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.definitions
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    /// 合并另一个列表，另一个列表中的定义优先
    pub fn merge(&mut self, other: &DefinitionList) {
        for (class_name, definition) in other.iter() {
            self.insert(class_name, definition.clone());
        }
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// 服务容器 trait
///
/// 接收装配计划并生成实例的通用容器
pub trait ServiceContainer: Send + Sync {
    /// 获取类的共享实例
    fn get(&self, class_name: &str) -> Result<Instance, DependencyError>;

    /// 是否有该类的定义
    fn has(&self, class_name: &str) -> bool;

    /// 容器使用的定义列表
    fn definitions(&self) -> &DefinitionList;
}

/// 容器构建器 trait
pub trait ContainerBuilder {
    /// 关联的容器类型
    type Container: ServiceContainer;

    /// 添加定义
    fn add_definitions(self, definitions: DefinitionList) -> Self
    where
        Self: Sized;

    /// 构建容器
    fn build(self) -> Result<Self::Container, DependencyError>;
}
