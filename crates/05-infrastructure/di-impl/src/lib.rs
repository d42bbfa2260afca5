//! # 依赖注入具体实现
//!
//! 提供自动装配流水线的各阶段实现，以及消费定义列表的容器
//!
//! ## 流水线
//!
//! 1. [`scanner`] 列出根命名空间下的候选类型
//! 2. [`validator`] 通过类型注册表校验候选类型
//! 3. [`index`] 构建文件名索引和接口索引
//! 4. [`tree`] 从服务类出发构建依赖树并检查循环依赖
//! 5. [`definitions`] 把依赖树转换为定义列表并合并手动定义
//!
//! [`Autowiring`] 串联以上步骤，[`DefinitionCache`] 在生产环境下缓存结果，
//! [`DiContainerImpl`] 按定义列表创建实例。

pub mod autowiring;
pub mod cache;
pub mod container;
pub mod definitions;
pub mod index;
pub mod matcher;
pub mod scanner;
pub mod tree;
pub mod validator;

pub use autowiring::{Autowiring, AutowiringBuilder};
pub use cache::{CompiledDefinitions, DefinitionCache};
pub use container::{DiContainerBuilder, DiContainerImpl, ResolveContext};
pub use definitions::{DefinitionListConverter, ManualOverrides};
pub use index::{build_filename_index, build_interface_index};
pub use matcher::{BindingTableMatcher, ChainedMatcher, NameHeuristicMatcher};
pub use scanner::{FileSystemNamespaceScanner, RegistryNamespaceScanner};
pub use tree::{DependencyNode, DependencyTree, DependencyTreeBuilder};
pub use validator::ClassValidator;
