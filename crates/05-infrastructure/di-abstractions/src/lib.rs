//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义自动装配流水线各阶段之间的接口。
//!
//! ## 核心接口
//!
//! - [`NamespaceScanner`] - 命名空间扫描器接口
//! - [`TypeReflector`] - 类型反射器接口
//! - [`ImplementationMatcher`] - 接口实现匹配策略
//! - [`DefinitionList`] - 容器无关的装配计划
//! - [`ServiceContainer`] - 消费装配计划的容器接口

pub mod container;
pub mod index;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use container::*;
pub use index::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
