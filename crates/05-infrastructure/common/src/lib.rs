//! # Infrastructure Common
//!
//! 这个 crate 提供了自动装配基础设施的公共类型。
//!
//! ## 核心组件
//!
//! - [`Service`] / [`CliService`] - 参与自动装配的标记能力
//! - [`TypeDescriptor`] - 替代运行时反射的类型描述符
//! - [`TypeRegistry`] - 启动时自注册的类型注册表
//! - [`NamingConventions`] - 命名约定规范
//! - [`AutowireError`] - 自动装配的封闭错误分类
//!
//! ## 设计原则
//!
//! - 没有运行时反射，类型在程序启动时登记自己的构造函数签名
//! - 约定优于配置
//! - 配置错误快速失败

pub mod component;
pub mod configuration;
pub mod conventions;
pub mod errors;
pub mod factory;
pub mod metadata;
pub mod registry;

pub use component::*;
pub use configuration::*;
pub use conventions::*;
pub use errors::*;
pub use factory::*;
pub use metadata::*;
pub use registry::*;

/// 全局类型注册表
static GLOBAL_TYPE_REGISTRY: once_cell::sync::Lazy<TypeRegistry> =
    once_cell::sync::Lazy::new(TypeRegistry::new);

/// 获取全局类型注册表
///
/// `#[component]`、`#[interface]` 和 `#[autowire]` 宏生成的代码在程序启动时写入这里
pub fn global_type_registry() -> &'static TypeRegistry {
    &GLOBAL_TYPE_REGISTRY
}
