//! # Component Macros
//!
//! 这个 crate 提供了把类型登记到全局类型注册表的过程宏，替代运行时反射。
//!
//! ## 核心宏
//!
//! - [`component`] - 登记具体类型及其实现的接口
//! - [`interface`] - 登记接口（trait object）
//! - [`autowire`] - 登记构造函数签名和实例工厂
//!
//! 生成的代码使用 `ctor` 在程序启动时执行，因此使用方需要同时依赖
//! `infrastructure-common` 和 `ctor`。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{autowire, component, interface};
//! use infrastructure_common::Service;
//! use std::sync::Arc;
//!
//! #[interface]
//! pub trait Transport: Send + Sync {
//!     fn send(&self, message: &str);
//! }
//!
//! #[derive(Debug)]
//! #[component(implements(Transport))]
//! pub struct SmtpTransport;
//!
//! #[derive(Debug)]
//! #[component(service)]
//! pub struct Mailer {
//!     transport: Arc<dyn Transport>,
//! }
//!
//! #[autowire]
//! impl Mailer {
//!     pub fn new(transport: Arc<dyn Transport>) -> Self {
//!         Self { transport }
//!     }
//! }
//! ```

use proc_macro::TokenStream;

mod autowire;
mod component;
mod interface;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 组件登记宏
///
/// 为结构体实现 `Named`，并在启动时把具体类型描述符登记到全局类型注册表。
///
/// # 参数
///
/// - `service` - 实现 `Service`，在常规环境中注册
/// - `cli` - 实现 `CliService`，在命令行环境中注册
/// - `implements(A, B)` - 实现的接口，每个接口都会生成向上转换函数
/// - `default` - 通过 `Default` 创建实例
/// - `name = "app::Custom"` - 自定义完全限定名称，默认为 `模块路径::类型名`
///
/// 没有字段的结构体会自动生成工厂；其他结构体需要 [`autowire`] 或 `default`。
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Debug)]
/// #[component(service, implements(Notifier))]
/// pub struct Mailer {
///     logger: Arc<Logger>,
/// }
/// ```
#[proc_macro_attribute]
pub fn component(args: TokenStream, input: TokenStream) -> TokenStream {
    component::component_impl(args, input)
}

/// 接口登记宏
///
/// 为 `dyn Trait` 实现 `Named`，并登记接口描述符。
///
/// # 参数
///
/// - `extends(Parent)` - 继承的接口
/// - `name = "app::Custom"` - 自定义完全限定名称
#[proc_macro_attribute]
pub fn interface(args: TokenStream, input: TokenStream) -> TokenStream {
    interface::interface_impl(args, input)
}

/// 构造函数登记宏
///
/// 用于固有 impl 块，登记 `new` 的参数列表并生成工厂。参数按类型分类：
///
/// - `Arc<dyn Trait>` - 接口依赖，由匹配策略选择实现
/// - `Arc<T>` - 类依赖
/// - 基础类型（整数、`String`、`Vec` 等） - 必须通过手动定义提供
/// - 其他类型 - 不参与自动装配，由手动定义以字面量提供
///
/// 构造函数可以返回 `Self` 或 `Result<Self, E>`。
///
/// # 参数
///
/// - `constructor = "with_logger"` - 使用其他关联函数作为构造函数
///
/// # 示例
///
/// ```rust,ignore
/// #[autowire]
/// impl Mailer {
///     pub fn new(logger: Arc<Logger>) -> Self {
///         Self { logger }
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn autowire(args: TokenStream, input: TokenStream) -> TokenStream {
    autowire::autowire_impl(args, input)
}
