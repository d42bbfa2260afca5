//! 组件基础接口定义
//!
//! 提供参与自动装配的两个标记能力以及类型命名约定

use std::fmt::Debug;

/// 普通服务标记的完全限定名称
pub const SERVICE_INTERFACE: &str = "infrastructure_common::component::Service";

/// 命令行服务标记的完全限定名称
pub const CLI_SERVICE_INTERFACE: &str = "infrastructure_common::component::CliService";

/// 服务标记 trait
///
/// 实现此 trait 的具体类型会被自动装配扫描，并在非命令行环境中调用 `register`。
/// 每个服务负责注册自己的钩子，遵循单一职责原则。
pub trait Service: Send + Sync + Debug + 'static {
    /// 注册当前服务
    fn register(&self);
}

/// 命令行服务标记 trait
///
/// 与 [`Service`] 相同，但只在命令行执行环境中调用 `register`。
pub trait CliService: Send + Sync + Debug + 'static {
    /// 注册当前命令行服务
    fn register(&self);
}

/// 具名类型 trait
///
/// 为类型（包括 `dyn Trait`）提供在类型注册表中的完全限定名称。
/// 通常由 `#[component]` / `#[interface]` 宏生成。
pub trait Named {
    /// 完全限定名称，命名空间以 `::` 分隔
    const NAME: &'static str;
}

impl Named for dyn Service {
    const NAME: &'static str = SERVICE_INTERFACE;
}

impl Named for dyn CliService {
    const NAME: &'static str = CLI_SERVICE_INTERFACE;
}

/// 执行环境
///
/// 决定 `register_services` 时哪一类服务会被注册
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionContext {
    /// 常规运行环境，只注册 [`Service`]
    #[default]
    Standard,
    /// 命令行环境，只注册 [`CliService`]
    Cli,
}

impl ExecutionContext {
    /// 当前环境下需要注册的标记接口名称
    pub fn marker_interface(self) -> &'static str {
        match self {
            Self::Standard => SERVICE_INTERFACE,
            Self::Cli => CLI_SERVICE_INTERFACE,
        }
    }
}
