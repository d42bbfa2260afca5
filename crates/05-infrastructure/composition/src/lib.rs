//! # 基础设施组合层
//!
//! 负责把自动装配流水线、定义缓存和容器组合成一个可以启动的系统。
//!
//! ## 主要功能
//!
//! - **服务启动器构建器**: 使用构建者模式组装自动装配器
//! - **配置源**: 读取 `autowire.toml` 并应用 `AUTOWIRE_*` 环境变量覆盖
//! - **服务注册**: 按执行环境对服务调用一次 `register`
//! - **日志初始化**: 开发和生产环境的 `tracing` 订阅者
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{LoggingConfig, ServiceBootstrapBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bootstrapper = ServiceBootstrapBuilder::from_config_file("autowire.toml")?
//!         .with_environment_overrides()
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     bootstrapper.register_services()?;
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod builder;
pub mod config_sources;

// 重新导出主要类型
pub use bootstrapper::ServiceBootstrapper;
pub use builder::{global_reflector, init_logging, LoggingConfig, ServiceBootstrapBuilder};
pub use config_sources::{
    apply_environment_overrides, apply_process_environment, AutowireConfigFile, DefinitionEntry,
    ParameterBinding,
};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
