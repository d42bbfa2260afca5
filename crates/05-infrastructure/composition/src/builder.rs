//! 服务启动器构建器

use crate::bootstrapper::ServiceBootstrapper;
use crate::config_sources::{apply_process_environment, AutowireConfigFile};
use di_abstractions::{ManualDefinitions, NamespaceScanner, Psr4Prefixes, SharedReflector};
use di_impl::{Autowiring, BindingTableMatcher};
use infrastructure_common::{
    global_type_registry, AutowireOptions, DeploymentMode, ExecutionContext, InfrastructureError,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 全局类型注册表作为反射器
pub fn global_reflector() -> SharedReflector {
    Arc::new(global_type_registry())
}

/// 服务启动器构建器
///
/// 使用建造者模式组装自动装配器和启动器
pub struct ServiceBootstrapBuilder {
    /// 自动装配选项
    options: AutowireOptions,
    /// 类型反射器，默认为全局类型注册表
    reflector: Option<SharedReflector>,
    /// PSR-4 映射，为空时直接枚举注册表
    prefixes: Psr4Prefixes,
    /// 自定义扫描器
    scanner: Option<Box<dyn NamespaceScanner>>,
    /// 显式绑定
    bindings: BindingTableMatcher,
    /// 手动定义
    manual: ManualDefinitions,
    /// 是否读取环境变量覆盖
    env_overrides: bool,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ServiceBootstrapBuilder {
    /// 创建新的构建器
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            options: AutowireOptions::new(namespace),
            reflector: None,
            prefixes: Psr4Prefixes::new(),
            scanner: None,
            bindings: BindingTableMatcher::new(),
            manual: ManualDefinitions::new(),
            env_overrides: false,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 从 `autowire.toml` 创建
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, InfrastructureError> {
        Self::new(String::new()).add_config_toml(path)
    }

    /// 合并 TOML 配置文件
    ///
    /// 文件中的 `[autowire]` 替换当前选项，映射、绑定和手动定义追加到已有内容
    pub fn add_config_toml(mut self, path: impl AsRef<Path>) -> Result<Self, InfrastructureError> {
        let config = AutowireConfigFile::load(path)?;

        let namespace = if config.autowire.namespace.is_empty() {
            std::mem::take(&mut self.options.namespace)
        } else {
            config.autowire.namespace.clone()
        };
        self.options = AutowireOptions {
            namespace,
            ..config.autowire.clone()
        };

        for (prefix, dirs) in &config.prefixes {
            for dir in dirs {
                self.prefixes = self.prefixes.add(prefix.as_str(), dir.as_path());
            }
        }
        self.bindings = self.bindings.merge(config.binding_table());
        self.manual.merge(&config.manual_definitions());

        debug!("合并配置后共 {} 个手动定义", self.manual.len());
        Ok(self)
    }

    /// 读取 `AUTOWIRE_*` 环境变量覆盖选项
    pub fn with_environment_overrides(mut self) -> Self {
        self.env_overrides = true;
        self
    }

    /// 使用完整的选项
    pub fn with_options(mut self, options: AutowireOptions) -> Self {
        self.options = options;
        self
    }

    /// 使用指定的类型反射器
    pub fn with_reflector(mut self, reflector: SharedReflector) -> Self {
        self.reflector = Some(reflector);
        self
    }

    /// 添加 PSR-4 映射，启用文件系统扫描
    pub fn add_prefix(mut self, prefix: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        self.prefixes = self.prefixes.add(prefix, base_dir);
        self
    }

    /// 自定义扫描器
    pub fn with_scanner(mut self, scanner: impl NamespaceScanner + 'static) -> Self {
        self.scanner = Some(Box::new(scanner));
        self
    }

    /// 为接口绑定实现
    pub fn bind(mut self, interface: impl Into<String>, implementation: impl Into<String>) -> Self {
        self.bindings = self.bindings.bind(interface, implementation);
        self
    }

    /// 添加手动定义
    pub fn with_manual_definitions(mut self, manual: ManualDefinitions) -> Self {
        self.manual.merge(&manual);
        self
    }

    /// 设置部署模式
    pub fn with_deployment_mode(mut self, mode: DeploymentMode) -> Self {
        self.options.deployment_mode = mode;
        self
    }

    /// 设置定义缓存目录
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.options.cache_dir = Some(cache_dir.into());
        self
    }

    /// 设置执行环境
    pub fn with_execution_context(mut self, context: ExecutionContext) -> Self {
        self.options.execution_context = context;
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建服务启动器
    pub fn build(mut self) -> Result<ServiceBootstrapper, InfrastructureError> {
        // 只有在明确配置了日志时才初始化日志
        // 避免在测试环境中重复初始化
        if self.logging_enabled {
            init_logging(&self.logging_config)?;
        }

        if self.env_overrides {
            apply_process_environment(&mut self.options)?;
        }

        if self.options.namespace.is_empty() {
            return Err(InfrastructureError::BootstrapFailed {
                message: "没有配置根命名空间".to_string(),
            });
        }

        info!(
            "开始构建服务启动器，命名空间: {}，部署模式: {:?}，执行环境: {:?}",
            self.options.namespace, self.options.deployment_mode, self.options.execution_context
        );

        let reflector = self.reflector.unwrap_or_else(global_reflector);
        let mut autowiring = Autowiring::builder(self.options.namespace.clone(), reflector.clone())
            .with_options(self.options.clone())
            .with_bindings(self.bindings)
            .with_manual_definitions(self.manual);

        if !self.prefixes.is_empty() {
            autowiring = autowiring.with_prefixes(self.prefixes);
        }
        if let Some(scanner) = self.scanner {
            autowiring = autowiring.with_boxed_scanner(scanner);
        }

        Ok(ServiceBootstrapper::new(autowiring.build(), reflector, self.options))
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 额外的过滤指令，例如 `di_impl=trace`
    pub directives: Option<String>,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示文件名和行号
    pub show_location: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            directives: None,
            show_target: true,
            show_location: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            directives: None,
            show_target: true,
            show_location: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            directives: None,
            show_target: false,
            show_location: false,
            json_format: true,
        }
    }

    /// 按部署模式选择日志配置
    pub fn for_mode(mode: DeploymentMode) -> Self {
        match mode {
            DeploymentMode::Development => Self::development(),
            DeploymentMode::Staging | DeploymentMode::Production => Self::production(),
        }
    }

    /// 添加过滤指令
    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    fn env_filter(&self) -> EnvFilter {
        let base = match &self.directives {
            Some(directives) => format!("{},{}", self.level, directives),
            None => self.level.to_string(),
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base))
    }
}

/// 初始化日志系统
///
/// 全局订阅者只能安装一次，重复调用返回错误
pub fn init_logging(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(config.show_target)
        .with_file(config.show_location)
        .with_line_number(config.show_location);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}
