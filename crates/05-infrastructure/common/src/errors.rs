//! 错误类型定义

use thiserror::Error;

/// 自动装配错误类型
///
/// 解析阶段的封闭错误分类，全部为快速失败、不可恢复的配置错误，
/// 需要开发者修正后系统才能启动。
#[derive(Error, Debug)]
pub enum AutowireError {
    #[error(
        "无法自动装配 {class_name}。请检查命名空间是否符合 PSR-4 规范（类型名称必须与目录结构一致），\
         或者该类型是否已经注册到类型注册表"
    )]
    NonPsr4CompliantClass { class_name: String },

    #[error(
        "发现 {class_name} 的基础类型依赖，参数: {parameter}。自动装配无法推断需要注入的值，\
         请为该类手动定义依赖"
    )]
    PrimitiveDependencyFound { class_name: String, parameter: String },

    #[error(
        "无法找到实现 {interface_name} 的类 \"{class_name}\"（{dependent} 的参数 {parameter}，在文件名索引中查找）。\
         注入接口依赖时，构造函数参数名必须与某个实现该接口的类的文件名一致，\
         或者为 {dependent} 手动定义依赖"
    )]
    MissingImplementationMatch {
        dependent: String,
        parameter: String,
        class_name: String,
        interface_name: String,
    },

    #[error(
        "发现多个名为 \"{class_name}\" 且实现 {interface_name} 的类（{dependent} 的参数 {parameter}）。\
         请确保同一接口下没有同名实现，或者为 {dependent} 手动定义依赖"
    )]
    AmbiguousImplementationMatch {
        dependent: String,
        parameter: String,
        class_name: String,
        interface_name: String,
    },

    #[error("检测到循环依赖: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("命名空间扫描失败: {path}, 原因: {message}")]
    ScanFailed { path: String, message: String },

    #[error("定义缓存读写失败: {path}, 原因: {message}")]
    CacheError { path: String, message: String },
}

impl AutowireError {
    /// 创建缺少实现错误
    pub fn missing_implementation(
        dependent: impl Into<String>,
        parameter: impl Into<String>,
        class_name: impl Into<String>,
        interface_name: impl Into<String>,
    ) -> Self {
        Self::MissingImplementationMatch {
            dependent: dependent.into(),
            parameter: parameter.into(),
            class_name: class_name.into(),
            interface_name: interface_name.into(),
        }
    }

    /// 创建实现不唯一错误
    pub fn ambiguous_implementation(
        dependent: impl Into<String>,
        parameter: impl Into<String>,
        class_name: impl Into<String>,
        interface_name: impl Into<String>,
    ) -> Self {
        Self::AmbiguousImplementationMatch {
            dependent: dependent.into(),
            parameter: parameter.into(),
            class_name: class_name.into(),
            interface_name: interface_name.into(),
        }
    }

    /// 创建缓存错误
    pub fn cache_error(path: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        Self::CacheError {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

/// 依赖注入错误类型
///
/// 容器实例化阶段的错误
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件没有可用的工厂: {type_name}")]
    FactoryMissing { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("构造参数缺失: {type_name}, 参数: {parameter}")]
    MissingArgument { type_name: String, parameter: String },

    #[error("构造参数无效: {type_name}, 参数: {parameter}, 原因: {message}")]
    InvalidArgument {
        type_name: String,
        parameter: String,
        message: String,
    },

    #[error("类型转换失败: {type_name} 无法转换为 {target}")]
    CastFailed { type_name: String, target: String },
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("自动装配错误: {source}")]
    AutowireError {
        #[from]
        source: AutowireError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type AutowireResult<T> = Result<T, AutowireError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
