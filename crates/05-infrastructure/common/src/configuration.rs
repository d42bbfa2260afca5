//! 自动装配配置选项

use crate::component::ExecutionContext;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 部署模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    /// 开发环境，每次启动都重新扫描
    #[default]
    Development,
    /// 预发布环境
    Staging,
    /// 生产环境
    Production,
}

impl DeploymentMode {
    /// 是否使用编译后的定义缓存
    pub fn compiles_definitions(self) -> bool {
        matches!(self, Self::Staging | Self::Production)
    }
}

impl std::str::FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "local" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(format!("未知的部署模式: {}", s)),
        }
    }
}

/// 自动装配选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutowireOptions {
    /// 扫描的根命名空间
    pub namespace: String,
    /// 源文件后缀
    pub file_suffix: String,
    /// 跳过无法反射的候选类型而不是报错，仅用于测试
    pub skip_invalid: bool,
    /// 是否启用按参数名推断接口实现
    pub name_heuristic: bool,
    /// 推断时是否把蛇形参数名转换为小驼峰
    pub snake_case_parameter_keys: bool,
    /// 部署模式
    pub deployment_mode: DeploymentMode,
    /// 定义缓存目录
    pub cache_dir: Option<PathBuf>,
    /// 执行环境
    pub execution_context: ExecutionContext,
}

impl Default for AutowireOptions {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            file_suffix: ".rs".to_string(),
            skip_invalid: false,
            name_heuristic: true,
            snake_case_parameter_keys: false,
            deployment_mode: DeploymentMode::Development,
            cache_dir: None,
            execution_context: ExecutionContext::Standard,
        }
    }
}

impl AutowireOptions {
    /// 创建指定根命名空间的选项
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// 设置是否跳过无效候选类型
    pub fn with_skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.skip_invalid = skip_invalid;
        self
    }

    /// 设置是否启用参数名推断
    pub fn with_name_heuristic(mut self, enabled: bool) -> Self {
        self.name_heuristic = enabled;
        self
    }

    /// 设置部署模式
    pub fn with_deployment_mode(mut self, mode: DeploymentMode) -> Self {
        self.deployment_mode = mode;
        self
    }

    /// 设置定义缓存目录
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// 设置执行环境
    pub fn with_execution_context(mut self, context: ExecutionContext) -> Self {
        self.execution_context = context;
        self
    }

    /// 缓存文件名，取根命名空间的第一段
    pub fn cache_file_name(&self) -> String {
        let first = self
            .namespace
            .split(crate::conventions::NAMESPACE_SEPARATOR)
            .next()
            .unwrap_or_default();
        format!("{}CompiledContainer.json", first)
    }
}
