//! 配置源
//!
//! 从 `autowire.toml` 读取自动装配配置，再应用环境变量覆盖。
//!
//! ```toml
//! [autowire]
//! namespace = "shop"
//! deployment_mode = "production"
//! cache_dir = "var/cache"
//!
//! [prefixes]
//! "shop" = ["src/shop"]
//!
//! [bindings]
//! "shop::Transport" = "shop::Sms"
//!
//! [[parameter_bindings]]
//! interface = "shop::Transport"
//! parameter = "urgent"
//! implementation = "shop::Pager"
//!
//! [[definitions]]
//! class = "shop::Report"
//! arguments = [{ literal = 10 }]
//! ```

use di_abstractions::{Argument, ManualDefinitions, Psr4Prefixes};
use di_impl::BindingTableMatcher;
use indexmap::IndexMap;
use infrastructure_common::{AutowireOptions, ConfigError, DeploymentMode, ExecutionContext};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 部署模式环境变量
pub const ENV_ENVIRONMENT: &str = "AUTOWIRE_ENVIRONMENT";
/// 命令行执行环境变量
pub const ENV_CLI: &str = "AUTOWIRE_CLI";
/// 缓存目录环境变量
pub const ENV_CACHE_DIR: &str = "AUTOWIRE_CACHE_DIR";

/// 手动定义条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionEntry {
    /// 类名称
    pub class: String,
    /// 构造参数
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

/// 参数级绑定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterBinding {
    pub interface: String,
    pub parameter: String,
    pub implementation: String,
}

/// `autowire.toml` 文件内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutowireConfigFile {
    pub autowire: AutowireOptions,
    pub prefixes: IndexMap<String, Vec<PathBuf>>,
    pub bindings: IndexMap<String, String>,
    pub parameter_bindings: Vec<ParameterBinding>,
    pub definitions: Vec<DefinitionEntry>,
}

impl AutowireConfigFile {
    /// 从 TOML 文件加载
    ///
    /// `[prefixes]` 中的相对路径相对于配置文件所在目录
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        info!("加载自动装配配置文件: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(base) = path.parent() {
            for dirs in config.prefixes.values_mut() {
                for dir in dirs.iter_mut() {
                    if dir.is_relative() {
                        *dir = base.join(&*dir);
                    }
                }
            }
        }

        Ok(config)
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for entry in &self.definitions {
            if entry.class.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: "手动定义的类名称不能为空".to_string(),
                });
            }
            if !seen.insert(entry.class.as_str()) {
                return Err(ConfigError::ValidationError {
                    message: format!("类 {} 被重复手动定义", entry.class),
                });
            }
        }
        Ok(())
    }

    /// PSR-4 映射
    pub fn psr4_prefixes(&self) -> Psr4Prefixes {
        self.prefixes
            .iter()
            .flat_map(|(prefix, dirs)| dirs.iter().map(move |dir| (prefix, dir)))
            .fold(Psr4Prefixes::new(), |prefixes, (prefix, dir)| {
                prefixes.add(prefix.as_str(), dir.as_path())
            })
    }

    /// 手动定义
    pub fn manual_definitions(&self) -> ManualDefinitions {
        self.definitions
            .iter()
            .fold(ManualDefinitions::new(), |manual, entry| {
                manual.with(entry.class.as_str(), entry.arguments.clone())
            })
    }

    /// 显式绑定表
    pub fn binding_table(&self) -> BindingTableMatcher {
        self.parameter_bindings.iter().fold(
            BindingTableMatcher::from_map(&self.bindings),
            |matcher, binding| {
                matcher.bind_parameter(
                    binding.interface.as_str(),
                    binding.parameter.as_str(),
                    binding.implementation.as_str(),
                )
            },
        )
    }
}

/// 应用环境变量覆盖
///
/// `lookup` 通常是 `|key| std::env::var(key).ok()`，测试时可以替换
pub fn apply_environment_overrides<F>(
    options: &mut AutowireOptions,
    lookup: F,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(environment) = lookup(ENV_ENVIRONMENT) {
        options.deployment_mode = environment
            .parse::<DeploymentMode>()
            .map_err(|message| ConfigError::ValidationError { message })?;
        debug!("环境变量覆盖部署模式: {:?}", options.deployment_mode);
    }

    if let Some(cli) = lookup(ENV_CLI) {
        options.execution_context = if is_truthy(&cli) {
            ExecutionContext::Cli
        } else {
            ExecutionContext::Standard
        };
        debug!("环境变量覆盖执行环境: {:?}", options.execution_context);
    }

    if let Some(cache_dir) = lookup(ENV_CACHE_DIR).filter(|dir| !dir.trim().is_empty()) {
        debug!("环境变量覆盖缓存目录: {}", cache_dir);
        options.cache_dir = Some(PathBuf::from(cache_dir));
    }

    Ok(())
}

/// 从进程环境变量应用覆盖
pub fn apply_process_environment(options: &mut AutowireOptions) -> Result<(), ConfigError> {
    apply_environment_overrides(options, |key| std::env::var(key).ok())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
