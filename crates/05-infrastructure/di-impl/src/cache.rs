//! 编译后的定义缓存
//!
//! 预发布和生产环境下，定义列表在第一次启动时写入缓存文件，
//! 之后的启动直接读取而不再扫描命名空间。

use chrono::{DateTime, Utc};
use di_abstractions::DefinitionList;
use infrastructure_common::{AutowireError, AutowireOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

const FORMAT_VERSION: u32 = 1;

/// 缓存文件内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledDefinitions {
    pub format_version: u32,
    pub namespace: String,
    pub compiled_at: DateTime<Utc>,
    pub definitions: DefinitionList,
}

/// 定义缓存
#[derive(Debug, Clone)]
pub struct DefinitionCache {
    path: PathBuf,
    namespace: String,
}

impl DefinitionCache {
    /// 在指定目录下使用约定的文件名
    pub fn new(cache_dir: impl AsRef<Path>, options: &AutowireOptions) -> Self {
        Self {
            path: cache_dir.as_ref().join(options.cache_file_name()),
            namespace: options.namespace.clone(),
        }
    }

    /// 根据部署模式决定是否启用缓存
    pub fn from_options(options: &AutowireOptions) -> Option<Self> {
        if !options.deployment_mode.compiles_definitions() {
            return None;
        }
        match &options.cache_dir {
            Some(dir) => Some(Self::new(dir, options)),
            None => {
                warn!(
                    "部署模式 {:?} 需要定义缓存，但没有配置缓存目录，每次启动都会重新扫描",
                    options.deployment_mode
                );
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取缓存
    ///
    /// 文件不存在、格式版本不同或属于其他命名空间时返回 `None`，
    /// 内容损坏时记录警告并返回 `None`。
    pub fn load(&self) -> Result<Option<DefinitionList>, AutowireError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| AutowireError::cache_error(self.path.display(), e))?;

        let compiled: CompiledDefinitions = match serde_json::from_str(&content) {
            Ok(compiled) => compiled,
            Err(e) => {
                warn!("定义缓存 {} 无法解析，将重新生成: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        if compiled.format_version != FORMAT_VERSION || compiled.namespace != self.namespace {
            debug!("定义缓存 {} 已过期", self.path.display());
            return Ok(None);
        }

        info!(
            "读取定义缓存 {}，生成于 {}，共 {} 个定义",
            self.path.display(),
            compiled.compiled_at,
            compiled.definitions.len()
        );
        Ok(Some(compiled.definitions))
    }

    /// 写入缓存
    ///
    /// 先写同目录下的临时文件再原子重命名，读者不会看到写了一半的文件
    pub fn store(&self, definitions: &DefinitionList) -> Result<(), AutowireError> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| AutowireError::cache_error(dir.display(), e))?;

        let compiled = CompiledDefinitions {
            format_version: FORMAT_VERSION,
            namespace: self.namespace.clone(),
            compiled_at: Utc::now(),
            definitions: definitions.clone(),
        };

        let mut file =
            NamedTempFile::new_in(dir).map_err(|e| AutowireError::cache_error(dir.display(), e))?;
        serde_json::to_writer_pretty(&mut file, &compiled)
            .map_err(|e| AutowireError::cache_error(self.path.display(), e))?;
        file.flush()
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| AutowireError::cache_error(self.path.display(), e))?;
        file.persist(&self.path)
            .map_err(|e| AutowireError::cache_error(self.path.display(), e.error))?;

        info!("写入定义缓存 {}，共 {} 个定义", self.path.display(), definitions.len());
        Ok(())
    }

    /// 读取缓存，没有可用缓存时构建并写入
    pub fn load_or_build<F>(&self, build: F) -> Result<DefinitionList, AutowireError>
    where
        F: FnOnce() -> Result<DefinitionList, AutowireError>,
    {
        if let Some(definitions) = self.load()? {
            return Ok(definitions);
        }

        let definitions = build()?;
        self.store(&definitions)?;
        Ok(definitions)
    }

    /// 删除缓存文件
    pub fn clear(&self) -> Result<(), AutowireError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AutowireError::cache_error(self.path.display(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::Argument;
    use infrastructure_common::DeploymentMode;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn definitions() -> DefinitionList {
        DefinitionList::new()
            .with("shop::Logger", Vec::new())
            .with("shop::mail::Mailer", vec![Argument::class("shop::Logger")])
    }

    #[test]
    fn test_only_enabled_for_compiling_modes() {
        let dir = TempDir::new().unwrap();
        let development = AutowireOptions::new("shop").with_cache_dir(dir.path());
        assert!(DefinitionCache::from_options(&development).is_none());

        let production = development.clone().with_deployment_mode(DeploymentMode::Production);
        let cache = DefinitionCache::from_options(&production).unwrap();
        assert_eq!(cache.path(), dir.path().join("shopCompiledContainer.json"));

        let no_dir = AutowireOptions::new("shop").with_deployment_mode(DeploymentMode::Staging);
        assert!(DefinitionCache::from_options(&no_dir).is_none());
    }

    #[test]
    fn test_store_then_load() {
        let dir = TempDir::new().unwrap();
        let cache = DefinitionCache::new(dir.path().join("nested"), &AutowireOptions::new("shop"));

        assert!(cache.load().unwrap().is_none());
        cache.store(&definitions()).unwrap();
        assert_eq!(cache.load().unwrap(), Some(definitions()));
    }

    #[test]
    fn test_load_or_build_builds_once() {
        let dir = TempDir::new().unwrap();
        let cache = DefinitionCache::new(dir.path(), &AutowireOptions::new("shop"));
        let builds = Cell::new(0);

        for _ in 0..2 {
            let loaded = cache
                .load_or_build(|| {
                    builds.set(builds.get() + 1);
                    Ok(definitions())
                })
                .unwrap();
            assert_eq!(loaded, definitions());
        }
        assert_eq!(builds.get(), 1);
    }

    #[test]
    fn test_corrupt_or_foreign_cache_is_ignored() {
        let dir = TempDir::new().unwrap();
        let cache = DefinitionCache::new(dir.path(), &AutowireOptions::new("shop"));

        fs::write(cache.path(), "{ not json").unwrap();
        assert!(cache.load().unwrap().is_none());

        let other = DefinitionCache::new(dir.path(), &AutowireOptions::new("shop::other"));
        other.store(&definitions()).unwrap();
        assert_eq!(other.path(), cache.path());
        assert!(cache.load().unwrap().is_none());

        cache.clear().unwrap();
        cache.clear().unwrap();
        assert!(!cache.path().exists());
    }
}
