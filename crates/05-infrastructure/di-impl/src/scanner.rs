//! 命名空间扫描器实现
//!
//! - [`FileSystemNamespaceScanner`] 按 PSR-4 约定遍历源码目录
//! - [`RegistryNamespaceScanner`] 直接枚举类型注册表

use di_abstractions::{CandidateType, NamespaceScanner, Psr4Prefixes, ScanOptions, SharedReflector};
use infrastructure_common::{AutowireError, NamingConventions, NAMESPACE_SEPARATOR};
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// 基于文件系统的命名空间扫描器
///
/// 文件主名必须以大写字母开头，后跟字母或数字，并带有约定的源文件后缀。
/// 相对于命名空间根目录的路径被转换成完全限定类型名称。
#[derive(Debug, Clone)]
pub struct FileSystemNamespaceScanner {
    prefixes: Psr4Prefixes,
    options: ScanOptions,
}

impl FileSystemNamespaceScanner {
    /// 创建新的文件系统扫描器
    pub fn new(prefixes: Psr4Prefixes) -> Self {
        Self {
            prefixes,
            options: ScanOptions::default(),
        }
    }

    /// 设置扫描选项
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// 设置源文件后缀
    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.options.file_suffix = suffix.into();
        self
    }

    /// 从文件路径构建类型名称
    ///
    /// 例如 `<root>/mail/Mailer.rs` => `shop::mail::Mailer`
    fn type_name_from_path(&self, path: &Path, namespace: &str, base_dir: &Path) -> String {
        let relative = path.strip_prefix(base_dir).unwrap_or(path);
        let mut segments: Vec<String> = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect();

        if let Some(last) = segments.last_mut() {
            if let Some(stem) = last.strip_suffix(self.options.file_suffix.as_str()) {
                *last = stem.to_string();
            }
        }

        format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, segments.join(NAMESPACE_SEPARATOR))
    }
}

impl NamespaceScanner for FileSystemNamespaceScanner {
    fn scan(&self, namespace: &str) -> Result<Vec<CandidateType>, AutowireError> {
        let Some(base_dir) = self.prefixes.base_dir(namespace) else {
            debug!("命名空间 {} 没有映射目录", namespace);
            return Ok(Vec::new());
        };

        if !base_dir.is_dir() {
            debug!("命名空间目录不存在: {}", base_dir.display());
            return Ok(Vec::new());
        }

        debug!("开始扫描命名空间 {}: {}", namespace, base_dir.display());

        let mut candidates = Vec::new();
        let walker = WalkDir::new(base_dir)
            .follow_links(self.options.follow_links)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| AutowireError::ScanFailed {
                path: e
                    .path()
                    .unwrap_or(base_dir)
                    .display()
                    .to_string(),
                message: e.to_string(),
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let Some(stem) = file_name.strip_suffix(self.options.file_suffix.as_str()) else {
                continue;
            };
            if !NamingConventions::is_type_file_stem(stem) {
                continue;
            }

            let type_name = self.type_name_from_path(entry.path(), namespace, base_dir);
            debug!("发现候选类型: {}", type_name);
            candidates.push(CandidateType::new(type_name).with_source(entry.path()));
        }

        info!("扫描命名空间 {} 完成，发现 {} 个候选类型", namespace, candidates.len());
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "filesystem"
    }
}

/// 基于类型注册表的命名空间扫描器
///
/// 运行时没有源码目录时使用，直接枚举注册表中位于根命名空间下的类型
#[derive(Clone)]
pub struct RegistryNamespaceScanner {
    reflector: SharedReflector,
}

impl RegistryNamespaceScanner {
    /// 创建新的注册表扫描器
    pub fn new(reflector: SharedReflector) -> Self {
        Self { reflector }
    }
}

impl std::fmt::Debug for RegistryNamespaceScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryNamespaceScanner").finish_non_exhaustive()
    }
}

impl NamespaceScanner for RegistryNamespaceScanner {
    fn scan(&self, namespace: &str) -> Result<Vec<CandidateType>, AutowireError> {
        let candidates: Vec<CandidateType> = self
            .reflector
            .type_names_in(namespace)
            .into_iter()
            .map(CandidateType::new)
            .collect();

        info!("扫描命名空间 {} 完成，注册表中有 {} 个候选类型", namespace, candidates.len());
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "registry"
    }
}
