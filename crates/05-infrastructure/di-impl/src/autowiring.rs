//! 自动装配流水线
//!
//! 扫描 => 过滤手动定义 => 校验 => 建索引 => 构建依赖树 => 转换 => 合并手动定义

use crate::definitions::{DefinitionListConverter, ManualOverrides};
use crate::index::{build_filename_index, build_interface_index};
use crate::matcher::{BindingTableMatcher, ChainedMatcher};
use crate::scanner::{FileSystemNamespaceScanner, RegistryNamespaceScanner};
use crate::tree::{DependencyTree, DependencyTreeBuilder};
use crate::validator::ClassValidator;
use di_abstractions::{
    DefinitionList, ImplementationMatcher, ManualDefinitions, NamespaceScanner, Psr4Prefixes,
    ScanOptions, SharedReflector,
};
use infrastructure_common::{AutowireError, AutowireOptions};
use once_cell::sync::OnceCell;
use tracing::{debug, info, instrument};

/// 自动装配器
///
/// [`Autowiring::build`] 只执行一次流水线，之后的调用直接返回第一次的结果
pub struct Autowiring {
    namespace: String,
    skip_invalid: bool,
    scanner: Box<dyn NamespaceScanner>,
    reflector: SharedReflector,
    matcher: Box<dyn ImplementationMatcher>,
    manual: ManualDefinitions,
    definitions: OnceCell<DefinitionList>,
}

impl Autowiring {
    pub fn builder(namespace: impl Into<String>, reflector: SharedReflector) -> AutowiringBuilder {
        AutowiringBuilder::new(namespace, reflector)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn manual_definitions(&self) -> &ManualDefinitions {
        &self.manual
    }

    /// 是否已经构建过
    pub fn is_built(&self) -> bool {
        self.definitions.get().is_some()
    }

    /// 构建定义列表
    pub fn build(&self) -> Result<&DefinitionList, AutowireError> {
        self.definitions.get_or_try_init(|| {
            let tree = self.build_dependency_tree()?;
            let autowired = DefinitionListConverter::convert(&tree);
            let definitions = ManualOverrides::merge(autowired, &self.manual);

            info!(
                "命名空间 {} 自动装配完成，共 {} 个定义（手动定义 {} 个）",
                self.namespace,
                definitions.len(),
                self.manual.len()
            );
            Ok(definitions)
        })
    }

    /// 执行流水线直到依赖树，不做缓存
    #[instrument(skip(self), fields(namespace = %self.namespace, scanner = self.scanner.name()))]
    pub fn build_dependency_tree(&self) -> Result<DependencyTree, AutowireError> {
        let candidates = self.scanner.scan(&self.namespace)?;
        let candidates = ManualOverrides::filter(candidates, &self.manual);

        let classes = ClassValidator::new(self.reflector.clone())
            .validate_and_build_classes(&candidates, self.skip_invalid)?;

        let filename_index = build_filename_index(&classes);
        let interface_index = build_interface_index(&classes, self.reflector.as_ref());
        debug!("使用匹配策略: {}", self.matcher.name());

        DependencyTreeBuilder::new(
            &classes,
            self.reflector.as_ref(),
            &self.manual,
            &filename_index,
            &interface_index,
            self.matcher.as_ref(),
        )
        .build()
    }
}

impl std::fmt::Debug for Autowiring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autowiring")
            .field("namespace", &self.namespace)
            .field("scanner", &self.scanner.name())
            .field("matcher", &self.matcher.name())
            .field("manual", &self.manual.len())
            .field("built", &self.is_built())
            .finish()
    }
}

/// 自动装配器构建器
pub struct AutowiringBuilder {
    options: AutowireOptions,
    reflector: SharedReflector,
    prefixes: Option<Psr4Prefixes>,
    scanner: Option<Box<dyn NamespaceScanner>>,
    matcher: Option<Box<dyn ImplementationMatcher>>,
    bindings: BindingTableMatcher,
    manual: ManualDefinitions,
}

impl AutowiringBuilder {
    pub fn new(namespace: impl Into<String>, reflector: SharedReflector) -> Self {
        Self {
            options: AutowireOptions::new(namespace),
            reflector,
            prefixes: None,
            scanner: None,
            matcher: None,
            bindings: BindingTableMatcher::new(),
            manual: ManualDefinitions::new(),
        }
    }

    /// 使用完整的选项，命名空间也以选项为准
    pub fn with_options(mut self, options: AutowireOptions) -> Self {
        self.options = options;
        self
    }

    pub fn skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.options.skip_invalid = skip_invalid;
        self
    }

    /// 通过文件系统按 PSR-4 映射扫描，而不是枚举注册表
    pub fn with_prefixes(mut self, prefixes: Psr4Prefixes) -> Self {
        self.prefixes = Some(prefixes);
        self
    }

    /// 自定义扫描器，优先于 PSR-4 映射
    pub fn with_scanner(self, scanner: impl NamespaceScanner + 'static) -> Self {
        self.with_boxed_scanner(Box::new(scanner))
    }

    pub fn with_boxed_scanner(mut self, scanner: Box<dyn NamespaceScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// 自定义匹配策略，替换默认的绑定表和启发式
    pub fn with_matcher(mut self, matcher: impl ImplementationMatcher + 'static) -> Self {
        self.matcher = Some(Box::new(matcher));
        self
    }

    /// 为接口绑定实现
    pub fn bind(mut self, interface: impl Into<String>, implementation: impl Into<String>) -> Self {
        self.bindings = self.bindings.bind(interface, implementation);
        self
    }

    /// 为指定参数的接口依赖绑定实现
    pub fn bind_parameter(
        mut self,
        interface: impl Into<String>,
        parameter: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.bindings = self.bindings.bind_parameter(interface, parameter, implementation);
        self
    }

    pub fn with_bindings(mut self, bindings: BindingTableMatcher) -> Self {
        self.bindings = bindings;
        self
    }

    /// 添加手动定义，同名时后添加的优先
    pub fn with_manual_definitions(mut self, manual: ManualDefinitions) -> Self {
        self.manual.merge(&manual);
        self
    }

    pub fn build(self) -> Autowiring {
        let scanner: Box<dyn NamespaceScanner> = match (self.scanner, self.prefixes) {
            (Some(scanner), _) => scanner,
            (None, Some(prefixes)) => Box::new(
                FileSystemNamespaceScanner::new(prefixes).with_options(ScanOptions {
                    file_suffix: self.options.file_suffix.clone(),
                    ..ScanOptions::default()
                }),
            ),
            (None, None) => Box::new(RegistryNamespaceScanner::new(self.reflector.clone())),
        };

        let matcher = match self.matcher {
            Some(matcher) => matcher,
            None => Box::new(ChainedMatcher::default_policy(self.bindings, &self.options)),
        };

        Autowiring {
            namespace: self.options.namespace,
            skip_invalid: self.options.skip_invalid,
            scanner,
            reflector: self.reflector,
            matcher,
            manual: self.manual,
            definitions: OnceCell::new(),
        }
    }
}
