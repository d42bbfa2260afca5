//! 服务启动器
//!
//! 把自动装配得到的定义列表交给容器，并按执行环境注册服务

use di_abstractions::{
    ContainerBuilder, DefinitionList, ServiceContainer, SharedReflector, TypeReflector,
};
use di_impl::{Autowiring, DefinitionCache, DiContainerBuilder, DiContainerImpl};
use infrastructure_common::{
    AutowireOptions, CliService, ExecutionContext, InfrastructureError, Service, TypeDescriptor,
};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// 服务启动器
///
/// 负责协调定义构建、容器创建和服务注册的顺序
pub struct ServiceBootstrapper {
    autowiring: Autowiring,
    reflector: SharedReflector,
    options: AutowireOptions,
    cache: Option<DefinitionCache>,
    definitions: OnceCell<DefinitionList>,
    container: OnceCell<Arc<DiContainerImpl>>,
    registered: OnceCell<Vec<String>>,
}

impl ServiceBootstrapper {
    /// 创建新的服务启动器
    pub fn new(
        autowiring: Autowiring,
        reflector: SharedReflector,
        options: AutowireOptions,
    ) -> Self {
        let cache = DefinitionCache::from_options(&options);
        Self {
            autowiring,
            reflector,
            options,
            cache,
            definitions: OnceCell::new(),
            container: OnceCell::new(),
            registered: OnceCell::new(),
        }
    }

    pub fn options(&self) -> &AutowireOptions {
        &self.options
    }

    /// 定义列表
    ///
    /// 预发布和生产环境优先读取缓存
    pub fn definitions(&self) -> Result<&DefinitionList, InfrastructureError> {
        let definitions = self.definitions.get_or_try_init(|| match &self.cache {
            Some(cache) => cache.load_or_build(|| self.autowiring.build().cloned()),
            None => self.autowiring.build().cloned(),
        })?;
        Ok(definitions)
    }

    /// 构建容器但不注册服务
    pub fn build_di_container(&self) -> Result<Arc<DiContainerImpl>, InfrastructureError> {
        let container = self.container.get_or_try_init(|| {
            let definitions = self.definitions()?.clone();
            let container = DiContainerBuilder::new(self.reflector.clone())
                .add_definitions(definitions)
                .build()?;
            Ok::<_, InfrastructureError>(Arc::new(container))
        })?;
        Ok(container.clone())
    }

    /// 注册服务
    ///
    /// 先实例化全部定义，再对当前执行环境对应的标记能力逐个调用一次 `register`。
    /// 任一定义实例化失败时不调用任何 `register`，已经注册过时直接返回。
    #[instrument(skip(self), fields(namespace = %self.options.namespace))]
    pub fn register_services(&self) -> Result<(), InfrastructureError> {
        if self.registered.get().is_some() {
            debug!("服务已经注册，跳过");
            return Ok(());
        }

        self.registered.get_or_try_init(|| {
            let container = self.build_di_container()?;
            let context = self.options.execution_context;
            let class_names: Vec<String> = container
                .definitions()
                .class_names()
                .map(str::to_string)
                .collect();

            let mut pending = Vec::new();
            for class_name in class_names {
                container.get(&class_name)?;

                let descriptor = container.describe(&class_name)?;
                if !self.carries_marker(&descriptor, context.marker_interface()) {
                    continue;
                }
                let service = match context {
                    ExecutionContext::Standard => {
                        Registration::Standard(container.get_as::<dyn Service>(&class_name)?)
                    }
                    ExecutionContext::Cli => {
                        Registration::Cli(container.get_as::<dyn CliService>(&class_name)?)
                    }
                };
                pending.push((class_name, service));
            }

            let mut registered = Vec::with_capacity(pending.len());
            for (class_name, service) in pending {
                service.register();
                debug!("已注册服务: {}", class_name);
                registered.push(class_name);
            }

            info!(
                "服务注册完成，执行环境 {:?}，共注册 {} 个服务",
                context,
                registered.len()
            );
            Ok::<_, InfrastructureError>(registered)
        })?;
        Ok(())
    }

    /// 类型是否直接或经由父接口实现了标记接口
    fn carries_marker(&self, descriptor: &TypeDescriptor, marker: &str) -> bool {
        let mut seen = HashSet::new();
        let mut pending: Vec<String> = descriptor.interface_names().map(str::to_string).collect();
        while let Some(interface) = pending.pop() {
            if interface == marker {
                return true;
            }
            if !seen.insert(interface.clone()) {
                continue;
            }
            if let Some(parent) = self.reflector.reflect(&interface) {
                pending.extend(parent.interface_names().map(str::to_string));
            }
        }
        false
    }

    /// 已注册的服务，尚未注册时为 `None`
    pub fn registered_services(&self) -> Option<&[String]> {
        self.registered.get().map(Vec::as_slice)
    }

    pub fn is_registered(&self) -> bool {
        self.registered.get().is_some()
    }
}

/// 已实例化、等待注册的服务
enum Registration {
    Standard(Arc<dyn Service>),
    Cli(Arc<dyn CliService>),
}

impl Registration {
    fn register(&self) {
        match self {
            Self::Standard(service) => service.register(),
            Self::Cli(service) => service.register(),
        }
    }
}

impl std::fmt::Debug for ServiceBootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBootstrapper")
            .field("autowiring", &self.autowiring)
            .field("cache", &self.cache.as_ref().map(DefinitionCache::path))
            .field("registered", &self.registered_services())
            .finish()
    }
}
