//! 定义列表驱动的依赖注入容器

use di_abstractions::{
    Argument, ContainerBuilder, DefinitionList, ServiceContainer, SharedReflector,
};
use infrastructure_common::{
    Arguments, DependencyError, Instance, Named, ResolvedArgument, TypeDescriptor,
};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 解析上下文
///
/// 记录当前正在实例化的类，用于发现实例化阶段的循环依赖
#[derive(Debug, Default)]
pub struct ResolveContext {
    resolution_chain: Vec<String>,
}

impl ResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进入一个类的实例化
    pub fn push(&mut self, class_name: &str) -> Result<(), DependencyError> {
        if let Some(start) = self.resolution_chain.iter().position(|name| name == class_name) {
            let mut chain: Vec<&str> = self.resolution_chain[start..]
                .iter()
                .map(String::as_str)
                .collect();
            chain.push(class_name);
            return Err(DependencyError::CircularDependency {
                dependency_chain: chain.join(" -> "),
            });
        }

        self.resolution_chain.push(class_name.to_string());
        Ok(())
    }

    /// 离开当前类的实例化
    pub fn pop(&mut self) {
        self.resolution_chain.pop();
    }

    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

/// 具体的依赖注入容器实现
///
/// 每个类最多创建一个共享实例。定义列表决定构造参数，
/// 类型注册表提供工厂函数和接口向上转换函数。
pub struct DiContainerImpl {
    definitions: DefinitionList,
    reflector: SharedReflector,
    instances: Mutex<HashMap<String, Instance>>,
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new(definitions: DefinitionList, reflector: SharedReflector) -> Self {
        Self {
            definitions,
            reflector,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// 获取具体类型的共享实例
    pub fn get_typed<T: Any + Send + Sync>(
        &self,
        class_name: &str,
    ) -> Result<Arc<T>, DependencyError> {
        self.get(class_name)?
            .downcast::<T>()
            .map_err(|_| DependencyError::CastFailed {
                type_name: class_name.to_string(),
                target: std::any::type_name::<T>().to_string(),
            })
    }

    /// 获取共享实例并向上转换为接口
    pub fn get_as<I>(&self, class_name: &str) -> Result<Arc<I>, DependencyError>
    where
        I: ?Sized + Named + 'static,
    {
        let instance = self.get(class_name)?;
        let cast_failed = || DependencyError::CastFailed {
            type_name: class_name.to_string(),
            target: I::NAME.to_string(),
        };

        let cast = self
            .describe(class_name)?
            .cast_for(I::NAME)
            .ok_or_else(cast_failed)?;
        cast(instance)
            .and_then(|boxed| boxed.downcast::<Arc<I>>().ok())
            .map(|arc| *arc)
            .ok_or_else(cast_failed)
    }

    /// 类型描述符
    pub fn describe(&self, class_name: &str) -> Result<TypeDescriptor, DependencyError> {
        self.reflector
            .reflect(class_name)
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                type_name: class_name.to_string(),
            })
    }

    /// 已创建的实例数量
    pub fn instance_count(&self) -> usize {
        self.instances.lock().len()
    }

    fn resolve(
        &self,
        class_name: &str,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        let cached = self.instances.lock().get(class_name).cloned();
        if let Some(instance) = cached {
            return Ok(instance);
        }

        context.push(class_name)?;
        let created = self.create(class_name, context);
        context.pop();
        let instance = created?;

        let mut instances = self.instances.lock();
        Ok(instances
            .entry(class_name.to_string())
            .or_insert(instance)
            .clone())
    }

    fn create(
        &self,
        class_name: &str,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        let descriptor = self.describe(class_name)?;
        let factory = descriptor.factory.ok_or_else(|| DependencyError::FactoryMissing {
            type_name: class_name.to_string(),
        })?;

        let values = match self.definitions.get(class_name) {
            Some(definition) => definition
                .arguments()
                .iter()
                .map(|argument| self.resolve_argument(argument, context))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        debug!("创建实例: {} (深度 {})", class_name, context.depth());
        let mut arguments = Arguments::new(class_name, values);
        factory(&mut arguments)
    }

    fn resolve_argument(
        &self,
        argument: &Argument,
        context: &mut ResolveContext,
    ) -> Result<ResolvedArgument, DependencyError> {
        match argument {
            Argument::Class(class_name) => {
                let instance = self.resolve(class_name, context)?;
                let interfaces = self.describe(class_name)?.interfaces;
                Ok(ResolvedArgument::Instance {
                    class_name: class_name.clone(),
                    instance,
                    interfaces,
                })
            }
            Argument::Literal(value) => Ok(ResolvedArgument::Literal(value.clone())),
        }
    }
}

impl std::fmt::Debug for DiContainerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiContainerImpl")
            .field("definitions", &self.definitions.len())
            .field("instances", &self.instance_count())
            .finish()
    }
}

impl ServiceContainer for DiContainerImpl {
    fn get(&self, class_name: &str) -> Result<Instance, DependencyError> {
        self.resolve(class_name, &mut ResolveContext::new())
    }

    fn has(&self, class_name: &str) -> bool {
        self.definitions.contains(class_name)
    }

    fn definitions(&self) -> &DefinitionList {
        &self.definitions
    }
}

/// 容器构建器实现
pub struct DiContainerBuilder {
    definitions: DefinitionList,
    reflector: SharedReflector,
}

impl DiContainerBuilder {
    pub fn new(reflector: SharedReflector) -> Self {
        Self {
            definitions: DefinitionList::new(),
            reflector,
        }
    }
}

impl ContainerBuilder for DiContainerBuilder {
    type Container = DiContainerImpl;

    fn add_definitions(mut self, definitions: DefinitionList) -> Self {
        self.definitions.merge(&definitions);
        self
    }

    fn build(self) -> Result<Self::Container, DependencyError> {
        for class_name in self.definitions.class_names() {
            if self.reflector.reflect(class_name).is_none() {
                return Err(DependencyError::ComponentNotRegistered {
                    type_name: class_name.to_string(),
                });
            }
        }

        info!("构建容器完成，共 {} 个定义", self.definitions.len());
        Ok(DiContainerImpl::new(self.definitions, self.reflector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::{CastFn, TypeRegistry};

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    impl Named for dyn Greeter {
        const NAME: &'static str = "test::Greeter";
    }

    #[derive(Debug)]
    struct Logger;

    #[derive(Debug)]
    struct English {
        logger: Arc<Logger>,
    }

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[derive(Debug)]
    struct Report {
        total: i32,
    }

    struct Front {
        greeter: Arc<dyn Greeter>,
    }

    fn cast_greeter(instance: Instance) -> Option<Box<dyn Any>> {
        let english = instance.downcast::<English>().ok()?;
        let greeter: Arc<dyn Greeter> = english;
        Some(Box::new(greeter))
    }

    fn registry() -> SharedReflector {
        let registry = TypeRegistry::new();
        registry.register(
            TypeDescriptor::concrete("test::Logger")
                .with_factory(|_| Ok(Arc::new(Logger) as Instance)),
        );
        registry.register(
            TypeDescriptor::concrete("test::English")
                .implements_with("test::Greeter", cast_greeter as CastFn)
                .with_factory(|arguments| {
                    let logger = arguments.class::<Logger>("logger")?;
                    Ok(Arc::new(English { logger }) as Instance)
                }),
        );
        registry.register(TypeDescriptor::concrete("test::Front").with_factory(|arguments| {
            let greeter = arguments.interface::<dyn Greeter>("greeter")?;
            Ok(Arc::new(Front { greeter }) as Instance)
        }));
        registry.register(TypeDescriptor::concrete("test::Report").with_factory(|arguments| {
            let total = arguments.literal::<i32>("total")?;
            Ok(Arc::new(Report { total }) as Instance)
        }));
        registry.register(TypeDescriptor::concrete("test::A").with_factory(|arguments| {
            arguments.class::<Logger>("b")?;
            Ok(Arc::new(Logger) as Instance)
        }));
        registry.register(TypeDescriptor::concrete("test::B").with_factory(|arguments| {
            arguments.class::<Logger>("a")?;
            Ok(Arc::new(Logger) as Instance)
        }));
        registry.register(TypeDescriptor::interface("test::Greeter"));
        Arc::new(registry)
    }

    fn container(definitions: DefinitionList) -> DiContainerImpl {
        DiContainerBuilder::new(registry())
            .add_definitions(definitions)
            .build()
            .unwrap()
    }

    #[test]
    fn test_shared_instances_and_interface_arguments() {
        let container = container(
            DefinitionList::new()
                .with("test::Front", vec![Argument::class("test::English")])
                .with("test::English", vec![Argument::class("test::Logger")])
                .with("test::Logger", Vec::new()),
        );

        let front = container.get_typed::<Front>("test::Front").unwrap();
        let english = container.get_typed::<English>("test::English").unwrap();
        let logger = container.get_typed::<Logger>("test::Logger").unwrap();

        assert_eq!(front.greeter.greet(), "hello");
        assert!(Arc::ptr_eq(&english.logger, &logger));
        assert_eq!(container.instance_count(), 3);

        let greeter = container.get_as::<dyn Greeter>("test::English").unwrap();
        assert_eq!(greeter.greet(), "hello");
    }

    #[test]
    fn test_literal_arguments() {
        let container =
            container(DefinitionList::new().with("test::Report", vec![Argument::literal(10)]));
        assert_eq!(container.get_typed::<Report>("test::Report").unwrap().total, 10);
    }

    #[test]
    fn test_missing_argument_is_reported() {
        let container = container(DefinitionList::new().with("test::Report", Vec::new()));
        let err = container.get("test::Report").unwrap_err();
        assert!(matches!(
            err,
            DependencyError::MissingArgument { ref parameter, .. } if parameter == "total"
        ));
    }

    #[test]
    fn test_instantiation_cycle() {
        let container = container(
            DefinitionList::new()
                .with("test::A", vec![Argument::class("test::B")])
                .with("test::B", vec![Argument::class("test::A")]),
        );

        let err = container.get("test::A").unwrap_err();
        assert!(matches!(
            err,
            DependencyError::CircularDependency { ref dependency_chain }
                if dependency_chain == "test::A -> test::B -> test::A"
        ));
    }

    #[test]
    fn test_build_rejects_unknown_classes() {
        let err = DiContainerBuilder::new(registry())
            .add_definitions(DefinitionList::new().with("test::Ghost", Vec::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, DependencyError::ComponentNotRegistered { .. }));
    }

    #[test]
    fn test_interfaces_have_no_factory() {
        let container = container(DefinitionList::new().with("test::Greeter", Vec::new()));
        assert!(matches!(
            container.get("test::Greeter").unwrap_err(),
            DependencyError::FactoryMissing { .. }
        ));
        assert!(container.has("test::Greeter"));
    }

    #[test]
    fn test_instances_are_shared() {
        let container = container(DefinitionList::new().with("test::Logger", Vec::new()));
        let first = container.get("test::Logger").unwrap();
        let second = container.get("test::Logger").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(container.instance_count(), 1);
    }
}
