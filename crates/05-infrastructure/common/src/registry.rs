//! 类型注册表
//!
//! 编译时自注册的类型描述符集合，是自动装配能"看到"的全部类型

use crate::conventions::NAMESPACE_SEPARATOR;
use crate::factory::Factory;
use crate::metadata::{ConstructorParameter, TypeDescriptor, TypeKind};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::trace;

/// 类型注册表
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<IndexMap<String, TypeDescriptor>>,
}

impl TypeRegistry {
    /// 创建新的类型注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类型描述符，同名描述符会被合并
    pub fn register(&self, descriptor: TypeDescriptor) {
        trace!("注册类型描述符: {}", descriptor.name);
        let mut types = self.types.write();
        match types.get_mut(&descriptor.name) {
            Some(existing) => existing.merge(descriptor),
            None => {
                types.insert(descriptor.name.clone(), descriptor);
            }
        }
    }

    /// 注册构造函数签名和工厂
    pub fn register_constructor(
        &self,
        name: impl Into<String>,
        parameters: Vec<ConstructorParameter>,
        factory: Factory,
    ) {
        let descriptor = TypeDescriptor::new(name, TypeKind::Concrete)
            .with_constructor(parameters)
            .with_factory(factory);
        let mut types = self.types.write();
        match types.get_mut(&descriptor.name) {
            // 构造函数登记不改变已登记的类型种类
            Some(existing) => {
                existing.constructor = descriptor.constructor;
                existing.factory = descriptor.factory;
            }
            None => {
                types.insert(descriptor.name.clone(), descriptor);
            }
        }
    }

    /// 获取类型描述符
    pub fn get(&self, name: &str) -> Option<TypeDescriptor> {
        self.types.read().get(name).cloned()
    }

    /// 检查类型是否已注册
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// 所有已注册类型名称，按注册顺序
    pub fn names(&self) -> Vec<String> {
        self.types.read().keys().cloned().collect()
    }

    /// 指定命名空间下的所有类型名称，按名称排序
    pub fn names_in_namespace(&self, namespace: &str) -> Vec<String> {
        let prefix = format!("{}{}", namespace, NAMESPACE_SEPARATOR);
        let mut names: Vec<String> = self
            .types
            .read()
            .keys()
            .filter(|name| name.starts_with(&prefix))
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// 已注册类型数量
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{Arguments, Instance};
    use crate::errors::DependencyError;
    use std::sync::Arc;

    fn unit_factory(_arguments: &mut Arguments) -> Result<Instance, DependencyError> {
        Ok(Arc::new(()))
    }

    #[test]
    fn test_constructor_and_struct_registration_merge_in_any_order() {
        let registry = TypeRegistry::new();
        registry.register_constructor(
            "app::Mailer",
            vec![ConstructorParameter::typed("logger", "app::Logger")],
            unit_factory,
        );
        registry.register(TypeDescriptor::concrete("app::Mailer").service());

        let mailer = registry.get("app::Mailer").unwrap();
        assert_eq!(mailer.constructor_parameters().len(), 1);
        assert!(mailer.factory.is_some());
        assert_eq!(mailer.interfaces.len(), 1);

        registry.register(TypeDescriptor::interface("app::Transport"));
        registry.register_constructor("app::Transport", Vec::new(), unit_factory);
        assert!(registry.get("app::Transport").unwrap().is_interface());
    }

    #[test]
    fn test_names_in_namespace() {
        let registry = TypeRegistry::new();
        registry.register(TypeDescriptor::concrete("app::b::Second"));
        registry.register(TypeDescriptor::concrete("app::First"));
        registry.register(TypeDescriptor::concrete("application::Other"));

        assert_eq!(
            registry.names_in_namespace("app"),
            vec!["app::First".to_string(), "app::b::Second".to_string()]
        );
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("application::Other"));
    }
}
