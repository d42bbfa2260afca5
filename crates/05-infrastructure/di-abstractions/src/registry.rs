//! 类型反射抽象接口

use infrastructure_common::{TypeDescriptor, TypeRegistry};
use std::sync::Arc;

/// 类型反射器 trait
///
/// 用于代替运行时反射，按完全限定名称获取类型描述符
pub trait TypeReflector: Send + Sync {
    /// 获取类型描述符，类型无法加载时返回 `None`
    fn reflect(&self, name: &str) -> Option<TypeDescriptor>;

    /// 指定命名空间下的所有类型名称
    fn type_names_in(&self, namespace: &str) -> Vec<String>;
}

impl TypeReflector for TypeRegistry {
    fn reflect(&self, name: &str) -> Option<TypeDescriptor> {
        self.get(name)
    }

    fn type_names_in(&self, namespace: &str) -> Vec<String> {
        self.names_in_namespace(namespace)
    }
}

impl<T: TypeReflector + ?Sized> TypeReflector for &T {
    fn reflect(&self, name: &str) -> Option<TypeDescriptor> {
        (**self).reflect(name)
    }

    fn type_names_in(&self, namespace: &str) -> Vec<String> {
        (**self).type_names_in(namespace)
    }
}

impl<T: TypeReflector + ?Sized> TypeReflector for Arc<T> {
    fn reflect(&self, name: &str) -> Option<TypeDescriptor> {
        (**self).reflect(name)
    }

    fn type_names_in(&self, namespace: &str) -> Vec<String> {
        (**self).type_names_in(namespace)
    }
}

/// 共享的类型反射器
pub type SharedReflector = Arc<dyn TypeReflector>;
