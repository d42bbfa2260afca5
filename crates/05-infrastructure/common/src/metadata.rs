//! 元数据定义
//!
//! 提供类型描述符，替代运行时反射：每个可装配类型在启动时把自己的种类、
//! 实现的接口和构造函数签名登记到类型注册表中。

use crate::component::{CLI_SERVICE_INTERFACE, SERVICE_INTERFACE};
use crate::conventions::NamingConventions;
use crate::factory::{CastFn, Factory};
use std::fmt;

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// 可实例化的具体类型
    Concrete,
    /// 抽象类型，不能直接实例化
    Abstract,
    /// 接口（trait object）
    Interface,
    /// 混入类型，不能直接实例化
    Trait,
}

/// 构造函数参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorParameter {
    /// 参数名称（按源码书写）
    pub name: String,
    /// 声明的类型名称，缺失表示无法自动装配
    pub declared_type: Option<String>,
    /// 是否为基础类型
    pub builtin: bool,
}

impl ConstructorParameter {
    /// 创建引用类或接口的参数
    pub fn typed(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: Some(declared_type.into()),
            builtin: false,
        }
    }

    /// 创建基础类型参数
    pub fn builtin(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: Some(declared_type.into()),
            builtin: true,
        }
    }

    /// 创建没有可用类型声明的参数
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            builtin: false,
        }
    }
}

/// 实现的接口
///
/// `cast` 把实例向上转换为对应的 `Arc<dyn Interface>`，手工登记的描述符可以不提供
#[derive(Clone)]
pub struct InterfaceImpl {
    /// 接口完全限定名称
    pub name: String,
    /// 向上转换函数
    pub cast: Option<CastFn>,
}

impl fmt::Debug for InterfaceImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceImpl")
            .field("name", &self.name)
            .field("cast", &self.cast.map(|_| "<function>"))
            .finish()
    }
}

/// 类型描述符
///
/// 类型注册表中的一条记录，相当于一个可反射的类型
#[derive(Clone)]
pub struct TypeDescriptor {
    /// 完全限定名称
    pub name: String,
    /// 类型种类
    pub kind: TypeKind,
    /// 直接实现（类）或继承（接口）的接口
    pub interfaces: Vec<InterfaceImpl>,
    /// 构造函数参数，`None` 表示没有构造函数
    pub constructor: Option<Vec<ConstructorParameter>>,
    /// 实例工厂
    pub factory: Option<Factory>,
    /// 源码位置
    pub source: Option<String>,
}

impl TypeDescriptor {
    /// 创建新的类型描述符
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            interfaces: Vec::new(),
            constructor: None,
            factory: None,
            source: None,
        }
    }

    /// 创建具体类型描述符
    pub fn concrete(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Concrete)
    }

    /// 创建接口描述符
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    /// 创建抽象类型描述符
    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Abstract)
    }

    /// 创建混入类型描述符
    pub fn trait_type(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Trait)
    }

    /// 添加实现的接口
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.push_interface(interface.into(), None);
        self
    }

    /// 添加实现的接口以及向上转换函数
    pub fn implements_with(mut self, interface: impl Into<String>, cast: CastFn) -> Self {
        self.push_interface(interface.into(), Some(cast));
        self
    }

    /// 标记为服务
    pub fn service(self) -> Self {
        self.implements(SERVICE_INTERFACE)
    }

    /// 标记为命令行服务
    pub fn cli_service(self) -> Self {
        self.implements(CLI_SERVICE_INTERFACE)
    }

    /// 设置构造函数参数
    pub fn with_constructor(mut self, parameters: Vec<ConstructorParameter>) -> Self {
        self.constructor = Some(parameters);
        self
    }

    /// 设置实例工厂
    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// 设置源码位置
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 是否为具体类型
    pub fn is_concrete(&self) -> bool {
        self.kind == TypeKind::Concrete
    }

    /// 是否为接口
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// 是否为抽象类型
    pub fn is_abstract(&self) -> bool {
        self.kind == TypeKind::Abstract
    }

    /// 是否为混入类型
    pub fn is_trait(&self) -> bool {
        self.kind == TypeKind::Trait
    }

    /// 不包含命名空间的简短名称
    pub fn simple_name(&self) -> &str {
        NamingConventions::simple_name(&self.name)
    }

    /// 构造函数参数列表，没有构造函数时为空
    pub fn constructor_parameters(&self) -> &[ConstructorParameter] {
        self.constructor.as_deref().unwrap_or(&[])
    }

    /// 查找接口的向上转换函数
    pub fn cast_for(&self, interface: &str) -> Option<CastFn> {
        self.interfaces
            .iter()
            .find(|candidate| candidate.name == interface)
            .and_then(|candidate| candidate.cast)
    }

    /// 直接实现的接口名称
    pub fn interface_names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.iter().map(|interface| interface.name.as_str())
    }

    /// 合并同名描述符的另一部分登记信息
    ///
    /// 结构体和构造函数由不同的宏分别登记，启动顺序不确定
    pub fn merge(&mut self, other: TypeDescriptor) {
        self.kind = other.kind;
        for interface in other.interfaces {
            self.push_interface(interface.name, interface.cast);
        }
        if other.constructor.is_some() {
            self.constructor = other.constructor;
        }
        if other.factory.is_some() {
            self.factory = other.factory;
        }
        if other.source.is_some() {
            self.source = other.source;
        }
    }

    fn push_interface(&mut self, name: String, cast: Option<CastFn>) {
        match self.interfaces.iter_mut().find(|existing| existing.name == name) {
            Some(existing) => {
                if cast.is_some() {
                    existing.cast = cast;
                }
            }
            None => self.interfaces.push(InterfaceImpl { name, cast }),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("interfaces", &self.interfaces)
            .field("constructor", &self.constructor)
            .field("factory", &self.factory.map(|_| "<function>"))
            .field("source", &self.source)
            .finish()
    }
}
