//! 组件工厂与构造参数
//!
//! 容器把定义列表中的参数解析成 [`ResolvedArgument`]，再交给类型登记的工厂函数

use crate::component::Named;
use crate::errors::DependencyError;
use crate::metadata::InterfaceImpl;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::sync::Arc;

/// 容器中的共享实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 组件工厂函数类型
pub type Factory = fn(&mut Arguments) -> Result<Instance, DependencyError>;

/// 接口向上转换函数类型
///
/// 成功时返回装箱的 `Arc<dyn Interface>`
pub type CastFn = fn(Instance) -> Option<Box<dyn Any>>;

/// 已解析的构造参数
pub enum ResolvedArgument {
    /// 另一个类的实例
    Instance {
        /// 实例的类型名称
        class_name: String,
        /// 实例
        instance: Instance,
        /// 实例类型实现的接口，用于向上转换
        interfaces: Vec<InterfaceImpl>,
    },
    /// 字面量
    Literal(serde_json::Value),
}

impl std::fmt::Debug for ResolvedArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance { class_name, .. } => {
                f.debug_tuple("Instance").field(class_name).finish()
            }
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
        }
    }
}

/// 按构造函数参数顺序排列的实参
#[derive(Debug)]
pub struct Arguments {
    type_name: String,
    values: std::vec::IntoIter<ResolvedArgument>,
}

impl Arguments {
    /// 创建新的实参列表
    pub fn new(type_name: impl Into<String>, values: Vec<ResolvedArgument>) -> Self {
        Self {
            type_name: type_name.into(),
            values: values.into_iter(),
        }
    }

    /// 正在构造的类型名称
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// 剩余未消费的实参数量
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// 取出具体类型的实例
    pub fn class<T: Any + Send + Sync>(
        &mut self,
        parameter: &str,
    ) -> Result<Arc<T>, DependencyError> {
        match self.next(parameter)? {
            ResolvedArgument::Instance {
                class_name,
                instance,
                ..
            } => instance
                .downcast::<T>()
                .map_err(|_| DependencyError::CastFailed {
                    type_name: class_name,
                    target: std::any::type_name::<T>().to_string(),
                }),
            ResolvedArgument::Literal(_) => {
                Err(self.invalid(parameter, "期望类实例，实际为字面量"))
            }
        }
    }

    /// 取出接口实例
    pub fn interface<I>(&mut self, parameter: &str) -> Result<Arc<I>, DependencyError>
    where
        I: ?Sized + Named + 'static,
    {
        match self.next(parameter)? {
            ResolvedArgument::Instance {
                class_name,
                instance,
                interfaces,
            } => interfaces
                .iter()
                .find(|interface| interface.name == I::NAME)
                .and_then(|interface| interface.cast)
                .and_then(|cast| cast(instance))
                .and_then(|boxed| boxed.downcast::<Arc<I>>().ok())
                .map(|arc| *arc)
                .ok_or_else(|| DependencyError::CastFailed {
                    type_name: class_name,
                    target: I::NAME.to_string(),
                }),
            ResolvedArgument::Literal(_) => {
                Err(self.invalid(parameter, "期望接口实例，实际为字面量"))
            }
        }
    }

    /// 取出字面量并反序列化
    pub fn literal<T: DeserializeOwned>(&mut self, parameter: &str) -> Result<T, DependencyError> {
        match self.next(parameter)? {
            ResolvedArgument::Literal(value) => serde_json::from_value(value)
                .map_err(|e| self.invalid(parameter, e)),
            ResolvedArgument::Instance { class_name, .. } => Err(self.invalid(
                parameter,
                format!("期望字面量，实际为 {} 的实例", class_name),
            )),
        }
    }

    fn next(&mut self, parameter: &str) -> Result<ResolvedArgument, DependencyError> {
        self.values
            .next()
            .ok_or_else(|| DependencyError::MissingArgument {
                type_name: self.type_name.clone(),
                parameter: parameter.to_string(),
            })
    }

    fn invalid(&self, parameter: &str, message: impl std::fmt::Display) -> DependencyError {
        DependencyError::InvalidArgument {
            type_name: self.type_name.clone(),
            parameter: parameter.to_string(),
            message: message.to_string(),
        }
    }
}
