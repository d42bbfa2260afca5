//! 索引构建
//!
//! 从校验后的类型集合构建文件名索引和接口索引

use di_abstractions::{FilenameIndex, InterfaceIndex, TypeReflector};
use indexmap::{IndexMap, IndexSet};
use infrastructure_common::{NamingConventions, TypeDescriptor};
use tracing::debug;

/// 构建文件名索引
///
/// 键为简单名称首字母小写，值为共享该键的全部完全限定名称，保持校验顺序
pub fn build_filename_index(classes: &IndexMap<String, TypeDescriptor>) -> FilenameIndex {
    let mut index = FilenameIndex::new();
    for class_name in classes.keys() {
        index.insert(NamingConventions::filename_key(class_name), class_name.clone());
    }

    debug!("文件名索引构建完成，共 {} 个键", index.len());
    index
}

/// 构建接口索引
///
/// 每个类型映射到它实现的全部接口，包含接口继承链上的父接口。
/// 不在校验集合中的接口通过反射器查找。
pub fn build_interface_index(
    classes: &IndexMap<String, TypeDescriptor>,
    reflector: &dyn TypeReflector,
) -> InterfaceIndex {
    let mut index = InterfaceIndex::new();
    for (class_name, descriptor) in classes {
        let interfaces = collect_interfaces(descriptor, classes, reflector);
        index.insert(class_name.clone(), interfaces);
    }

    debug!("接口索引构建完成，共 {} 个类型", index.len());
    index
}

fn collect_interfaces(
    descriptor: &TypeDescriptor,
    classes: &IndexMap<String, TypeDescriptor>,
    reflector: &dyn TypeReflector,
) -> IndexSet<String> {
    let mut interfaces = IndexSet::new();
    let mut pending: Vec<String> = descriptor.interface_names().map(str::to_string).collect();

    while let Some(interface) = pending.pop() {
        if !interfaces.insert(interface.clone()) {
            continue;
        }

        let parents: Vec<String> = match classes.get(&interface) {
            Some(parent) => parent.interface_names().map(str::to_string).collect(),
            None => reflector
                .reflect(&interface)
                .map(|parent| parent.interface_names().map(str::to_string).collect())
                .unwrap_or_default(),
        };
        pending.extend(parents);
    }

    interfaces
}
