//! 依赖树
//!
//! 以服务类为根，记录每个类在构造时需要注入的类

use di_abstractions::{
    FilenameIndex, ImplementationMatcher, InterfaceIndex, ManualDefinitions, MatchRequest,
    TypeReflector,
};
use indexmap::IndexMap;
use infrastructure_common::{
    AutowireError, NamingConventions, TypeDescriptor, CLI_SERVICE_INTERFACE, SERVICE_INTERFACE,
};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// 依赖树节点
///
/// `arguments` 按构造参数顺序记录注入的类（同一个类可能出现多次），
/// `children` 是去重后的依赖集合。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyNode {
    arguments: Vec<String>,
    children: IndexMap<String, DependencyNode>,
}

impl DependencyNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加下一个构造参数注入的类
    pub fn add_dependency(&mut self, class_name: impl Into<String>) {
        let class_name = class_name.into();
        self.children.entry(class_name.clone()).or_default();
        self.arguments.push(class_name);
    }

    /// 按构造参数顺序注入的类
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// 去重后的依赖名称
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// 子节点
    pub fn child(&self, class_name: &str) -> Option<&DependencyNode> {
        self.children.get(class_name)
    }

    pub fn depends_on(&self, class_name: &str) -> bool {
        self.children.contains_key(class_name)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// 依赖树
///
/// 顶层条目包括全部服务类以及它们传递依赖的非手动定义类，
/// 每个条目只记录直接依赖。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyTree {
    nodes: IndexMap<String, DependencyNode>,
}

impl DependencyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, class_name: &str) -> Option<&DependencyNode> {
        self.nodes.get(class_name)
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.nodes.contains_key(class_name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DependencyNode)> {
        self.nodes.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 已存在的条目优先
    fn insert_if_absent(&mut self, class_name: String, node: DependencyNode) {
        self.nodes.entry(class_name).or_insert(node);
    }

    /// 展开某个类的完整传递依赖树
    ///
    /// 顶层之外的类（例如手动定义的类）作为叶子节点出现
    pub fn expand(&self, class_name: &str) -> Result<DependencyNode, AutowireError> {
        let mut path = Vec::new();
        self.expand_node(class_name, &mut path)
    }

    fn expand_node(
        &self,
        class_name: &str,
        path: &mut Vec<String>,
    ) -> Result<DependencyNode, AutowireError> {
        if let Some(chain) = cycle_chain(path, class_name) {
            return Err(AutowireError::CircularDependency { dependency_chain: chain });
        }

        let Some(node) = self.nodes.get(class_name) else {
            return Ok(DependencyNode::new());
        };

        path.push(class_name.to_string());
        let mut expanded = DependencyNode {
            arguments: node.arguments.clone(),
            children: IndexMap::with_capacity(node.children.len()),
        };
        for dependency in node.children.keys() {
            let child = self.expand_node(dependency, path)?;
            expanded.children.insert(dependency.clone(), child);
        }
        path.pop();

        Ok(expanded)
    }

    /// 检查依赖树与手动定义合起来是否存在环
    pub fn detect_cycles(&self, manual: &ManualDefinitions) -> Result<(), AutowireError> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        for class_name in self.nodes.keys() {
            self.visit(class_name, manual, &mut visited, &mut path)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        class_name: &str,
        manual: &ManualDefinitions,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Result<(), AutowireError> {
        if let Some(chain) = cycle_chain(path, class_name) {
            return Err(AutowireError::CircularDependency { dependency_chain: chain });
        }
        if visited.contains(class_name) {
            return Ok(());
        }

        let edges: Vec<String> = match self.nodes.get(class_name) {
            Some(node) => node.children.keys().cloned().collect(),
            None => manual
                .get(class_name)
                .map(|definition| definition.class_references().map(str::to_string).collect())
                .unwrap_or_default(),
        };

        path.push(class_name.to_string());
        for dependency in &edges {
            self.visit(dependency, manual, visited, path)?;
        }
        path.pop();
        visited.insert(class_name.to_string());

        Ok(())
    }
}

fn cycle_chain(path: &[String], class_name: &str) -> Option<String> {
    let start = path.iter().position(|name| name == class_name)?;
    let mut chain: Vec<&str> = path[start..].iter().map(String::as_str).collect();
    chain.push(class_name);
    Some(chain.join(" -> "))
}

/// 依赖树构建器
pub struct DependencyTreeBuilder<'a> {
    classes: &'a IndexMap<String, TypeDescriptor>,
    reflector: &'a dyn TypeReflector,
    manual: &'a ManualDefinitions,
    filename_index: &'a FilenameIndex,
    interface_index: &'a InterfaceIndex,
    matcher: &'a dyn ImplementationMatcher,
}

impl<'a> DependencyTreeBuilder<'a> {
    pub fn new(
        classes: &'a IndexMap<String, TypeDescriptor>,
        reflector: &'a dyn TypeReflector,
        manual: &'a ManualDefinitions,
        filename_index: &'a FilenameIndex,
        interface_index: &'a InterfaceIndex,
        matcher: &'a dyn ImplementationMatcher,
    ) -> Self {
        Self {
            classes,
            reflector,
            manual,
            filename_index,
            interface_index,
            matcher,
        }
    }

    /// 构建依赖树
    ///
    /// 1. 为每个未手动定义的具体服务类建立节点
    /// 2. 补全被引用但尚未建立节点的非手动定义类，直到不再出现新类
    /// 3. 检查循环依赖
    pub fn build(&self) -> Result<DependencyTree, AutowireError> {
        let mut tree = DependencyTree::new();

        for (class_name, descriptor) in self.classes {
            if self.manual.contains(class_name) {
                trace!("跳过手动定义的类: {}", class_name);
                continue;
            }
            if !descriptor.is_concrete() || !self.is_service(class_name) {
                continue;
            }

            let node = self.build_node(descriptor)?;
            tree.insert_if_absent(class_name.clone(), node);
        }

        let service_count = tree.len();
        let mut pending: VecDeque<String> = tree
            .nodes
            .values()
            .flat_map(|node| node.children.keys().cloned())
            .collect();

        while let Some(dependency) = pending.pop_front() {
            if tree.contains(&dependency) || self.manual.contains(&dependency) {
                continue;
            }
            let Some(descriptor) = self.describe(&dependency) else {
                debug!("依赖 {} 无法加载，不再展开", dependency);
                continue;
            };

            let node = self.build_node(&descriptor)?;
            pending.extend(node.children.keys().cloned());
            tree.insert_if_absent(dependency, node);
        }

        debug!(
            "依赖树构建完成，{} 个服务类，{} 个传递依赖",
            service_count,
            tree.len() - service_count
        );

        tree.detect_cycles(self.manual)?;
        Ok(tree)
    }

    /// 为单个类建立直接依赖节点
    pub fn build_node(&self, descriptor: &TypeDescriptor) -> Result<DependencyNode, AutowireError> {
        let mut node = DependencyNode::new();

        for parameter in descriptor.constructor_parameters() {
            let Some(declared_type) = parameter.declared_type.as_deref() else {
                trace!("{} 的参数 {} 没有声明类型，跳过", descriptor.name, parameter.name);
                continue;
            };

            if parameter.builtin {
                if NamingConventions::is_reserved_parameter(&parameter.name) {
                    continue;
                }
                return Err(AutowireError::PrimitiveDependencyFound {
                    class_name: descriptor.name.clone(),
                    parameter: parameter.name.clone(),
                });
            }

            let Some(dependency) = self.describe(declared_type) else {
                debug!(
                    "{} 的参数 {} 声明的类型 {} 无法加载，跳过",
                    descriptor.name, parameter.name, declared_type
                );
                continue;
            };

            if dependency.is_interface() {
                let request = MatchRequest {
                    dependent: &descriptor.name,
                    parameter: &parameter.name,
                    interface: &dependency.name,
                    filename_index: self.filename_index,
                    interface_index: self.interface_index,
                };
                let implementation = self
                    .matcher
                    .find_implementation(&request)?
                    .ok_or_else(|| {
                        request.missing(NamingConventions::upper_first(&parameter.name))
                    })?;
                node.add_dependency(implementation);
            } else {
                node.add_dependency(dependency.name);
            }
        }

        Ok(node)
    }

    fn is_service(&self, class_name: &str) -> bool {
        self.interface_index.implements(class_name, SERVICE_INTERFACE)
            || self.interface_index.implements(class_name, CLI_SERVICE_INTERFACE)
    }

    fn describe(&self, class_name: &str) -> Option<TypeDescriptor> {
        self.classes
            .get(class_name)
            .cloned()
            .or_else(|| self.reflector.reflect(class_name))
    }
}
