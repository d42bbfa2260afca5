//! 接口实现匹配策略
//!
//! 默认策略为"显式绑定表 + 参数名启发式"链：
//!
//! 1. [`BindingTableMatcher`] 查找按接口（以及可选的参数名）登记的绑定
//! 2. [`NameHeuristicMatcher`] 按参数名在文件名索引中查找实现

use di_abstractions::{ImplementationMatcher, MatchRequest};
use indexmap::IndexMap;
use infrastructure_common::{AutowireError, AutowireOptions, NamingConventions};
use tracing::debug;

/// 参数名启发式匹配
///
/// 参数名即文件名索引键：`transport: Arc<dyn Transport>` 只能注入简单名称为
/// `Transport` 且实现了该接口的类。索引键未命中或没有实现该接口的类时返回
/// [`AutowireError::MissingImplementationMatch`]，多于一个时返回
/// [`AutowireError::AmbiguousImplementationMatch`]。
#[derive(Debug, Clone, Default)]
pub struct NameHeuristicMatcher {
    snake_case_keys: bool,
}

impl NameHeuristicMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查找前把蛇形参数名转换为小驼峰，例如 `sms_gateway` => `smsGateway`
    pub fn with_snake_case_keys(mut self, enabled: bool) -> Self {
        self.snake_case_keys = enabled;
        self
    }

    fn index_key(&self, parameter: &str) -> String {
        if self.snake_case_keys {
            NamingConventions::snake_to_lower_camel(parameter)
        } else {
            parameter.to_string()
        }
    }
}

impl ImplementationMatcher for NameHeuristicMatcher {
    fn find_implementation(
        &self,
        request: &MatchRequest<'_>,
    ) -> Result<Option<String>, AutowireError> {
        let key = self.index_key(request.parameter);
        let expected_class = NamingConventions::upper_first(&key);

        let Some(candidates) = request.filename_index.get(&key) else {
            return Err(request.missing(expected_class));
        };

        let mut matched: Vec<&String> = candidates
            .iter()
            .filter(|class_name| request.interface_index.implements(class_name, request.interface))
            .collect();

        match matched.len() {
            0 => Err(request.missing(expected_class)),
            1 => {
                let class_name = matched.remove(0).clone();
                debug!(
                    "参数 {}::{} 匹配到实现 {}",
                    request.dependent, request.parameter, class_name
                );
                Ok(Some(class_name))
            }
            _ => Err(AutowireError::ambiguous_implementation(
                request.dependent,
                request.parameter,
                expected_class,
                request.interface,
            )),
        }
    }

    fn name(&self) -> &str {
        "name_heuristic"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BindingKey {
    interface: String,
    parameter: Option<String>,
}

/// 显式绑定表
///
/// 参数级绑定优先于接口级绑定；没有绑定时返回 `Ok(None)`。
/// 绑定的类必须出现在接口索引中且实现该接口。
#[derive(Debug, Clone, Default)]
pub struct BindingTableMatcher {
    bindings: IndexMap<BindingKey, String>,
}

impl BindingTableMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 接口 => 实现 映射创建
    pub fn from_map(bindings: &IndexMap<String, String>) -> Self {
        bindings
            .iter()
            .fold(Self::new(), |matcher, (interface, implementation)| {
                matcher.bind(interface, implementation)
            })
    }

    /// 为接口绑定实现
    pub fn bind(mut self, interface: impl Into<String>, implementation: impl Into<String>) -> Self {
        self.bindings.insert(
            BindingKey {
                interface: interface.into(),
                parameter: None,
            },
            implementation.into(),
        );
        self
    }

    /// 为指定参数名的接口依赖绑定实现
    pub fn bind_parameter(
        mut self,
        interface: impl Into<String>,
        parameter: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.bindings.insert(
            BindingKey {
                interface: interface.into(),
                parameter: Some(parameter.into()),
            },
            implementation.into(),
        );
        self
    }

    /// 合并另一个绑定表，同一个键以另一个表为准
    pub fn merge(mut self, other: BindingTableMatcher) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn lookup(&self, interface: &str, parameter: &str) -> Option<&String> {
        let by_parameter = BindingKey {
            interface: interface.to_string(),
            parameter: Some(parameter.to_string()),
        };
        let by_interface = BindingKey {
            interface: interface.to_string(),
            parameter: None,
        };
        self.bindings
            .get(&by_parameter)
            .or_else(|| self.bindings.get(&by_interface))
    }
}

impl ImplementationMatcher for BindingTableMatcher {
    fn find_implementation(
        &self,
        request: &MatchRequest<'_>,
    ) -> Result<Option<String>, AutowireError> {
        let Some(implementation) = self.lookup(request.interface, request.parameter) else {
            return Ok(None);
        };

        if !request.interface_index.implements(implementation, request.interface) {
            return Err(request.missing(implementation.clone()));
        }

        debug!(
            "参数 {}::{} 通过绑定表匹配到实现 {}",
            request.dependent, request.parameter, implementation
        );
        Ok(Some(implementation.clone()))
    }

    fn name(&self) -> &str {
        "binding_table"
    }
}

/// 按顺序尝试多个策略，第一个给出结果的策略生效
#[derive(Default)]
pub struct ChainedMatcher {
    matchers: Vec<Box<dyn ImplementationMatcher>>,
}

impl ChainedMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加策略
    pub fn with(mut self, matcher: impl ImplementationMatcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    /// 默认策略：绑定表在前，启发式在后（可通过选项关闭）
    pub fn default_policy(bindings: BindingTableMatcher, options: &AutowireOptions) -> Self {
        let chain = Self::new().with(bindings);
        if options.name_heuristic {
            chain.with(
                NameHeuristicMatcher::new().with_snake_case_keys(options.snake_case_parameter_keys),
            )
        } else {
            chain
        }
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl std::fmt::Debug for ChainedMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.matchers.iter().map(|matcher| matcher.name()).collect();
        f.debug_struct("ChainedMatcher").field("matchers", &names).finish()
    }
}

impl ImplementationMatcher for ChainedMatcher {
    fn find_implementation(
        &self,
        request: &MatchRequest<'_>,
    ) -> Result<Option<String>, AutowireError> {
        for matcher in &self.matchers {
            if let Some(class_name) = matcher.find_implementation(request)? {
                return Ok(Some(class_name));
            }
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        "chained"
    }
}
