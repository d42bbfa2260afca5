//! 接口实现匹配策略抽象接口
//!
//! 决定接口类型的构造参数应该注入哪一个具体实现

use crate::index::{FilenameIndex, InterfaceIndex};
use infrastructure_common::AutowireError;

/// 实现匹配策略 trait
///
/// 返回 `Ok(None)` 表示该策略对此接口没有意见，由下一个策略继续匹配；
/// 返回错误则立即终止解析。
pub trait ImplementationMatcher: Send + Sync {
    /// 为接口类型参数查找具体实现
    fn find_implementation(
        &self,
        request: &MatchRequest<'_>,
    ) -> Result<Option<String>, AutowireError>;

    /// 获取策略名称
    fn name(&self) -> &str;
}

/// 匹配请求
#[derive(Debug, Clone, Copy)]
pub struct MatchRequest<'a> {
    /// 依赖方类型
    pub dependent: &'a str,
    /// 构造参数名称
    pub parameter: &'a str,
    /// 参数声明的接口
    pub interface: &'a str,
    /// 文件名索引
    pub filename_index: &'a FilenameIndex,
    /// 接口索引
    pub interface_index: &'a InterfaceIndex,
}

impl MatchRequest<'_> {
    /// 按参数名称生成的缺少实现错误
    pub fn missing(&self, class_name: impl Into<String>) -> AutowireError {
        AutowireError::missing_implementation(
            self.dependent,
            self.parameter,
            class_name,
            self.interface,
        )
    }
}
