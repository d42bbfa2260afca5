//! 演示用的组件
//!
//! 所有类型都在 `example_app::demo` 命名空间下，由宏在启动时登记

use component_macros::{autowire, component, interface};
use infrastructure_common::{CliService, Service};
use std::sync::Arc;
use tracing::info;

/// 消息通道
#[interface]
pub trait Channel: Send + Sync {
    fn deliver(&self, recipient: &str, message: &str);
}

/// 控制台通道
#[derive(Debug)]
#[component(implements(Channel))]
pub struct Console;

impl Channel for Console {
    fn deliver(&self, recipient: &str, message: &str) {
        info!("[console] {} <- {}", recipient, message);
    }
}

#[derive(Debug)]
#[component]
pub struct Clock;

impl Clock {
    pub fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

/// 欢迎消息服务
///
/// 通道参数名为 `console`，按文件名匹配到 [`Console`]
#[component(service)]
pub struct WelcomeNotifier {
    clock: Arc<Clock>,
    channel: Arc<dyn Channel>,
}

#[autowire]
impl WelcomeNotifier {
    pub fn new(clock: Arc<Clock>, console: Arc<dyn Channel>) -> Self {
        Self {
            clock,
            channel: console,
        }
    }
}

impl std::fmt::Debug for WelcomeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WelcomeNotifier").finish_non_exhaustive()
    }
}

impl Service for WelcomeNotifier {
    fn register(&self) {
        self.channel
            .deliver("admin", &format!("服务已注册，时间戳 {}", self.clock.now()));
    }
}

/// 清理过期数据的命令，只在命令行环境中注册
#[derive(Debug)]
#[component(cli)]
pub struct PruneCommand {
    retention_days: u32,
}

#[autowire]
impl PruneCommand {
    pub fn new(retention_days: u32) -> Self {
        Self { retention_days }
    }
}

impl CliService for PruneCommand {
    fn register(&self) {
        info!("注册命令 prune，保留 {} 天", self.retention_days);
    }
}
