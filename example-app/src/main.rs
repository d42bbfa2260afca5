//! # 示例应用程序
//!
//! 演示如何使用宏登记类型、自动装配命名空间并按执行环境注册服务

mod demo;

use anyhow::Context;
use clap::Parser;
use di_abstractions::{Argument, ManualDefinitions, ServiceContainer};
use infrastructure_common::{DeploymentMode, ExecutionContext, Named};
use infrastructure_composition::{LoggingConfig, ServiceBootstrapBuilder};
use std::path::PathBuf;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn Autowire 示例应用")]
struct Args {
    /// 扫描的根命名空间
    #[arg(short, long, default_value = "example_app::demo")]
    namespace: String,

    /// autowire.toml 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 以命令行执行环境运行
    #[arg(long)]
    cli: bool,

    /// 部署模式: development / staging / production
    #[arg(short, long, default_value = "development")]
    environment: DeploymentMode,

    /// 定义缓存目录，预发布和生产环境使用
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// 清理命令的保留天数
    #[arg(long, default_value_t = 30)]
    retention_days: u32,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::for_mode(args.environment);
    logging.level = args.log_level;

    let mut builder = match &args.config {
        Some(path) => ServiceBootstrapBuilder::from_config_file(path)
            .with_context(|| format!("无法读取配置文件 {}", path.display()))?,
        None => ServiceBootstrapBuilder::new(args.namespace.clone()),
    };

    let manual = ManualDefinitions::new().with(
        <demo::PruneCommand as Named>::NAME,
        vec![Argument::literal(args.retention_days)],
    );
    builder = builder
        .with_deployment_mode(args.environment)
        .with_manual_definitions(manual)
        .with_environment_overrides()
        .with_logging(logging);

    if args.cli {
        builder = builder.with_execution_context(ExecutionContext::Cli);
    }
    if let Some(cache_dir) = &args.cache_dir {
        builder = builder.with_cache_dir(cache_dir);
    }

    let bootstrapper = builder.build().context("构建服务启动器失败")?;
    info!("启动 Lorn Autowire 示例应用");

    let definitions = bootstrapper.definitions().context("自动装配失败")?;
    println!("{}", serde_json::to_string_pretty(definitions)?);

    bootstrapper.register_services().context("注册服务失败")?;
    let container = bootstrapper.build_di_container()?;
    info!(
        "已注册 {} 个服务，容器中共有 {} 个实例",
        bootstrapper.registered_services().map_or(0, <[String]>::len),
        container.instance_count()
    );
    for class_name in container.definitions().class_names() {
        info!("定义: {}", class_name);
    }

    Ok(())
}
