//! 组件宏与服务启动器的集中集成测试
//!
//! 类型通过宏登记到全局类型注册表，再由启动器按命名空间自动装配

use di_abstractions::{Argument, ManualDefinitions};
use infrastructure_common::{AutowireError, InfrastructureError, Named};
use infrastructure_composition::{ServiceBootstrapBuilder, ServiceBootstrapper};
use std::sync::atomic::{AtomicUsize, Ordering};

static MAILER_REGISTERED: AtomicUsize = AtomicUsize::new(0);
static CACHE_CLEAR_REGISTERED: AtomicUsize = AtomicUsize::new(0);

mod shop {
    use super::{CACHE_CLEAR_REGISTERED, MAILER_REGISTERED};
    use component_macros::{autowire, component, interface};
    use infrastructure_common::{CliService, Service};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[interface]
    pub trait Transport: Send + Sync {
        fn send(&self, message: &str) -> String;
    }

    #[derive(Debug)]
    #[component(implements(Transport))]
    pub struct Smtp;

    impl Transport for Smtp {
        fn send(&self, message: &str) -> String {
            format!("smtp: {}", message)
        }
    }

    #[derive(Debug)]
    #[component]
    pub struct Logger;

    #[component(service)]
    pub struct Mailer {
        pub logger: Arc<Logger>,
        pub transport: Arc<dyn Transport>,
        pub sender: String,
    }

    #[autowire]
    impl Mailer {
        pub fn new(logger: Arc<Logger>, smtp: Arc<dyn Transport>, sender: String) -> Self {
            Self {
                logger,
                transport: smtp,
                sender,
            }
        }
    }

    impl std::fmt::Debug for Mailer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Mailer").field("sender", &self.sender).finish()
        }
    }

    impl Service for Mailer {
        fn register(&self) {
            MAILER_REGISTERED.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug)]
    #[component(cli)]
    pub struct CacheClear;

    impl CliService for CacheClear {
        fn register(&self) {
            CACHE_CLEAR_REGISTERED.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn namespace() -> String {
    format!("{}::shop", module_path!())
}

fn bootstrapper(builder: ServiceBootstrapBuilder) -> ServiceBootstrapper {
    let manual = ManualDefinitions::new().with(
        <shop::Mailer as Named>::NAME,
        vec![
            Argument::class(<shop::Logger as Named>::NAME),
            Argument::class(<shop::Smtp as Named>::NAME),
            Argument::literal("noreply@shop.test"),
        ],
    );
    builder.with_manual_definitions(manual).build().unwrap()
}

#[test]
fn test_primitive_parameter_requires_manual_definition() {
    let bootstrapper = ServiceBootstrapBuilder::new(namespace()).build().unwrap();

    let err = bootstrapper.definitions().unwrap_err();
    assert!(matches!(
        err,
        InfrastructureError::AutowireError {
            source: AutowireError::PrimitiveDependencyFound { ref parameter, .. },
            ..
        } if parameter == "sender"
    ));
}

#[test]
fn test_standard_context_registers_services() {
    let bootstrapper = bootstrapper(ServiceBootstrapBuilder::new(namespace()));

    bootstrapper.register_services().unwrap();
    bootstrapper.register_services().unwrap();
    assert_eq!(MAILER_REGISTERED.load(Ordering::SeqCst), 1);
    assert_eq!(
        bootstrapper.registered_services().unwrap(),
        [<shop::Mailer as Named>::NAME.to_string()]
    );

    let container = bootstrapper.build_di_container().unwrap();
    let mailer = container.get_typed::<shop::Mailer>(<shop::Mailer as Named>::NAME).unwrap();
    assert_eq!(mailer.sender, "noreply@shop.test");
    assert_eq!(mailer.transport.send("hi"), "smtp: hi");
    assert!(format!("{:?}", mailer.logger).contains("Logger"));
}

#[test]
fn test_cli_context_registers_cli_services() {
    let bootstrapper = bootstrapper(
        ServiceBootstrapBuilder::new(namespace())
            .with_execution_context(infrastructure_common::ExecutionContext::Cli),
    );

    bootstrapper.register_services().unwrap();
    assert_eq!(CACHE_CLEAR_REGISTERED.load(Ordering::SeqCst), 1);
    assert_eq!(
        bootstrapper.registered_services().unwrap(),
        [<shop::CacheClear as Named>::NAME.to_string()]
    );
}

#[test]
fn test_manual_definition_replaces_autowiring() {
    let bootstrapper = bootstrapper(ServiceBootstrapBuilder::new(namespace()));
    let definitions = bootstrapper.definitions().unwrap();

    assert_eq!(
        definitions.get(<shop::Mailer as Named>::NAME).unwrap().arguments().len(),
        3
    );
    assert!(definitions.get(<shop::CacheClear as Named>::NAME).unwrap().is_leaf());
    assert!(!definitions.contains(<dyn shop::Transport as Named>::NAME));
}
