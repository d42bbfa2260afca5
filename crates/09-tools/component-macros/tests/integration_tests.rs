//! 组件宏集成测试

use component_macros::{autowire, component, interface};
use infrastructure_common::{
    global_type_registry, Arguments, ConstructorParameter, DependencyError, Named,
    ResolvedArgument, Service, TypeKind, SERVICE_INTERFACE,
};
use std::sync::Arc;

/// 测试接口
#[interface]
pub trait Transport: Send + Sync {
    fn send(&self, message: &str) -> String;
}

#[interface(extends(Transport), name = "macros::SecureTransport")]
pub trait SecureTransport: Transport {}

#[derive(Debug)]
#[component(implements(Transport, SecureTransport))]
pub struct SmtpTransport;

impl Transport for SmtpTransport {
    fn send(&self, message: &str) -> String {
        format!("smtp: {}", message)
    }
}

impl SecureTransport for SmtpTransport {}

#[derive(Debug)]
#[component]
pub struct Logger;

/// 测试服务
#[component(service)]
pub struct Mailer {
    logger: Arc<Logger>,
    transport: Arc<dyn Transport>,
    retries: u32,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer").field("retries", &self.retries).finish()
    }
}

#[autowire]
impl Mailer {
    pub fn new(logger: Arc<Logger>, transport: Arc<dyn Transport>, retries: u32) -> Self {
        Self {
            logger,
            transport,
            retries,
        }
    }
}

impl Service for Mailer {
    fn register(&self) {}
}

#[derive(Debug, Default)]
#[component(default, name = "macros::Settings")]
pub struct Settings {
    pub verbose: bool,
}

#[derive(Debug)]
#[component]
pub struct Report {
    total: i64,
}

#[derive(Debug)]
pub struct NegativeTotal;

impl std::fmt::Display for NegativeTotal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "total must not be negative")
    }
}

impl std::error::Error for NegativeTotal {}

#[autowire(constructor = "try_new")]
impl Report {
    pub fn try_new(total: i64) -> Result<Self, NegativeTotal> {
        if total < 0 {
            return Err(NegativeTotal);
        }
        Ok(Self { total })
    }
}

fn instance_of<T: Named + Send + Sync + 'static>(instance: Arc<T>) -> ResolvedArgument {
    let descriptor = global_type_registry().get(T::NAME).unwrap();
    ResolvedArgument::Instance {
        class_name: T::NAME.to_string(),
        instance,
        interfaces: descriptor.interfaces,
    }
}

#[test]
fn test_default_names_follow_module_path() {
    assert_eq!(<Logger as Named>::NAME, concat!(module_path!(), "::Logger"));
    assert_eq!(<dyn Transport as Named>::NAME, concat!(module_path!(), "::Transport"));
    assert_eq!(<dyn SecureTransport as Named>::NAME, "macros::SecureTransport");
    assert_eq!(<Settings as Named>::NAME, "macros::Settings");
}

#[test]
fn test_interfaces_are_registered() {
    let transport = global_type_registry().get(<dyn Transport as Named>::NAME).unwrap();
    assert_eq!(transport.kind, TypeKind::Interface);

    let secure = global_type_registry().get("macros::SecureTransport").unwrap();
    assert!(secure.is_interface());
    assert!(secure
        .interface_names()
        .any(|name| name == <dyn Transport as Named>::NAME));
}

#[test]
fn test_component_descriptor() {
    let smtp = global_type_registry().get(<SmtpTransport as Named>::NAME).unwrap();
    assert!(smtp.is_concrete());
    assert!(smtp.cast_for(<dyn Transport as Named>::NAME).is_some());
    assert!(smtp.cast_for("macros::SecureTransport").is_some());
    assert!(smtp.factory.is_some());
    assert!(smtp.constructor.is_none());
    assert!(smtp.source.as_deref().unwrap().contains("integration_tests.rs"));
}

#[test]
fn test_autowired_constructor_signature() {
    let mailer = global_type_registry().get(<Mailer as Named>::NAME).unwrap();
    assert!(mailer.interface_names().any(|name| name == SERVICE_INTERFACE));
    assert_eq!(
        mailer.constructor_parameters(),
        [
            ConstructorParameter::typed("logger", <Logger as Named>::NAME),
            ConstructorParameter::typed("transport", <dyn Transport as Named>::NAME),
            ConstructorParameter::builtin("retries", "u32"),
        ]
    );
}

#[test]
fn test_generated_factory_builds_instance() {
    let factory = global_type_registry()
        .get(<Mailer as Named>::NAME)
        .unwrap()
        .factory
        .unwrap();
    let mut arguments = Arguments::new(
        <Mailer as Named>::NAME,
        vec![
            instance_of(Arc::new(Logger)),
            instance_of(Arc::new(SmtpTransport)),
            ResolvedArgument::Literal(serde_json::json!(3)),
        ],
    );

    let instance = factory(&mut arguments).unwrap();
    let mailer = instance.downcast::<Mailer>().unwrap();
    assert_eq!(mailer.retries, 3);
    assert_eq!(mailer.transport.send("hi"), "smtp: hi");
    assert!(format!("{:?}", mailer.logger).contains("Logger"));
}

#[test]
fn test_default_factory_and_fallible_constructor() {
    let settings = global_type_registry().get("macros::Settings").unwrap();
    let mut arguments = Arguments::new("macros::Settings", vec![]);
    let instance = (settings.factory.unwrap())(&mut arguments).unwrap();
    assert!(!instance.downcast::<Settings>().unwrap().verbose);

    let report = global_type_registry().get(<Report as Named>::NAME).unwrap();
    assert_eq!(
        report.constructor_parameters(),
        [ConstructorParameter::builtin("total", "i64")]
    );
    let factory = report.factory.unwrap();

    let ok = factory(&mut Arguments::new(
        <Report as Named>::NAME,
        vec![ResolvedArgument::Literal(serde_json::json!(5))],
    ))
    .unwrap();
    assert_eq!(ok.downcast::<Report>().unwrap().total, 5);

    let err = factory(&mut Arguments::new(
        <Report as Named>::NAME,
        vec![ResolvedArgument::Literal(serde_json::json!(-1))],
    ))
    .unwrap_err();
    assert!(matches!(err, DependencyError::ComponentCreationFailed { .. }));
}
