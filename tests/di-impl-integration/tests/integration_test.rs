//! 匹配策略与容器的集中集成测试
//!
//! 通过注册表扫描跑完整条流水线，覆盖接口实现的各种匹配结果

use di_abstractions::{Argument, ContainerBuilder, ManualDefinitions, ServiceContainer};
use di_impl::{Autowiring, DefinitionCache, DiContainerBuilder};
use infrastructure_common::{
    AutowireError, AutowireOptions, CastFn, ConstructorParameter, DeploymentMode, Instance, Named,
    TypeDescriptor, TypeRegistry,
};
use rstest::rstest;
use std::any::Any;
use std::sync::Arc;
use tempfile::TempDir;

trait Gateway: Send + Sync {
    fn charge(&self, cents: u64) -> String;
}

impl Named for dyn Gateway {
    const NAME: &'static str = "pay::Gateway";
}

struct Stripe;

impl Gateway for Stripe {
    fn charge(&self, cents: u64) -> String {
        format!("stripe charged {}", cents)
    }
}

struct Checkout {
    gateway: Arc<dyn Gateway>,
}

fn cast_stripe(instance: Instance) -> Option<Box<dyn Any>> {
    let stripe = instance.downcast::<Stripe>().ok()?;
    let gateway: Arc<dyn Gateway> = stripe;
    Some(Box::new(gateway))
}

/// `pay::Stripe` 与 `pay::legacy::Stripe` 同名且都实现 `pay::Gateway`
fn pay_registry() -> Arc<TypeRegistry> {
    let registry = TypeRegistry::new();
    registry.register(TypeDescriptor::interface("pay::Gateway"));
    registry.register(
        TypeDescriptor::interface("pay::Refundable").implements("pay::Gateway"),
    );
    registry.register(
        TypeDescriptor::concrete("pay::Stripe")
            .implements_with("pay::Gateway", cast_stripe as CastFn)
            .with_factory(|_| Ok(Arc::new(Stripe) as Instance)),
    );
    registry.register(TypeDescriptor::concrete("pay::legacy::Stripe").implements("pay::Gateway"));
    registry.register(TypeDescriptor::concrete("pay::Paypal").implements("pay::Refundable"));
    registry.register(TypeDescriptor::concrete("pay::SmsGateway").implements("pay::Gateway"));
    registry.register(
        TypeDescriptor::concrete("pay::Checkout")
            .service()
            .with_constructor(vec![ConstructorParameter::typed("stripe", "pay::Gateway")])
            .with_factory(|arguments| {
                let gateway = arguments.interface::<dyn Gateway>("stripe")?;
                Ok(Arc::new(Checkout { gateway }) as Instance)
            }),
    );
    Arc::new(registry)
}

fn with_service(
    registry: Arc<TypeRegistry>,
    class_name: &str,
    parameter: &str,
) -> Arc<TypeRegistry> {
    registry.register(
        TypeDescriptor::concrete(class_name)
            .service()
            .with_constructor(vec![ConstructorParameter::typed(parameter, "pay::Gateway")]),
    );
    registry
}

#[test]
fn test_same_named_implementations_are_ambiguous() {
    let err = Autowiring::builder("pay", pay_registry())
        .build()
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        AutowireError::AmbiguousImplementationMatch { ref dependent, ref class_name, .. }
            if dependent == "pay::Checkout" && class_name == "Stripe"
    ));
}

#[rstest]
#[case::interface_binding(false)]
#[case::parameter_binding(true)]
fn test_binding_resolves_ambiguity(#[case] per_parameter: bool) {
    let builder = Autowiring::builder("pay", pay_registry());
    let builder = if per_parameter {
        builder.bind_parameter("pay::Gateway", "stripe", "pay::Stripe")
    } else {
        builder.bind("pay::Gateway", "pay::Stripe")
    };
    let autowiring = builder.build();

    let definitions = autowiring.build().unwrap();
    assert_eq!(
        definitions.get("pay::Checkout").unwrap().arguments(),
        [Argument::class("pay::Stripe")]
    );
    assert!(definitions.get("pay::Stripe").unwrap().is_leaf());
}

#[test]
fn test_inherited_interface_satisfies_parent() {
    let registry = with_service(pay_registry(), "pay::Invoice", "paypal");
    let autowiring = Autowiring::builder("pay", registry)
        .bind("pay::Gateway", "pay::Stripe")
        .bind_parameter("pay::Gateway", "paypal", "pay::Paypal")
        .build();

    let definitions = autowiring.build().unwrap();
    assert_eq!(
        definitions.get("pay::Invoice").unwrap().arguments(),
        [Argument::class("pay::Paypal")]
    );
}

#[test]
fn test_snake_case_parameter_keys() {
    let registry = with_service(pay_registry(), "pay::Reminder", "sms_gateway");
    let mut options = AutowireOptions::new("pay");
    options.snake_case_parameter_keys = true;

    let autowiring = Autowiring::builder("pay", registry)
        .with_options(options)
        .bind_parameter("pay::Gateway", "stripe", "pay::Stripe")
        .build();

    let definitions = autowiring.build().unwrap();
    assert_eq!(
        definitions.get("pay::Reminder").unwrap().arguments(),
        [Argument::class("pay::SmsGateway")]
    );
}

#[test]
fn test_disabled_heuristic_requires_bindings() {
    let options = AutowireOptions::new("pay").with_name_heuristic(false);
    let err = Autowiring::builder("pay", pay_registry())
        .with_options(options)
        .build()
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        AutowireError::MissingImplementationMatch { ref parameter, ref interface_name, .. }
            if parameter == "stripe" && interface_name == "pay::Gateway"
    ));
}

#[test]
fn test_manual_definition_skips_matching() {
    let manual =
        ManualDefinitions::new().with("pay::Checkout", vec![Argument::class("pay::Stripe")]);
    let autowiring = Autowiring::builder("pay", pay_registry())
        .with_manual_definitions(manual)
        .build();

    let definitions = autowiring.build().unwrap();
    assert_eq!(
        definitions.get("pay::Checkout").unwrap().arguments(),
        [Argument::class("pay::Stripe")]
    );
}

#[test]
fn test_cached_definitions_feed_container() {
    let cache_dir = TempDir::new().unwrap();
    let options = AutowireOptions::new("pay").with_deployment_mode(DeploymentMode::Production);
    let cache = DefinitionCache::new(cache_dir.path(), &options);
    let registry = pay_registry();

    let autowiring = Autowiring::builder("pay", registry.clone())
        .bind("pay::Gateway", "pay::Stripe")
        .build();
    let built = cache
        .load_or_build(|| autowiring.build().cloned())
        .unwrap();
    let loaded = cache.load().unwrap().unwrap();
    assert_eq!(built, loaded);

    let container = DiContainerBuilder::new(registry)
        .add_definitions(loaded)
        .build()
        .unwrap();
    let checkout = container.get_typed::<Checkout>("pay::Checkout").unwrap();
    assert_eq!(checkout.gateway.charge(250), "stripe charged 250");
    assert!(container.has("pay::Stripe"));
    assert_eq!(container.instance_count(), 2);
}
