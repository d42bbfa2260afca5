use component_macros::{component, interface};
use infrastructure_common::{global_type_registry, CliService, Named, Service};

#[interface]
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug)]
#[component(service, cli, implements(Clock))]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        0
    }
}

impl Service for SystemClock {
    fn register(&self) {}
}

impl CliService for SystemClock {
    fn register(&self) {}
}

#[derive(Debug, Default)]
#[component(default, name = "app::Settings")]
pub struct Settings {
    pub verbose: bool,
}

fn main() {
    let clock = global_type_registry().get(<SystemClock as Named>::NAME).unwrap();
    assert_eq!(clock.interfaces.len(), 3);
    assert!(global_type_registry().contains(<dyn Clock as Named>::NAME));
    assert!(global_type_registry().get("app::Settings").unwrap().factory.is_some());
}
