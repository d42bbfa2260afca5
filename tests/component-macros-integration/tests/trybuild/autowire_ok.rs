use component_macros::{autowire, component};
use infrastructure_common::{global_type_registry, Named};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
#[component]
pub struct Logger;

#[derive(Debug)]
#[component]
pub struct Report {
    logger: Arc<Logger>,
    labels: HashMap<String, String>,
}

#[autowire(constructor = "with_labels")]
impl Report {
    pub fn with_labels(
        logger: Arc<Logger>,
        labels: HashMap<String, String>,
    ) -> Result<Self, std::io::Error> {
        Ok(Self { logger, labels })
    }
}

fn main() {
    let report = global_type_registry().get(<Report as Named>::NAME).unwrap();
    assert_eq!(report.constructor_parameters().len(), 2);
    assert!(report.constructor_parameters()[1].builtin);
    assert!(format!("{:?} {:?}", Logger, report).contains("Report"));
}
