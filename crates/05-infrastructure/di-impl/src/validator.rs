//! 候选类型校验

use di_abstractions::{CandidateType, SharedReflector};
use indexmap::IndexMap;
use infrastructure_common::{AutowireError, TypeDescriptor};
use tracing::{debug, warn};

/// 候选类型校验器
///
/// 通过反射器确认每个候选名称都能解析为已注册类型
pub struct ClassValidator {
    reflector: SharedReflector,
}

impl ClassValidator {
    pub fn new(reflector: SharedReflector) -> Self {
        Self { reflector }
    }

    /// 校验候选类型并返回 名称 => 描述 的映射
    ///
    /// `skip_invalid` 为 `false` 时，第一个无法解析的名称立即返回
    /// [`AutowireError::NonPsr4CompliantClass`]；为 `true` 时静默跳过。
    pub fn validate_and_build_classes(
        &self,
        candidates: &[CandidateType],
        skip_invalid: bool,
    ) -> Result<IndexMap<String, TypeDescriptor>, AutowireError> {
        let mut classes = IndexMap::with_capacity(candidates.len());

        for candidate in candidates {
            match self.reflector.reflect(&candidate.name) {
                Some(descriptor) => {
                    classes.insert(candidate.name.clone(), descriptor);
                }
                None if skip_invalid => {
                    debug!("跳过无法解析的候选类型: {}", candidate.name);
                }
                None => {
                    warn!(
                        "候选类型 {} 无法解析，来源: {:?}",
                        candidate.name, candidate.source
                    );
                    return Err(AutowireError::NonPsr4CompliantClass {
                        class_name: candidate.name.clone(),
                    });
                }
            }
        }

        debug!("校验完成，{} 个候选类型中 {} 个有效", candidates.len(), classes.len());
        Ok(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::TypeRegistry;
    use std::sync::Arc;

    fn validator() -> ClassValidator {
        let registry = TypeRegistry::new();
        registry.register(TypeDescriptor::concrete("app::Logger"));
        registry.register(TypeDescriptor::interface("app::Transport"));
        ClassValidator::new(Arc::new(registry))
    }

    fn candidates(names: &[&str]) -> Vec<CandidateType> {
        names.iter().map(|name| CandidateType::new(*name)).collect()
    }

    #[test]
    fn test_valid_candidates_keep_order() {
        let classes = validator()
            .validate_and_build_classes(&candidates(&["app::Transport", "app::Logger"]), false)
            .unwrap();

        let names: Vec<&String> = classes.keys().collect();
        assert_eq!(names, vec!["app::Transport", "app::Logger"]);
        assert!(classes["app::Transport"].is_interface());
    }

    #[test]
    fn test_unresolvable_candidate_fails() {
        let err = validator()
            .validate_and_build_classes(&candidates(&["app::Logger", "app::mail::Mailer"]), false)
            .unwrap_err();

        assert!(matches!(
            err,
            AutowireError::NonPsr4CompliantClass { ref class_name } if class_name == "app::mail::Mailer"
        ));
    }

    #[test]
    fn test_skip_invalid() {
        let classes = validator()
            .validate_and_build_classes(&candidates(&["app::Logger", "app::mail::Mailer"]), true)
            .unwrap();

        assert_eq!(classes.len(), 1);
        assert!(classes.contains_key("app::Logger"));
    }
}
