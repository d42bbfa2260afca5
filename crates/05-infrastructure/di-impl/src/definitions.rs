//! 依赖树到定义列表的转换，以及手动定义的过滤与合并

use crate::tree::DependencyTree;
use di_abstractions::{Argument, CandidateType, Definition, DefinitionList, ManualDefinitions};
use tracing::debug;

/// 定义列表转换器
#[derive(Debug)]
pub struct DefinitionListConverter;

impl DefinitionListConverter {
    /// 把依赖树转换为定义列表
    ///
    /// 没有依赖的类得到空定义，其余类按构造参数顺序得到类引用列表
    pub fn convert(tree: &DependencyTree) -> DefinitionList {
        let mut definitions = DefinitionList::new();
        for (class_name, node) in tree.iter() {
            let arguments = node.arguments().iter().map(Argument::class).collect();
            definitions.insert(class_name, Definition::new(arguments));
        }
        definitions
    }
}

/// 手动定义处理
#[derive(Debug)]
pub struct ManualOverrides;

impl ManualOverrides {
    /// 去掉已手动定义的候选类型
    pub fn filter(
        candidates: Vec<CandidateType>,
        manual: &ManualDefinitions,
    ) -> Vec<CandidateType> {
        if manual.is_empty() {
            return candidates;
        }

        let before = candidates.len();
        let filtered: Vec<CandidateType> = candidates
            .into_iter()
            .filter(|candidate| !manual.contains(&candidate.name))
            .collect();
        debug!("过滤手动定义的候选类型 {} 个", before - filtered.len());
        filtered
    }

    /// 合并手动定义，同名时手动定义优先
    pub fn merge(mut autowired: DefinitionList, manual: &ManualDefinitions) -> DefinitionList {
        autowired.merge(manual);
        autowired
    }
}
