//! Program → topic → block grouping derived from the flat question list.

use std::sync::Arc;

use indexmap::IndexMap;

use super::question::Question;

/// The only program the question bank currently describes.
pub const DEFAULT_PROGRAM_ID: &str = "prog2";
pub const DEFAULT_PROGRAM_NAME: &str = "Программа 2";

/// Third level: the unit a quiz is taken against.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub questions: Vec<Arc<Question>>,
}

/// Second level: a topic and its blocks, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub name: String,
    pub blocks: IndexMap<String, Block>,
}

impl Topic {
    pub fn question_count(&self) -> usize {
        self.blocks.values().map(|b| b.questions.len()).sum()
    }
}

/// Programs with their topics. Every map preserves insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hierarchy {
    pub programs: IndexMap<String, String>,
    pub structure: IndexMap<String, IndexMap<String, Topic>>,
}

impl Hierarchy {
    pub fn topics(&self, program_id: &str) -> Option<&IndexMap<String, Topic>> {
        self.structure.get(program_id)
    }

    pub fn topic(&self, program_id: &str, topic_id: &str) -> Option<&Topic> {
        self.topics(program_id)?.get(topic_id)
    }

    pub fn block(&self, program_id: &str, topic_id: &str, block_id: &str) -> Option<&Block> {
        self.topic(program_id, topic_id)?.blocks.get(block_id)
    }
}

/// Group questions by topic and block in one pass.
pub fn build_hierarchy(questions: &[Arc<Question>]) -> Hierarchy {
    let mut programs = IndexMap::new();
    programs.insert(
        DEFAULT_PROGRAM_ID.to_string(),
        DEFAULT_PROGRAM_NAME.to_string(),
    );

    let mut structure: IndexMap<String, IndexMap<String, Topic>> = IndexMap::new();

    for question in questions {
        let topics = structure.entry(DEFAULT_PROGRAM_ID.to_string()).or_default();
        let topic = topics
            .entry(question.theme_id.clone())
            .or_insert_with(|| Topic {
                name: question.theme_name.clone(),
                blocks: IndexMap::new(),
            });
        let block = topic
            .blocks
            .entry(question.block_id().to_string())
            .or_insert_with(|| Block {
                name: question.block_name().to_string(),
                questions: Vec::new(),
            });
        block.questions.push(Arc::clone(question));
    }

    Hierarchy {
        programs,
        structure,
    }
}

/// A hierarchy remembered together with the question-list version it came from.
#[derive(Debug, Default)]
pub struct HierarchyCache {
    version: Option<u64>,
    hierarchy: Hierarchy,
}

impl HierarchyCache {
    /// Return the hierarchy for `version`, rebuilding it only if the version changed.
    pub fn get(&mut self, version: u64, questions: &[Arc<Question>]) -> &Hierarchy {
        if self.version != Some(version) {
            tracing::debug!(version, count = questions.len(), "rebuilding question hierarchy");
            self.hierarchy = build_hierarchy(questions);
            self.version = Some(version);
        }
        &self.hierarchy
    }

    pub fn current(&self) -> &Hierarchy {
        &self.hierarchy
    }
}
