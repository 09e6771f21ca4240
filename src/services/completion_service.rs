use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::domain::{Block, BlockProgress, BlockType, Page};
use crate::services::grading_service::percentage;

/// Block progress records keyed by block id.
pub type ProgressIndex = HashMap<String, BlockProgress>;

/// How a block type's "done" state is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionMethod {
    Viewed,
    Answered,
    CorrectOrder,
    Submitted,
    NotCounted,
}

impl CompletionMethod {
    pub fn supports_pass_mark(&self) -> bool {
        matches!(self, CompletionMethod::Answered | CompletionMethod::CorrectOrder)
    }

    pub fn is_counted(&self) -> bool {
        !matches!(self, CompletionMethod::NotCounted)
    }
}

pub fn completion_method(block_type: BlockType) -> CompletionMethod {
    match block_type {
        BlockType::Text | BlockType::Video | BlockType::Image | BlockType::Resource => {
            CompletionMethod::Viewed
        }
        BlockType::MicroQuiz => CompletionMethod::Answered,
        BlockType::DragDropReorder => CompletionMethod::CorrectOrder,
        BlockType::Whiteboard | BlockType::Reflection => CompletionMethod::Submitted,
        BlockType::Divider | BlockType::QaThread => CompletionMethod::NotCounted,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCompletion {
    pub total_blocks: u32,
    pub required_blocks: u32,
    pub completed_required_blocks: u32,
    pub percent_complete: u8,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChapterCompletion {
    pub total_pages: u32,
    pub required_pages: u32,
    pub completed_required_pages: u32,
    pub is_complete: bool,
}

pub struct CompletionService;

impl CompletionService {
    /// A recorded status wins over the block's own builder-time flag.
    pub fn is_block_complete(block: &Block, progress: Option<&BlockProgress>) -> bool {
        if !completion_method(block.block_type()).is_counted() {
            return true;
        }
        match progress {
            Some(record) => record.is_completed(),
            None => block.is_completed,
        }
    }

    /// Aggregates one page's blocks. Blocks whose type is not counted are left out entirely.
    pub fn calculate_page_completion<'a, I>(blocks: I, progress: Option<&ProgressIndex>) -> PageCompletion
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let counted: Vec<&Block> = blocks
            .into_iter()
            .filter(|block| completion_method(block.block_type()).is_counted())
            .collect();

        let required: Vec<&Block> = counted.iter().copied().filter(|b| b.is_required).collect();
        let completed_required = required
            .iter()
            .filter(|block| {
                let record = progress.and_then(|index| index.get(&block.id));
                Self::is_block_complete(block, record)
            })
            .count();

        let is_complete = completed_required == required.len();
        PageCompletion {
            total_blocks: counted.len() as u32,
            required_blocks: required.len() as u32,
            completed_required_blocks: completed_required as u32,
            percent_complete: if required.is_empty() {
                100
            } else {
                percentage(completed_required, required.len())
            },
            is_complete,
        }
    }

    /// A chapter is complete once every required page is. `blocks` may hold blocks of
    /// other pages; each page only looks at its own.
    pub fn calculate_chapter_completion(
        pages: &[Page],
        blocks: &[Block],
        progress: Option<&ProgressIndex>,
    ) -> ChapterCompletion {
        let required: Vec<&Page> = pages.iter().filter(|page| page.is_required).collect();
        let completed_required = required
            .iter()
            .filter(|page| {
                let page_blocks = blocks.iter().filter(|block| block.page_id == page.id);
                Self::calculate_page_completion(page_blocks, progress).is_complete
            })
            .count();

        ChapterCompletion {
            total_pages: pages.len() as u32,
            required_pages: required.len() as u32,
            completed_required_pages: completed_required as u32,
            is_complete: completed_required == required.len(),
        }
    }
}
