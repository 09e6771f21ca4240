use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    repositories::BlockProgressRepository,
    services::completion_service::{
        ChapterCompletion, CompletionService, PageCompletion, ProgressIndex,
    },
    store::CourseTree,
};

/// Completion verdicts for one learner, backed by recorded block progress.
pub struct ProgressService {
    repository: Arc<dyn BlockProgressRepository>,
}

impl ProgressService {
    pub fn new(repository: Arc<dyn BlockProgressRepository>) -> Self {
        Self { repository }
    }

    async fn progress_index(&self, learner_id: &str, block_ids: &[String]) -> AppResult<ProgressIndex> {
        let records = self
            .repository
            .find_by_learner_and_blocks(learner_id, block_ids)
            .await?;
        Ok(records
            .into_iter()
            .map(|record| (record.block_id.clone(), record))
            .collect())
    }

    pub async fn page_completion(
        &self,
        tree: &CourseTree,
        learner_id: &str,
        page_id: &str,
    ) -> AppResult<PageCompletion> {
        if tree.page(page_id).is_none() {
            return Err(AppError::not_found("Page", page_id));
        }
        let blocks = tree.blocks(page_id);
        let block_ids: Vec<String> = blocks.iter().map(|b| b.id.clone()).collect();
        let index = self.progress_index(learner_id, &block_ids).await?;

        Ok(CompletionService::calculate_page_completion(
            blocks,
            Some(&index),
        ))
    }

    pub async fn chapter_completion(
        &self,
        tree: &CourseTree,
        learner_id: &str,
        chapter_id: &str,
    ) -> AppResult<ChapterCompletion> {
        if tree.chapter(chapter_id).is_none() {
            return Err(AppError::not_found("Chapter", chapter_id));
        }
        let pages: Vec<_> = tree.pages(chapter_id).into_iter().cloned().collect();
        let blocks: Vec<_> = pages
            .iter()
            .flat_map(|page| tree.blocks(&page.id))
            .cloned()
            .collect();
        let block_ids: Vec<String> = blocks.iter().map(|b| b.id.clone()).collect();
        let index = self.progress_index(learner_id, &block_ids).await?;

        log::debug!(
            "Checking chapter {} for learner {} against {} progress record(s)",
            chapter_id,
            learner_id,
            index.len()
        );

        Ok(CompletionService::calculate_chapter_completion(
            &pages,
            &blocks,
            Some(&index),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{BlockProgress, BlockType, ProgressStatus};
    use crate::repositories::block_progress_repository::MockBlockProgressRepository;
    use crate::test_utils::fixtures::tree_with_page;

    fn completed(learner: &str, block_id: &str) -> BlockProgress {
        let mut record = BlockProgress::new(block_id, ProgressStatus::Completed);
        record.learner_id = learner.to_string();
        record
    }

    #[tokio::test]
    async fn page_completion_uses_learner_records() {
        let (mut tree, page_id) = tree_with_page();
        let text = tree.add_block(&page_id, "Read", BlockType::Text).expect("add");
        let video = tree.add_block(&page_id, "Watch", BlockType::Video).expect("add");
        tree.add_block(&page_id, "---", BlockType::Divider).expect("add");

        let mut repo = MockBlockProgressRepository::new();
        let record = completed("ana", &text);
        repo.expect_find_by_learner_and_blocks()
            .withf(|learner, ids| learner.to_string() == "ana" && ids.len() == 3)
            .times(1)
            .returning(move |_, _| Ok(vec![record.clone()]));

        let service = ProgressService::new(Arc::new(repo));
        let completion = service
            .page_completion(&tree, "ana", &page_id)
            .await
            .expect("completion");

        assert_eq!(completion.total_blocks, 2);
        assert_eq!(completion.completed_required_blocks, 1);
        assert_eq!(completion.percent_complete, 50);
        assert!(!completion.is_complete);
        assert!(tree.block(&video).is_some());
    }

    #[tokio::test]
    async fn page_completion_for_unknown_page_is_not_found() {
        let (tree, _) = tree_with_page();
        let repo = MockBlockProgressRepository::new();

        let service = ProgressService::new(Arc::new(repo));
        let result = service.page_completion(&tree, "ana", "missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn chapter_completion_when_every_block_is_done() {
        let (mut tree, page_id) = tree_with_page();
        let text = tree.add_block(&page_id, "Read", BlockType::Text).expect("add");
        let chapter_id = tree.page(&page_id).map(|p| p.chapter_id.clone()).expect("page");

        let mut repo = MockBlockProgressRepository::new();
        let record = completed("ana", &text);
        let expected = vec![text.clone()];
        repo.expect_find_by_learner_and_blocks()
            .withf(move |learner, ids| learner.to_string() == "ana" && ids.to_vec() == expected)
            .returning(move |_, _| Ok(vec![record.clone()]));

        let service = ProgressService::new(Arc::new(repo));
        let completion = service
            .chapter_completion(&tree, "ana", &chapter_id)
            .await
            .expect("completion");

        assert!(completion.is_complete);
        assert_eq!(completion.total_pages, 1);
        assert_eq!(completion.completed_required_pages, 1);
    }
}
