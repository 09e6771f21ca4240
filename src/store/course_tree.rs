use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{
    Block, BlockContent, BlockType, Chapter, Course, Page, Question, QuestionType,
};
use crate::models::dto::request::{
    UpdateBlockRequest, UpdateChapterRequest, UpdateCourseRequest, UpdatePageRequest,
};
use crate::store::selection::{self, Selection};
use crate::store::sibling_collection::{Sibling, SiblingCollection};
use crate::store::StoreSettings;

/// Course → chapter → page → block hierarchy.
///
/// Every mutation keeps the derived `*_count` fields equal to the live number of
/// children and never leaves a child without its parent. `delete_*` does not renumber
/// the surviving siblings; `reorder_*` is the operation that restores `1..N`.
#[derive(Debug, Clone, Default)]
pub struct CourseTree {
    settings: StoreSettings,
    courses: Vec<Course>,
    chapters: SiblingCollection<Chapter>,
    pages: SiblingCollection<Page>,
    blocks: SiblingCollection<Block>,
    selection: Selection,
}

impl CourseTree {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Builds a tree from previously stored collections, recomputing every derived count.
    pub fn from_parts(
        settings: StoreSettings,
        courses: Vec<Course>,
        chapters: Vec<Chapter>,
        pages: Vec<Page>,
        blocks: Vec<Block>,
    ) -> Self {
        let mut tree = Self {
            settings,
            courses,
            chapters: SiblingCollection::new(chapters),
            pages: SiblingCollection::new(pages),
            blocks: SiblingCollection::new(blocks),
            selection: Selection::default(),
        };
        tree.refresh_counts();
        tree
    }

    pub fn all_courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn all_chapters(&self) -> Vec<Chapter> {
        self.chapters.to_vec()
    }

    pub fn all_pages(&self) -> Vec<Page> {
        self.pages.to_vec()
    }

    pub fn all_blocks(&self) -> Vec<Block> {
        self.blocks.to_vec()
    }

    // Courses

    pub fn create_course(&mut self, title: &str) -> String {
        let course = Course::new(title);
        let id = course.id.clone();
        self.courses.push(course);
        log::info!("Created course {}", id);
        id
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn update_course(&mut self, id: &str, request: UpdateCourseRequest) -> AppResult<()> {
        request.validate()?;

        let course = self
            .courses
            .iter_mut()
            .find(|course| course.id == id)
            .ok_or_else(|| AppError::not_found("Course", id))?;

        if let Some(title) = request.title {
            course.title = title;
        }
        if let Some(description) = request.description {
            course.description = Some(description);
        }
        course.modified_at = Some(Utc::now());
        Ok(())
    }

    pub fn delete_course(&mut self, id: &str) {
        let Some(position) = self.courses.iter().position(|course| course.id == id) else {
            log::debug!("Course {} already absent, nothing to delete", id);
            return;
        };
        for chapter_id in self.chapters.child_ids(id) {
            self.delete_chapter(&chapter_id);
        }
        self.courses.remove(position);
        log::info!("Deleted course {}", id);
    }

    // Chapters

    pub fn chapters(&self, course_id: &str) -> Vec<&Chapter> {
        self.chapters.children(course_id)
    }

    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.get(id)
    }

    pub fn add_chapter(&mut self, course_id: &str, title: &str) -> AppResult<String> {
        self.require_course(course_id)?;
        let id = self.chapters.append(Chapter::new(course_id, title, 0));
        self.sync_chapters_count(course_id);
        log::info!("Added chapter {} to course {}", id, course_id);
        Ok(id)
    }

    pub fn insert_chapter(&mut self, course_id: &str, title: &str, index: usize) -> AppResult<String> {
        self.require_course(course_id)?;
        let id = self
            .chapters
            .insert_at(Chapter::new(course_id, title, 0), index);
        self.sync_chapters_count(course_id);
        log::info!("Inserted chapter {} into course {} at {}", id, course_id, index);
        Ok(id)
    }

    pub fn update_chapter(&mut self, id: &str, request: UpdateChapterRequest) -> AppResult<()> {
        request.validate()?;

        let chapter = self
            .chapters
            .get_mut(id)
            .ok_or_else(|| AppError::not_found("Chapter", id))?;

        if let Some(title) = request.title {
            chapter.title = title;
        }
        if let Some(is_locked) = request.is_locked {
            chapter.is_locked = is_locked;
        }
        chapter.modified_at = Some(Utc::now());
        Ok(())
    }

    /// Removes the chapter with all of its pages and their blocks. Unknown ids are a no-op.
    pub fn delete_chapter(&mut self, id: &str) {
        let Some(chapter) = self.chapters.remove(id) else {
            log::debug!("Chapter {} already absent, nothing to delete", id);
            return;
        };

        let removed_pages = self.pages.remove_children(&chapter.id);
        let mut removed_blocks = Vec::new();
        for page in &removed_pages {
            removed_blocks.extend(self.blocks.remove_children(&page.id));
        }

        self.sync_chapters_count(&chapter.course_id);
        self.repair_selection(&removed_pages, &removed_blocks);
        log::info!(
            "Deleted chapter {} with {} pages and {} blocks",
            id,
            removed_pages.len(),
            removed_blocks.len()
        );
    }

    /// Renumbers the chapters of a course in the given order. Chapters missing from
    /// `ordered_ids` are deleted along with their descendants.
    pub fn reorder_chapters(&mut self, course_id: &str, ordered_ids: &[String]) -> AppResult<()> {
        self.require_course(course_id)?;
        for dropped in self.chapters.apply_order(course_id, ordered_ids) {
            self.delete_chapter(&dropped);
        }
        log::debug!("Reordered chapters of course {}", course_id);
        Ok(())
    }

    /// Copies the chapter, its pages and their blocks under fresh ids at the end of the course.
    pub fn duplicate_chapter(&mut self, id: &str) -> AppResult<String> {
        let source = self
            .chapters
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Chapter", id))?;

        let mut copy = source.clone();
        copy.id = Uuid::new_v4().to_string();
        copy.title = self.settings.copy_title(&source.title);
        copy.created_at = Some(Utc::now());
        copy.modified_at = Some(Utc::now());
        let new_id = self.chapters.append(copy);

        let pages: Vec<Page> = self.pages.children(id).into_iter().cloned().collect();
        for page in &pages {
            self.copy_page(page, &new_id, page.title.clone(), page.order);
        }

        self.sync_chapters_count(&source.course_id);
        self.sync_pages_count(&new_id);
        log::info!("Duplicated chapter {} as {}", id, new_id);
        Ok(new_id)
    }

    // Pages

    pub fn pages(&self, chapter_id: &str) -> Vec<&Page> {
        self.pages.children(chapter_id)
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.get(id)
    }

    pub fn add_page(&mut self, chapter_id: &str, title: &str) -> AppResult<String> {
        self.require_chapter(chapter_id)?;
        let id = self.pages.append(Page::new(chapter_id, title, 0));
        self.sync_pages_count(chapter_id);
        log::info!("Added page {} to chapter {}", id, chapter_id);
        Ok(id)
    }

    pub fn insert_page(&mut self, chapter_id: &str, title: &str, index: usize) -> AppResult<String> {
        self.require_chapter(chapter_id)?;
        let id = self.pages.insert_at(Page::new(chapter_id, title, 0), index);
        self.sync_pages_count(chapter_id);
        log::info!("Inserted page {} into chapter {} at {}", id, chapter_id, index);
        Ok(id)
    }

    pub fn update_page(&mut self, id: &str, request: UpdatePageRequest) -> AppResult<()> {
        request.validate()?;

        let page = self
            .pages
            .get_mut(id)
            .ok_or_else(|| AppError::not_found("Page", id))?;

        if let Some(title) = request.title {
            page.title = title;
        }
        if let Some(is_required) = request.is_required {
            page.is_required = is_required;
        }
        if let Some(is_completed) = request.is_completed {
            page.is_completed = is_completed;
        }
        if let Some(is_locked) = request.is_locked {
            page.is_locked = is_locked;
        }
        page.modified_at = Some(Utc::now());
        Ok(())
    }

    pub fn delete_page(&mut self, id: &str) {
        let Some(page) = self.pages.remove(id) else {
            log::debug!("Page {} already absent, nothing to delete", id);
            return;
        };

        let removed_blocks = self.blocks.remove_children(&page.id);
        self.sync_pages_count(&page.chapter_id);
        self.repair_selection(std::slice::from_ref(&page), &removed_blocks);
        log::info!("Deleted page {} with {} blocks", id, removed_blocks.len());
    }

    pub fn reorder_pages(&mut self, chapter_id: &str, ordered_ids: &[String]) -> AppResult<()> {
        self.require_chapter(chapter_id)?;
        for dropped in self.pages.apply_order(chapter_id, ordered_ids) {
            self.delete_page(&dropped);
        }
        log::debug!("Reordered pages of chapter {}", chapter_id);
        Ok(())
    }

    /// Copies the page and its blocks to the end of the same chapter.
    pub fn duplicate_page(&mut self, id: &str) -> AppResult<String> {
        let source = self
            .pages
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Page", id))?;

        let title = self.settings.copy_title(&source.title);
        let order = self.pages.next_order(&source.chapter_id);
        let new_id = self.copy_page(&source, &source.chapter_id, title, order);

        self.sync_pages_count(&source.chapter_id);
        log::info!("Duplicated page {} as {}", id, new_id);
        Ok(new_id)
    }

    // Blocks

    pub fn blocks(&self, page_id: &str) -> Vec<&Block> {
        self.blocks.children(page_id)
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn add_block(&mut self, page_id: &str, title: &str, block_type: BlockType) -> AppResult<String> {
        self.require_page(page_id)?;
        let block = Block::new(page_id, title, block_type, 0, self.settings.default_pass_mark);
        let id = self.blocks.append(block);
        self.sync_blocks_count(page_id);
        log::info!("Added {:?} block {} to page {}", block_type, id, page_id);
        Ok(id)
    }

    pub fn insert_block(
        &mut self,
        page_id: &str,
        title: &str,
        block_type: BlockType,
        index: usize,
    ) -> AppResult<String> {
        self.require_page(page_id)?;
        let block = Block::new(page_id, title, block_type, 0, self.settings.default_pass_mark);
        let id = self.blocks.insert_at(block, index);
        self.sync_blocks_count(page_id);
        log::info!(
            "Inserted {:?} block {} into page {} at {}",
            block_type,
            id,
            page_id,
            index
        );
        Ok(id)
    }

    /// Merges the request into the block. A content payload must keep the block's type.
    pub fn update_block(&mut self, id: &str, request: UpdateBlockRequest) -> AppResult<()> {
        request.validate()?;

        let block = self
            .blocks
            .get_mut(id)
            .ok_or_else(|| AppError::not_found("Block", id))?;

        if let Some(content) = &request.content {
            if content.block_type() != block.block_type() {
                return Err(AppError::InvalidShape(format!(
                    "block '{}' is {:?} but received {:?} content",
                    id,
                    block.block_type(),
                    content.block_type()
                )));
            }
        }

        if let Some(title) = request.title {
            block.title = title;
        }
        if let Some(is_required) = request.is_required {
            block.is_required = is_required;
        }
        if let Some(is_completed) = request.is_completed {
            block.is_completed = is_completed;
        }
        if let Some(content) = request.content {
            block.content = content;
        }
        block.modified_at = Some(Utc::now());
        Ok(())
    }

    pub fn delete_block(&mut self, id: &str) {
        let Some(block) = self.blocks.remove(id) else {
            log::debug!("Block {} already absent, nothing to delete", id);
            return;
        };

        self.sync_blocks_count(&block.page_id);
        self.repair_selection(&[], std::slice::from_ref(&block));
        log::info!("Deleted block {}", id);
    }

    pub fn reorder_blocks(&mut self, page_id: &str, ordered_ids: &[String]) -> AppResult<()> {
        self.require_page(page_id)?;
        for dropped in self.blocks.apply_order(page_id, ordered_ids) {
            self.delete_block(&dropped);
        }
        log::debug!("Reordered blocks of page {}", page_id);
        Ok(())
    }

    pub fn duplicate_block(&mut self, id: &str) -> AppResult<String> {
        let source = self
            .blocks
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Block", id))?;

        let mut copy = fresh_block_copy(&source, &source.page_id);
        copy.title = self.settings.copy_title(&source.title);
        let new_id = self.blocks.append(copy);

        self.sync_blocks_count(&source.page_id);
        log::info!("Duplicated block {} as {}", id, new_id);
        Ok(new_id)
    }

    /// Appends a question to a micro-quiz block's embedded question list.
    pub fn add_block_question(
        &mut self,
        block_id: &str,
        title: &str,
        question_type: QuestionType,
    ) -> AppResult<String> {
        if question_type.is_assessment_only() {
            return Err(AppError::ValidationError(format!(
                "{} questions are only available on assessments",
                question_type.label()
            )));
        }

        let block = self
            .blocks
            .get_mut(block_id)
            .ok_or_else(|| AppError::not_found("Block", block_id))?;
        let block_type = block.block_type();
        let BlockContent::MicroQuiz(quiz) = &mut block.content else {
            return Err(AppError::InvalidShape(format!(
                "block '{}' is {:?}, not a micro quiz",
                block_id, block_type
            )));
        };

        let order = quiz.questions.len() as u32 + 1;
        let question = Question::new(block_id, title, question_type, order);
        let id = question.id.clone();
        quiz.questions.push(question);
        block.modified_at = Some(Utc::now());
        Ok(id)
    }

    // Selection

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_page(&mut self, page_id: Option<&str>) -> AppResult<()> {
        if let Some(id) = page_id {
            self.require_page(id)?;
        }
        self.selection.page_id = page_id.map(str::to_string);
        Ok(())
    }

    pub fn select_block(&mut self, block_id: Option<&str>) -> AppResult<()> {
        if let Some(id) = block_id {
            if !self.blocks.contains(id) {
                return Err(AppError::not_found("Block", id));
            }
        }
        self.selection.block_id = block_id.map(str::to_string);
        Ok(())
    }

    // Internals

    fn copy_page(&mut self, source: &Page, chapter_id: &str, title: String, order: u32) -> String {
        let mut copy = source.clone();
        copy.id = Uuid::new_v4().to_string();
        copy.chapter_id = chapter_id.to_string();
        copy.title = title;
        copy.order = order;
        copy.created_at = Some(Utc::now());
        copy.modified_at = Some(Utc::now());
        let new_id = self.pages.push(copy);

        let blocks: Vec<Block> = self.blocks.children(&source.id).into_iter().cloned().collect();
        for block in &blocks {
            self.blocks.push(fresh_block_copy(block, &new_id));
        }
        self.sync_blocks_count(&new_id);
        new_id
    }

    fn repair_selection(&mut self, removed_pages: &[Page], removed_blocks: &[Block]) {
        selection::repair(&mut self.selection.page_id, removed_pages, &self.pages);
        selection::repair(&mut self.selection.block_id, removed_blocks, &self.blocks);
    }

    fn require_course(&self, id: &str) -> AppResult<()> {
        self.course(id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Course", id))
    }

    fn require_chapter(&self, id: &str) -> AppResult<()> {
        if self.chapters.contains(id) {
            Ok(())
        } else {
            Err(AppError::not_found("Chapter", id))
        }
    }

    fn require_page(&self, id: &str) -> AppResult<()> {
        if self.pages.contains(id) {
            Ok(())
        } else {
            Err(AppError::not_found("Page", id))
        }
    }

    fn sync_chapters_count(&mut self, course_id: &str) {
        let count = self.chapters.count(course_id);
        if let Some(course) = self.courses.iter_mut().find(|course| course.id == course_id) {
            course.chapters_count = count;
        }
    }

    fn sync_pages_count(&mut self, chapter_id: &str) {
        let count = self.pages.count(chapter_id);
        if let Some(chapter) = self.chapters.get_mut(chapter_id) {
            chapter.pages_count = count;
        }
    }

    fn sync_blocks_count(&mut self, page_id: &str) {
        let count = self.blocks.count(page_id);
        if let Some(page) = self.pages.get_mut(page_id) {
            page.blocks_count = count;
        }
    }

    fn refresh_counts(&mut self) {
        let course_ids: Vec<String> = self.courses.iter().map(|c| c.id.clone()).collect();
        let chapter_ids: Vec<String> = self.chapters.iter().map(|c| c.id().to_string()).collect();
        let page_ids: Vec<String> = self.pages.iter().map(|p| p.id().to_string()).collect();

        for id in &course_ids {
            self.sync_chapters_count(id);
        }
        for id in &chapter_ids {
            self.sync_pages_count(id);
        }
        for id in &page_ids {
            self.sync_blocks_count(id);
        }
    }
}

/// Copy of `source` under `page_id` with fresh ids, including the ids of embedded
/// micro-quiz questions, and fresh timestamps. Order and title are kept.
fn fresh_block_copy(source: &Block, page_id: &str) -> Block {
    let now = Utc::now();
    let mut copy = source.clone();
    copy.id = Uuid::new_v4().to_string();
    copy.page_id = page_id.to_string();
    copy.created_at = Some(now);
    copy.modified_at = Some(now);

    if let BlockContent::MicroQuiz(quiz) = &mut copy.content {
        for question in &mut quiz.questions {
            question.id = Uuid::new_v4().to_string();
            question.parent_id = copy.id.clone();
            question.created_at = Some(now);
            question.modified_at = Some(now);
        }
    }
    copy
}
