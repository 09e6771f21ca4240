#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::quiz_question::ChoiceOption;
    use crate::models::domain::{
        Block, BlockType, Page, Question, QuestionContent, QuestionType,
    };
    use crate::store::{CourseTree, StoreSettings};

    /// A tree holding one empty course; returns the course id.
    pub fn tree_with_course() -> (CourseTree, String) {
        let mut tree = CourseTree::new(StoreSettings::default());
        let course_id = tree.create_course("Test Course");
        (tree, course_id)
    }

    /// A tree holding course > chapter > page; returns the page id.
    pub fn tree_with_page() -> (CourseTree, String) {
        let (mut tree, course_id) = tree_with_course();
        let chapter_id = tree
            .add_chapter(&course_id, "Test Chapter")
            .expect("fixture chapter");
        let page_id = tree.add_page(&chapter_id, "Test Page").expect("fixture page");
        (tree, page_id)
    }

    /// A detached block with a fixed id.
    pub fn block(id: &str, block_type: BlockType, is_required: bool, is_completed: bool) -> Block {
        let mut block = Block::new("page-1", id, block_type, 1, 70);
        block.id = id.to_string();
        block.is_required = is_required;
        block.is_completed = is_completed;
        block
    }

    /// A detached page with a fixed id.
    pub fn page(id: &str, is_required: bool) -> Page {
        let mut page = Page::new("chapter-1", id, 1);
        page.id = id.to_string();
        page.is_required = is_required;
        page
    }

    fn question(id: &str, content: QuestionContent) -> Question {
        let mut question = Question::new("quiz-1", id, content.question_type(), 1);
        question.id = id.to_string();
        question.content = content;
        question
    }

    fn options(count: usize, correct: &[usize]) -> Vec<ChoiceOption> {
        (0..count)
            .map(|i| ChoiceOption::new(&format!("Option {}", i + 1), correct.contains(&i)))
            .collect()
    }

    /// Four options, one correct.
    pub fn single_choice(id: &str, correct_index: usize) -> Question {
        question(
            id,
            QuestionContent::SingleChoice {
                options: options(4, &[correct_index]),
            },
        )
    }

    /// Four options, `correct` marks the right ones.
    pub fn multi_select(id: &str, correct: &[usize]) -> Question {
        question(
            id,
            QuestionContent::MultiSelect {
                options: options(4, correct),
            },
        )
    }

    pub fn true_false(id: &str, correct_answer: bool) -> Question {
        question(id, QuestionContent::TrueFalse { correct_answer })
    }

    pub fn short_answer(id: &str, accepted: &[&str], case_sensitive: bool) -> Question {
        question(
            id,
            QuestionContent::ShortAnswer {
                accepted_answers: accepted.iter().map(|a| a.to_string()).collect(),
                case_sensitive,
            },
        )
    }

    #[test]
    fn question_fixtures_keep_their_ids_and_types() {
        assert_eq!(single_choice("a", 0).id, "a");
        assert_eq!(multi_select("b", &[1]).question_type(), QuestionType::MultiSelect);
        assert_eq!(true_false("c", true).question_type(), QuestionType::TrueFalse);
        assert_eq!(
            short_answer("d", &["x"], false).question_type(),
            QuestionType::ShortAnswer
        );
    }

    #[test]
    fn tree_with_page_links_the_hierarchy() {
        let (tree, page_id) = tree_with_page();
        let page = tree.page(&page_id).expect("page");
        let chapter = tree.chapter(&page.chapter_id).expect("chapter");

        assert_eq!(tree.course(&chapter.course_id).map(|c| c.chapters_count), Some(1));
        assert_eq!(chapter.pages_count, 1);
    }
}
