use crate::store::sibling_collection::{Sibling, SiblingCollection};

/// Page and block the builder currently has open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub page_id: Option<String>,
    pub block_id: Option<String>,
}

/// If `selected` points at one of `removed`, move it to the first surviving sibling of
/// that entity, or clear it when none is left.
pub fn repair<T: Sibling>(
    selected: &mut Option<String>,
    removed: &[T],
    survivors: &SiblingCollection<T>,
) {
    let Some(current) = selected.as_deref() else {
        return;
    };
    let Some(gone) = removed.iter().find(|item| item.id() == current) else {
        return;
    };

    let fallback = survivors.first_child_id(gone.parent_id());
    log::debug!(
        "Selected entity {} was removed, falling back to {:?}",
        current,
        fallback
    );
    *selected = fallback;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{Page, Question, QuestionType};

    #[test]
    fn selection_moves_to_first_surviving_sibling() {
        let mut pages = SiblingCollection::default();
        let first = pages.append(Page::new("ch-1", "One", 0));
        let second = pages.append(Page::new("ch-1", "Two", 0));
        let removed = vec![pages.remove(&first).expect("page exists")];

        let mut selected = Some(first.clone());
        repair(&mut selected, &removed, &pages);

        assert_eq!(selected, Some(second));
    }

    #[test]
    fn selection_clears_when_no_sibling_survives() {
        let mut questions = SiblingCollection::default();
        let only = questions.append(Question::new("quiz-1", "Q", QuestionType::TrueFalse, 0));
        let removed = vec![questions.remove(&only).expect("question exists")];

        let mut selected = Some(only);
        repair(&mut selected, &removed, &questions);

        assert_eq!(selected, None);
    }

    #[test]
    fn unrelated_selection_is_untouched() {
        let mut pages = SiblingCollection::default();
        let keep = pages.append(Page::new("ch-1", "Keep", 0));
        let drop = pages.append(Page::new("ch-1", "Drop", 0));
        let removed = vec![pages.remove(&drop).expect("page exists")];

        let mut selected = Some(keep.clone());
        repair(&mut selected, &removed, &pages);

        assert_eq!(selected, Some(keep));
    }
}
