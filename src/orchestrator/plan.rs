use crate::extractor::PAGE_SIZE;

/// One scheduled (question, page-range) extraction task, bound to exactly
/// one agent session for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub question: String,
    pub start_offset: u32,
    pub page_count: u32,
}

impl WorkUnit {
    /// Page *i* of the unit is extracted at `start_offset + i * PAGE_SIZE`.
    pub fn offsets(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.page_count).map(move |i| self.start_offset + i * PAGE_SIZE)
    }
}

/// One single-page unit per (question, page index) pair, question-major in
/// input order.
pub fn plan_fully_parallel(questions: &[String], max_pages: u32) -> Vec<WorkUnit> {
    questions
        .iter()
        .flat_map(|question| {
            (0..max_pages).map(move |page_index| WorkUnit {
                question: question.clone(),
                start_offset: page_index * PAGE_SIZE,
                page_count: 1,
            })
        })
        .collect()
}

/// One unit per question spanning all of its pages, in input order.
pub fn plan_hybrid(questions: &[String], max_pages: u32) -> Vec<WorkUnit> {
    questions
        .iter()
        .map(|question| WorkUnit {
            question: question.clone(),
            start_offset: 0,
            page_count: max_pages,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fully_parallel_plan_is_question_major() {
        let units = plan_fully_parallel(&questions(&["a", "b"]), 3);
        assert_eq!(units.len(), 6);

        let expected: Vec<(&str, u32)> = vec![
            ("a", 0),
            ("a", 10),
            ("a", 20),
            ("b", 0),
            ("b", 10),
            ("b", 20),
        ];
        for (unit, (question, offset)) in units.iter().zip(expected) {
            assert_eq!(unit.question, question);
            assert_eq!(unit.start_offset, offset);
            assert_eq!(unit.page_count, 1);
        }
    }

    #[test]
    fn hybrid_plan_spans_all_pages_per_question() {
        let units = plan_hybrid(&questions(&["a", "b"]), 3);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].question, "a");
        assert_eq!(
            units[0].offsets().collect::<Vec<_>>(),
            vec![0, 10, 20]
        );
        assert_eq!(units[1].question, "b");
    }

    #[test]
    fn unit_offsets_step_by_page_size() {
        let unit = WorkUnit {
            question: "q".to_string(),
            start_offset: 30,
            page_count: 2,
        };
        assert_eq!(unit.offsets().collect::<Vec<_>>(), vec![30, 40]);
    }
}
