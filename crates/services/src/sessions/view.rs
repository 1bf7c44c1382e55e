/// Presentation-agnostic snapshot of a quiz session.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// The presentation layer decides labels such as "Finish Quiz" from
/// `QuestionView::is_last`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    Loading,
    /// "No questions available".
    Empty,
    Question(QuestionView),
    Completed(ResultView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position of the question.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub score: u32,
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub score: u32,
    pub total: usize,
    pub percentage: u32,
}
