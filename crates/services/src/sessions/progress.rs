/// Where a session stands, for progress bars and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    /// Questions already judged.
    pub judged: usize,
    pub score: u32,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.judged)
    }

    /// Share of questions judged, in whole percent.
    #[must_use]
    pub fn percent_judged(&self) -> u32 {
        quiz_core::model::percentage(
            u32::try_from(self.judged).unwrap_or(u32::MAX),
            u32::try_from(self.total).unwrap_or(u32::MAX),
        )
    }
}
