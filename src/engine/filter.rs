use crate::store::schema::{ProgressMap, Verb, VerbStats, VerbStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Learned,
    NotLearned,
}

impl StatusFilter {
    /// Display order of the filter bar.
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Learned,
        StatusFilter::NotLearned,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All Verbs",
            StatusFilter::Pending => "Not Reviewed",
            StatusFilter::Learned => "Learned",
            StatusFilter::NotLearned => "Need Practice",
        }
    }

    pub fn matches(self, status: VerbStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == VerbStatus::Pending,
            StatusFilter::Learned => status == VerbStatus::Learned,
            StatusFilter::NotLearned => status == VerbStatus::NotLearned,
        }
    }

    /// How many verbs this filter shows, given the pair's stats.
    pub fn count(self, stats: &VerbStats, total: usize) -> usize {
        match self {
            StatusFilter::All => total,
            StatusFilter::Pending => stats.pending,
            StatusFilter::Learned => stats.learned,
            StatusFilter::NotLearned => stats.not_learned,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Verbs of `catalog` whose status under `code` passes `mode`, in catalog order.
pub fn filter<'a>(
    catalog: &'a [Verb],
    progress: &ProgressMap,
    code: &str,
    mode: StatusFilter,
) -> Vec<&'a Verb> {
    catalog
        .iter()
        .filter(|verb| mode.matches(progress.status(code, verb.id)))
        .collect()
}
