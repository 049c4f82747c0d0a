use serde::Serialize;

/// One distinct answer with its vote count and the index of the trial that
/// first produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyEntry {
    pub answer: String,
    pub count: usize,
    pub first_trial: usize,
}

/// Vote counts over a fixed sequence of extracted answers. Entries keep
/// first-occurrence order, which makes the majority tie-break deterministic:
/// among equally frequent answers, the one whose first vote was cast
/// earliest wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VoteTally {
    entries: Vec<TallyEntry>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, trial: usize, answer: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.answer == answer) {
            entry.count += 1;
        } else {
            self.entries.push(TallyEntry {
                answer: answer.to_string(),
                count: 1,
                first_trial: trial,
            });
        }
    }

    /// Highest-count entry; ties resolve to the entry whose first vote came
    /// earliest in trial order. `None` only when no votes were recorded.
    pub fn majority(&self) -> Option<&TallyEntry> {
        // Entries are already in first-occurrence order, so a strict
        // comparison keeps the earliest entry on ties.
        let mut best: Option<&TallyEntry> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.count > b.count) {
                best = Some(entry);
            }
        }
        best
    }

    pub fn total_votes(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_of(answers: &[&str]) -> VoteTally {
        let mut tally = VoteTally::new();
        for (trial, answer) in answers.iter().enumerate() {
            tally.record(trial, answer);
        }
        tally
    }

    #[test]
    fn should_count_votes_per_distinct_answer() {
        let tally = tally_of(&["Answer: 25", "Answer: 25", "Answer: 24"]);

        assert_eq!(tally.total_votes(), 3);
        assert_eq!(tally.entries().len(), 2);
        assert_eq!(tally.entries()[0].count, 2);
        assert_eq!(tally.entries()[1].count, 1);
    }

    #[test]
    fn should_pick_the_most_frequent_answer() {
        let tally = tally_of(&[
            "Answer: 25",
            "Answer: 25",
            "Answer: 24",
            "Answer: 25",
            "Answer: 26",
        ]);

        let majority = tally.majority().unwrap();
        assert_eq!(majority.answer, "Answer: 25");
        assert_eq!(majority.count, 3);
    }

    #[test]
    fn should_break_ties_by_earliest_first_occurrence() {
        let tally = tally_of(&["Answer: 10", "Answer: 20", "Answer: 10", "Answer: 20"]);

        let majority = tally.majority().unwrap();
        assert_eq!(majority.answer, "Answer: 10");
        assert_eq!(majority.count, 2);
        assert_eq!(majority.first_trial, 0);
    }

    #[test]
    fn should_break_ties_regardless_of_entry_counts_order() {
        // Later answer overtakes nothing: 3-way tie resolves to trial 0.
        let tally = tally_of(&["Answer: a", "Answer: b", "Answer: c"]);
        assert_eq!(tally.majority().unwrap().answer, "Answer: a");
    }

    #[test]
    fn should_report_no_majority_for_empty_tally() {
        let tally = VoteTally::new();
        assert!(tally.is_empty());
        assert!(tally.majority().is_none());
        assert_eq!(tally.total_votes(), 0);
    }

    #[test]
    fn should_track_first_trial_per_answer() {
        let mut tally = VoteTally::new();
        tally.record(0, "Answer: 7");
        tally.record(3, "Answer: 9");
        tally.record(4, "Answer: 9");

        assert_eq!(tally.entries()[0].first_trial, 0);
        assert_eq!(tally.entries()[1].first_trial, 3);
    }
}
