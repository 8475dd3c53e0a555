/// Final tally shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    total: usize,
    score: usize,
    answered: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Outstanding,
    Good,
    KeepStudying,
}

impl Verdict {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Outstanding => "Outstanding! You're a pro! 🌟",
            Verdict::Good => "Good job! Keep practicing. 👍",
            Verdict::KeepStudying => "Keep studying, you'll get there! 📚",
        }
    }
}

impl QuizSummary {
    #[must_use]
    pub fn new(total: usize, score: usize, answered: usize) -> Self {
        Self {
            total,
            score: score.min(total),
            answered: answered.min(total),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.answered
    }

    /// Rounded percentage; an empty quiz scores 0.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.score as f64 / self.total as f64 * 100.0).round();
        pct as u32
    }

    /// Graded on the exact ratio; the rounded percentage is display only.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        let scaled = self.score.saturating_mul(100);
        if self.total > 0 && scaled >= self.total.saturating_mul(80) {
            Verdict::Outstanding
        } else if self.total > 0 && scaled >= self.total.saturating_mul(50) {
            Verdict::Good
        } else {
            Verdict::KeepStudying
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_thresholds() {
        assert_eq!(QuizSummary::new(10, 8, 10).verdict(), Verdict::Outstanding);
        assert_eq!(QuizSummary::new(10, 5, 10).verdict(), Verdict::Good);
        assert_eq!(QuizSummary::new(10, 4, 10).verdict(), Verdict::KeepStudying);
    }

    #[test]
    fn verdict_ignores_rounding() {
        let nearly = QuizSummary::new(44, 35, 44);
        assert_eq!(nearly.percentage(), 80);
        assert_eq!(nearly.verdict(), Verdict::Good);

        let almost_half = QuizSummary::new(200, 99, 200);
        assert_eq!(almost_half.percentage(), 50);
        assert_eq!(almost_half.verdict(), Verdict::KeepStudying);

        assert_eq!(QuizSummary::new(5, 4, 5).verdict(), Verdict::Outstanding);
        assert_eq!(QuizSummary::new(0, 0, 0).verdict(), Verdict::KeepStudying);
    }

    #[test]
    fn percentage_rounds() {
        assert_eq!(QuizSummary::new(3, 2, 3).percentage(), 67);
        assert_eq!(QuizSummary::new(0, 0, 0).percentage(), 0);
    }
}
