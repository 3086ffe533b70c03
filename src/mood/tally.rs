use super::types::Sentiment;

/// Occurrence counts per sentiment, kept in first-seen order.
///
/// The dominant sentiment is the one with the highest count; on a tie the
/// label that was counted first wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentTally {
    counts: Vec<(Sentiment, usize)>,
}

impl SentimentTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sentiment: &Sentiment) {
        self.add_n(sentiment, 1);
    }

    pub fn add_n(&mut self, sentiment: &Sentiment, n: usize) {
        match self.counts.iter_mut().find(|(s, _)| s == sentiment) {
            Some((_, count)) => *count += n,
            None => self.counts.push((sentiment.clone(), n)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, sentiment: &Sentiment) -> usize {
        self.counts
            .iter()
            .find(|(s, _)| s == sentiment)
            .map_or(0, |(_, n)| *n)
    }

    pub fn dominant(&self) -> Option<(&Sentiment, usize)> {
        let mut best: Option<(&Sentiment, usize)> = None;
        for (sentiment, count) in &self.counts {
            if best.map_or(true, |(_, top)| *count > top) {
                best = Some((sentiment, *count));
            }
        }
        best
    }

    /// Dominant sentiment and its count, or the neutral label with 0.
    pub fn dominant_or_neutral(&self) -> (Sentiment, usize) {
        self.dominant()
            .map_or_else(|| (Sentiment::neutral(), 0), |(s, n)| (s.clone(), n))
    }

    pub fn into_counts(self) -> Vec<(Sentiment, usize)> {
        self.counts
    }
}

impl<'a> FromIterator<&'a Sentiment> for SentimentTally {
    fn from_iter<I: IntoIterator<Item = &'a Sentiment>>(iter: I) -> Self {
        let mut tally = Self::new();
        for sentiment in iter {
            tally.add(sentiment);
        }
        tally
    }
}
