//! Trending categories: how often each category occurs in a snapshot of posts,
//! ranked by that count.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::post::Post;

pub const DEFAULT_TRENDING_LIMIT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Ranks categories by the number of posts carrying them.
///
/// Categories are compared as exact, case-sensitive strings; an empty
/// category is a key like any other. Equal counts keep the order in which
/// the categories first appear in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRanker {
    limit: usize,
}

impl Default for CategoryRanker {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TRENDING_LIMIT as usize,
        }
    }
}

impl CategoryRanker {
    pub fn new(limit: i64) -> Result<Self, DomainError> {
        let limit = usize::try_from(limit).map_err(|_| {
            DomainError::InvalidArgument(format!("limit must be non-negative, got {limit}"))
        })?;
        Ok(Self { limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn rank(&self, posts: &[Post]) -> Vec<CategoryCount> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<CategoryCount> = Vec::new();

        for post in posts {
            match slots.get(post.category.as_str()) {
                Some(&slot) => counts[slot].count += 1,
                None => {
                    slots.insert(post.category.as_str(), counts.len());
                    counts.push(CategoryCount {
                        category: post.category.clone(),
                        count: 1,
                    });
                }
            }
        }

        // stable: ties stay in first-seen order
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(self.limit);
        counts
    }

    pub fn is_trending(&self, posts: &[Post], category: &str) -> bool {
        self.rank(posts).iter().any(|entry| entry.category == category)
    }
}

/// Top `limit` categories of `posts`; fails when `limit` is negative.
pub fn rank(posts: &[Post], limit: i64) -> Result<Vec<CategoryCount>, DomainError> {
    Ok(CategoryRanker::new(limit)?.rank(posts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn post(category: &str) -> Post {
        Post::new(
            Uuid::new_v4(),
            "title".into(),
            category.into(),
            "body".into(),
            String::new(),
            Utc::now(),
        )
        .unwrap()
    }

    fn posts(category: &str, n: usize) -> Vec<Post> {
        (0..n).map(|_| post(category)).collect()
    }

    fn entry(category: &str, count: u64) -> CategoryCount {
        CategoryCount {
            category: category.into(),
            count,
        }
    }

    /// 50 posts over category1..category10 with uneven counts.
    fn ten_categories() -> Vec<Post> {
        let counts = [9, 8, 7, 6, 5, 4, 4, 3, 2, 2];
        let mut all = Vec::new();
        for (i, n) in counts.iter().enumerate() {
            all.extend(posts(&format!("category{}", i + 1), *n));
        }
        assert_eq!(all.len(), 50);
        all
    }

    #[test]
    fn empty_input_ranks_nothing() {
        assert!(rank(&[], 10).unwrap().is_empty());
    }

    #[test]
    fn zero_limit_ranks_nothing() {
        assert!(rank(&ten_categories(), 0).unwrap().is_empty());
    }

    #[test]
    fn negative_limit_is_rejected() {
        let err = rank(&ten_categories(), -1).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert!(CategoryRanker::new(i64::MIN).is_err());
    }

    #[test]
    fn default_limit_is_ten() {
        assert_eq!(CategoryRanker::default().limit(), 10);
    }

    #[test]
    fn single_category_takes_every_post() {
        assert_eq!(rank(&posts("news", 7), 10).unwrap(), vec![entry("news", 7)]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let mut input = posts("A", 3);
        input.extend(posts("B", 3));
        assert_eq!(rank(&input, 10).unwrap(), vec![entry("A", 3), entry("B", 3)]);

        let mut reversed = posts("B", 3);
        reversed.extend(posts("A", 3));
        assert_eq!(
            rank(&reversed, 10).unwrap(),
            vec![entry("B", 3), entry("A", 3)]
        );
    }

    #[test]
    fn interleaved_ties_use_first_occurrence() {
        let input: Vec<Post> = ["x", "y", "y", "x", "z"].iter().map(|c| post(c)).collect();
        assert_eq!(
            rank(&input, 10).unwrap(),
            vec![entry("x", 2), entry("y", 2), entry("z", 1)]
        );
    }

    #[test]
    fn categories_are_case_sensitive_and_empty_counts() {
        let input: Vec<Post> = ["News", "news", "", "", "news"].iter().map(|c| post(c)).collect();
        assert_eq!(
            rank(&input, 10).unwrap(),
            vec![entry("news", 2), entry("", 2), entry("News", 1)]
        );
    }

    #[test]
    fn category_matching_the_leader_is_trending() {
        let mut input = ten_categories();
        let leader = rank(&input, 10).unwrap()[0].count as usize;
        input.extend(posts("trending category", leader));

        let ranker = CategoryRanker::default();
        assert!(ranker.is_trending(&input, "trending category"));
        assert_eq!(ranker.rank(&input)[1], entry("trending category", leader as u64));
    }

    #[test]
    fn rare_category_is_not_trending() {
        let mut input = ten_categories();
        let least = rank(&input, 10).unwrap().last().unwrap().count as usize;
        input.extend(posts("not trending category", least - 1));

        let ranker = CategoryRanker::default();
        assert!(!ranker.is_trending(&input, "not trending category"));
        assert_eq!(ranker.rank(&input).len(), 10);
    }

    #[test]
    fn truncates_to_limit() {
        let ranked = rank(&ten_categories(), 3).unwrap();
        assert_eq!(
            ranked,
            vec![entry("category1", 9), entry("category2", 8), entry("category3", 7)]
        );
    }

    #[test]
    fn ranking_holds_its_guarantees_over_generated_inputs() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let len: usize = rng.gen_range(0..60);
            let input: Vec<Post> = (0..len)
                .map(|_| post(&format!("c{}", rng.gen_range(0..15))))
                .collect();
            let limit: i64 = rng.gen_range(0..14);

            let ranked = rank(&input, limit).unwrap();
            assert!(ranked.len() <= limit as usize);
            assert!(ranked.iter().all(|e| e.count > 0));
            assert!(ranked.iter().map(|e| e.count).sum::<u64>() <= len as u64);
            assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));

            let names: HashSet<&str> = ranked.iter().map(|e| e.category.as_str()).collect();
            assert_eq!(names.len(), ranked.len());

            assert_eq!(rank(&input, limit).unwrap(), ranked);

            let distinct: HashSet<&str> = input.iter().map(|p| p.category.as_str()).collect();
            if distinct.len() <= limit as usize {
                assert_eq!(ranked.iter().map(|e| e.count).sum::<u64>(), len as u64);
            }
        }
    }
}
