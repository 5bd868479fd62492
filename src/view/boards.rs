//! Hall of fame and missed-word lists

use serde::Serialize;

use super::format::{format_date, format_number};
use crate::remote::{GameScoresResponse, MissedWordsResponse};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    /// 1-based position in server order
    pub rank: usize,
    pub user_name: String,
    pub email: String,
    pub score: String,
    pub date: String,
}

/// Leaderboard rows, in the order the server sent them
pub fn hall_of_fame(scores: Option<&GameScoresResponse>) -> Vec<LeaderboardRow> {
    scores
        .map(|s| s.hof.as_slice())
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, score)| LeaderboardRow {
            rank: i + 1,
            user_name: score.user_name.clone(),
            email: score.email.clone(),
            score: format_number(score.score),
            date: format_date(&score.date),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissedWordsPage {
    pub words: Vec<String>,
    /// `page 1 of 4 (37 total)`
    pub summary: String,
}

pub fn missed_words_page(response: Option<&MissedWordsResponse>) -> MissedWordsPage {
    let Some(response) = response else {
        return MissedWordsPage {
            words: Vec::new(),
            summary: "no missed words".to_string(),
        };
    };

    let page = &response.pagination;
    MissedWordsPage {
        words: response
            .missed_words
            .iter()
            .map(|w| w.missed_words.clone())
            .collect(),
        summary: format!(
            "page {} of {} ({} total)",
            page.current_page,
            page.total_pages,
            format_number(page.total)
        ),
    }
}
