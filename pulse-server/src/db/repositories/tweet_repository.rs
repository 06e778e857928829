use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::Row;
use uuid::Uuid;

use pulse_types::{EngagementField, Sentiment, SentimentSample, Tweet, TweetPage};

use crate::db::DbPool;

/// Fixed page size for the tweets table.
pub const PAGE_SIZE: u32 = 20;

/// Optional predicates composed conjunctively into a single query.
///
/// An absent field means "no constraint", never "match empty".
#[derive(Debug, Clone, Default)]
pub struct TweetFilter {
    /// Case-insensitive substring match on the tweet text.
    pub text: Option<String>,
    /// Case-insensitive substring match on the author handle.
    pub username: Option<String>,
    /// Exact sentiment label match.
    pub sentiment: Option<Sentiment>,
    /// Inclusive lower bound on creation time.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    pub date_to: Option<DateTime<Utc>>,
    /// Minimum value for one engagement counter.
    pub min_engagement: Option<(EngagementField, i64)>,
}

impl TweetFilter {
    /// Build the WHERE clause and its positional parameters.
    fn where_clause(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions: Vec<&'static str> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(text) = &self.text {
            conditions.push("text LIKE ?");
            params.push(Box::new(format!("%{}%", text)));
        }
        if let Some(username) = &self.username {
            conditions.push("username LIKE ?");
            params.push(Box::new(format!("%{}%", username)));
        }
        if let Some(sentiment) = self.sentiment {
            conditions.push("sentiment = ?");
            params.push(Box::new(sentiment.as_str()));
        }
        if let Some(from) = self.date_from {
            conditions.push("created_at >= ?");
            params.push(Box::new(from.to_rfc3339()));
        }
        if let Some(to) = self.date_to {
            conditions.push("created_at <= ?");
            params.push(Box::new(to.to_rfc3339()));
        }
        if let Some((field, min)) = self.min_engagement {
            let condition = match field {
                EngagementField::Likes => "like_count >= ?",
                EngagementField::Retweets => "retweet_count >= ?",
                EngagementField::Replies => "reply_count >= ?",
            };
            conditions.push(condition);
            params.push(Box::new(min));
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

const TWEET_COLUMNS: &str = "id, tweet_id, text, username, created_at, like_count, \
     retweet_count, reply_count, quote_count, url, district, sentiment, fact_checked";

pub struct TweetRepository {
    pool: DbPool,
}

impl TweetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a tweet (seeding and tests; ingestion is out of scope).
    pub fn insert(&self, tweet: &Tweet) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO tweets (id, tweet_id, text, username, created_at, like_count, \
             retweet_count, reply_count, quote_count, url, district, sentiment, fact_checked) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                tweet.id.to_string(),
                tweet.tweet_id,
                tweet.text,
                tweet.username,
                tweet.created_at.to_rfc3339(),
                tweet.like_count,
                tweet.retweet_count,
                tweet.reply_count,
                tweet.quote_count,
                tweet.url,
                tweet.district,
                tweet.sentiment.map(|s| s.as_str()),
                tweet.fact_checked,
            ],
        )
        .context("Failed to insert tweet")?;
        Ok(())
    }

    /// One page of filtered tweets, newest first, plus the exact total
    /// matching count. All supplied filters apply conjunctively in a
    /// single round trip; `page` is 1-based.
    pub fn query_page(&self, filter: &TweetFilter, page: u32) -> Result<TweetPage> {
        let conn = self.pool.get()?;
        let (where_clause, params) = filter.where_clause();

        let count_sql = format!("SELECT COUNT(*) FROM tweets {}", where_clause);
        let total_count: i64 = conn
            .query_row(
                &count_sql,
                rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
                |row| row.get(0),
            )
            .context("Failed to count matching tweets")?;

        let page = page.max(1);
        let offset = (page - 1) as i64 * PAGE_SIZE as i64;
        let rows_sql = format!(
            "SELECT {} FROM tweets {} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            TWEET_COLUMNS, where_clause
        );

        let mut stmt = conn.prepare(&rows_sql)?;
        let mut all_params: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let limit = PAGE_SIZE as i64;
        all_params.push(&limit);
        all_params.push(&offset);

        let tweets = stmt
            .query_map(rusqlite::params_from_iter(all_params), map_tweet_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read tweet page")?;

        let total_pages = ((total_count as u64 + PAGE_SIZE as u64 - 1) / PAGE_SIZE as u64) as u32;

        Ok(TweetPage {
            tweets,
            total_count,
            page,
            total_pages,
        })
    }

    /// Labelled (timestamp, sentiment) pairs inside the window, ascending.
    /// Unlabelled rows are excluded here, before aggregation.
    pub fn sentiment_samples(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SentimentSample>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT created_at, sentiment FROM tweets \
             WHERE sentiment IS NOT NULL AND created_at >= ? AND created_at <= ? \
             ORDER BY created_at ASC",
        )?;

        let samples = stmt
            .query_map(
                rusqlite::params![from.to_rfc3339(), to.to_rfc3339()],
                |row| {
                    let created_at: String = row.get(0)?;
                    let sentiment: String = row.get(1)?;
                    Ok((created_at, sentiment))
                },
            )?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter_map(|(created_at, sentiment)| {
                let created_at = created_at.parse::<DateTime<Utc>>().ok()?;
                let sentiment = Sentiment::parse(&sentiment)?;
                Some(SentimentSample {
                    created_at,
                    sentiment,
                })
            })
            .collect();

        Ok(samples)
    }

    /// All sentiment labels in the table, for the distribution chart and
    /// the average-sentiment card.
    pub fn all_sentiments(&self) -> Result<Vec<Sentiment>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT sentiment FROM tweets WHERE sentiment IS NOT NULL")?;

        let labels = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter_map(|s| Sentiment::parse(&s))
            .collect();

        Ok(labels)
    }

    pub fn total_count(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        let count = conn.query_row("SELECT COUNT(*) FROM tweets", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn unique_user_count(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        let count = conn.query_row(
            "SELECT COUNT(DISTINCT username) FROM tweets",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn fact_checked_count(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM tweets WHERE fact_checked = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_tweet_row(row: &Row<'_>) -> rusqlite::Result<Tweet> {
    let sentiment: Option<String> = row.get(11)?;
    Ok(Tweet {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
        tweet_id: row.get(1)?,
        text: row.get(2)?,
        username: row.get(3)?,
        created_at: row.get::<_, String>(4)?.parse::<DateTime<Utc>>().unwrap(),
        like_count: row.get(5)?,
        retweet_count: row.get(6)?,
        reply_count: row.get(7)?,
        quote_count: row.get(8)?,
        url: row.get(9)?,
        district: row.get(10)?,
        sentiment: sentiment.as_deref().and_then(Sentiment::parse),
        fact_checked: row.get(12)?,
    })
}
