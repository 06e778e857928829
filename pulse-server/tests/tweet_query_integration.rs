use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use pulse_server::db::repositories::{TweetFilter, TweetRepository, PAGE_SIZE};
use pulse_server::db::Database;
use pulse_types::{EngagementField, Sentiment, Tweet};

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().expect("bad timestamp literal")
}

fn tweet(text: &str, username: &str, created_at: &str) -> Tweet {
    Tweet {
        id: Uuid::new_v4(),
        tweet_id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        username: username.to_string(),
        created_at: ts(created_at),
        like_count: 0,
        retweet_count: 0,
        reply_count: 0,
        quote_count: 0,
        url: None,
        district: None,
        sentiment: None,
        fact_checked: false,
    }
}

fn seeded_repo() -> Result<TweetRepository> {
    let db = Database::in_memory()?;
    db.initialize()?;
    let repo = TweetRepository::new(db.pool.clone());

    let mut a = tweet("Roads in Gulu need urgent repair", "citizen_a", "2024-03-01T08:00:00Z");
    a.sentiment = Some(Sentiment::Negative);
    a.like_count = 50;
    repo.insert(&a)?;

    let mut b = tweet("Great progress on the new hospital", "citizen_b", "2024-03-02T09:00:00Z");
    b.sentiment = Some(Sentiment::Positive);
    b.retweet_count = 12;
    repo.insert(&b)?;

    let mut c = tweet("Hospital opening delayed again", "citizen_a", "2024-03-03T10:00:00Z");
    c.sentiment = Some(Sentiment::Negative);
    c.reply_count = 30;
    repo.insert(&c)?;

    let d = tweet("Attending the rally today", "citizen_c", "2024-03-04T11:00:00Z");
    repo.insert(&d)?;

    Ok(repo)
}

#[test]
fn unfiltered_query_returns_everything_newest_first() -> Result<()> {
    let repo = seeded_repo()?;

    let page = repo.query_page(&TweetFilter::default(), 1)?;
    assert_eq!(page.total_count, 4);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.tweets.len(), 4);
    assert_eq!(page.tweets[0].username, "citizen_c");
    assert_eq!(page.tweets[3].username, "citizen_a");
    Ok(())
}

#[test]
fn text_filter_is_case_insensitive_substring() -> Result<()> {
    let repo = seeded_repo()?;

    let filter = TweetFilter {
        text: Some("hospital".to_string()),
        ..Default::default()
    };
    let page = repo.query_page(&filter, 1)?;
    assert_eq!(page.total_count, 2);
    assert!(page.tweets.iter().all(|t| t.text.to_lowercase().contains("hospital")));
    Ok(())
}

#[test]
fn sentiment_filter_matches_exact_label_only() -> Result<()> {
    let repo = seeded_repo()?;

    let filter = TweetFilter {
        sentiment: Some(Sentiment::Negative),
        ..Default::default()
    };
    let page = repo.query_page(&filter, 1)?;
    assert_eq!(page.total_count, 2);
    // The unlabelled tweet never matches any sentiment filter
    assert!(page.tweets.iter().all(|t| t.sentiment == Some(Sentiment::Negative)));
    Ok(())
}

#[test]
fn date_bounds_are_inclusive() -> Result<()> {
    let repo = seeded_repo()?;

    let filter = TweetFilter {
        date_from: Some(ts("2024-03-02T09:00:00Z")),
        date_to: Some(ts("2024-03-03T10:00:00Z")),
        ..Default::default()
    };
    let page = repo.query_page(&filter, 1)?;
    assert_eq!(page.total_count, 2);
    assert_eq!(page.tweets[0].username, "citizen_a");
    assert_eq!(page.tweets[1].username, "citizen_b");
    Ok(())
}

#[test]
fn engagement_filter_targets_the_named_counter() -> Result<()> {
    let repo = seeded_repo()?;

    let likes = TweetFilter {
        min_engagement: Some((EngagementField::Likes, 10)),
        ..Default::default()
    };
    assert_eq!(repo.query_page(&likes, 1)?.total_count, 1);

    let retweets = TweetFilter {
        min_engagement: Some((EngagementField::Retweets, 10)),
        ..Default::default()
    };
    assert_eq!(repo.query_page(&retweets, 1)?.total_count, 1);

    let replies = TweetFilter {
        min_engagement: Some((EngagementField::Replies, 31)),
        ..Default::default()
    };
    assert_eq!(repo.query_page(&replies, 1)?.total_count, 0);
    Ok(())
}

#[test]
fn filters_compose_conjunctively() -> Result<()> {
    let repo = seeded_repo()?;

    // Each predicate alone matches two rows; together they match one
    let filter = TweetFilter {
        username: Some("citizen_a".to_string()),
        sentiment: Some(Sentiment::Negative),
        date_from: Some(ts("2024-03-02T00:00:00Z")),
        ..Default::default()
    };
    let page = repo.query_page(&filter, 1)?;
    assert_eq!(page.total_count, 1);
    assert_eq!(page.tweets[0].text, "Hospital opening delayed again");
    Ok(())
}

#[test]
fn no_match_yields_empty_page_not_error() -> Result<()> {
    let repo = seeded_repo()?;

    let filter = TweetFilter {
        text: Some("zzz-no-such-text".to_string()),
        ..Default::default()
    };
    let page = repo.query_page(&filter, 1)?;
    assert_eq!(page.total_count, 0);
    assert_eq!(page.total_pages, 0);
    assert!(page.tweets.is_empty());
    Ok(())
}

#[test]
fn pagination_splits_on_page_size_and_reports_exact_totals() -> Result<()> {
    let db = Database::in_memory()?;
    db.initialize()?;
    let repo = TweetRepository::new(db.pool.clone());

    // One full page plus a remainder of 5
    let total = PAGE_SIZE as i64 + 5;
    for i in 0..total {
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
            + chrono::Duration::minutes(i);
        repo.insert(&tweet(
            &format!("post {}", i),
            "poster",
            &when.to_rfc3339(),
        ))?;
    }

    let first = repo.query_page(&TweetFilter::default(), 1)?;
    assert_eq!(first.total_count, total);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.tweets.len(), PAGE_SIZE as usize);
    assert_eq!(first.page, 1);

    let second = repo.query_page(&TweetFilter::default(), 2)?;
    assert_eq!(second.tweets.len(), 5);
    assert_eq!(second.page, 2);

    // Newest-first ordering is stable across the page boundary
    assert_eq!(first.tweets[0].text, format!("post {}", total - 1));
    assert_eq!(second.tweets[4].text, "post 0");

    // Past-the-end pages are empty, not an error
    let third = repo.query_page(&TweetFilter::default(), 3)?;
    assert!(third.tweets.is_empty());
    assert_eq!(third.total_count, total);
    Ok(())
}

#[test]
fn page_zero_is_clamped_to_first_page() -> Result<()> {
    let repo = seeded_repo()?;

    let page = repo.query_page(&TweetFilter::default(), 0)?;
    assert_eq!(page.page, 1);
    assert_eq!(page.tweets.len(), 4);
    Ok(())
}
