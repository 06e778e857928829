/// SQL schema for the Pulse database
/// Creates all tables with proper constraints and indexes
pub const SCHEMA: &str = r#"
-- Dashboard operators
CREATE TABLE IF NOT EXISTS operators (
    id TEXT PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    created_at TEXT NOT NULL
);

-- Monitored tweets with upstream sentiment labels
CREATE TABLE IF NOT EXISTS tweets (
    id TEXT PRIMARY KEY,
    tweet_id TEXT UNIQUE NOT NULL,
    text TEXT NOT NULL,
    username TEXT NOT NULL,
    created_at TEXT NOT NULL,
    like_count INTEGER NOT NULL DEFAULT 0,
    retweet_count INTEGER NOT NULL DEFAULT 0,
    reply_count INTEGER NOT NULL DEFAULT 0,
    quote_count INTEGER NOT NULL DEFAULT 0,
    url TEXT,
    district TEXT,
    sentiment TEXT CHECK(sentiment IN ('Positive', 'Negative', 'Neutral')),
    fact_checked INTEGER NOT NULL DEFAULT 0
);

-- Indexes for the filtered query paths
CREATE INDEX IF NOT EXISTS idx_tweets_created_at ON tweets(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_tweets_username ON tweets(username);
CREATE INDEX IF NOT EXISTS idx_tweets_sentiment ON tweets(sentiment);

-- Bulk-uploaded voter roster
CREATE TABLE IF NOT EXISTS voters (
    id TEXT PRIMARY KEY,
    phone_number TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    opted_in INTEGER,
    imported_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_voters_phone ON voters(phone_number);

-- Token sessions for operator authentication
CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    operator_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    FOREIGN KEY (operator_id) REFERENCES operators(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_sessions_operator_id ON sessions(operator_id);
CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
"#;

/// Demo rows for local development. Timestamps are spread over a few days so
/// the timeline chart has something to draw.
pub const DEMO_DATA: &str = r#"
INSERT OR IGNORE INTO operators (id, email, created_at) VALUES
    ('0c9a6d9e-1df4-4a41-9be1-1c9f2ab1a001', 'admin@example.com', '2024-01-01T00:00:00+00:00'),
    ('0c9a6d9e-1df4-4a41-9be1-1c9f2ab1a002', 'analyst@example.com', '2024-01-01T00:00:00+00:00');

INSERT OR IGNORE INTO tweets (id, tweet_id, text, username, created_at, like_count, retweet_count, reply_count, quote_count, url, district, sentiment, fact_checked) VALUES
    ('6a0f73f2-0000-4000-8000-000000000001', '1001', 'The new road project is finally moving', 'kampala_watch', '2024-01-01T08:30:00+00:00', 42, 10, 5, 1, 'https://example.com/t/1001', 'Kampala', 'Positive', 1),
    ('6a0f73f2-0000-4000-8000-000000000002', '1002', 'Still waiting on the promised clinics', 'gulu_voice', '2024-01-01T12:15:00+00:00', 18, 4, 9, 0, 'https://example.com/t/1002', 'Gulu', 'Negative', 0),
    ('6a0f73f2-0000-4000-8000-000000000003', '1003', 'Rally scheduled for next weekend', 'mbarara_news', '2024-01-02T09:00:00+00:00', 7, 2, 1, 0, NULL, 'Mbarara', 'Neutral', 0),
    ('6a0f73f2-0000-4000-8000-000000000004', '1004', 'Strong turnout at the youth forum today', 'kampala_watch', '2024-01-02T17:45:00+00:00', 88, 31, 12, 3, 'https://example.com/t/1004', 'Kampala', 'Positive', 1),
    ('6a0f73f2-0000-4000-8000-000000000005', '1005', 'No comment on the budget yet', 'jinja_daily', '2024-01-03T10:20:00+00:00', 3, 0, 2, 0, NULL, 'Jinja', NULL, 0);
"#;
