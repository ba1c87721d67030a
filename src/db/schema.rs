pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS scans (
    id TEXT PRIMARY KEY,
    city TEXT NOT NULL,
    category TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    total_found INTEGER NOT NULL DEFAULT 0,
    total_enriched INTEGER NOT NULL DEFAULT 0,
    error_message TEXT,
    created_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS businesses (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    city TEXT NOT NULL,
    address TEXT,
    phone TEXT,
    whatsapp TEXT,
    email TEXT,
    website TEXT,
    instagram TEXT,
    rating REAL,
    review_count INTEGER,
    response_time_hours REAL,
    place_id TEXT UNIQUE,
    scan_id TEXT REFERENCES scans(id) ON DELETE SET NULL,
    ai_score INTEGER,
    ai_readiness TEXT,
    ai_summary TEXT,
    outreach_status TEXT NOT NULL DEFAULT 'pending',
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    password_hash TEXT,
    created_at TEXT NOT NULL,
    last_login_at TEXT
);

CREATE TABLE IF NOT EXISTS outreach_campaigns (
    id TEXT PRIMARY KEY,
    business_id TEXT NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
    user_id TEXT REFERENCES users(id) ON DELETE SET NULL,
    status TEXT NOT NULL DEFAULT 'draft',
    framework TEXT NOT NULL,
    language TEXT NOT NULL,
    offer TEXT NOT NULL,
    loss_min INTEGER NOT NULL,
    loss_max INTEGER NOT NULL,
    signals TEXT NOT NULL,
    whatsapp_script TEXT NOT NULL,
    whatsapp_link TEXT NOT NULL,
    instagram_dm TEXT NOT NULL,
    email_subject TEXT NOT NULL,
    email_body TEXT NOT NULL,
    follow_up_day3 TEXT NOT NULL,
    follow_up_day7 TEXT NOT NULL,
    follow_up_day14 TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    sent_at TEXT,
    responded_at TEXT,
    converted_at TEXT
);

CREATE TABLE IF NOT EXISTS ultimate_outreach (
    id TEXT PRIMARY KEY,
    business_id TEXT NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
    user_id TEXT REFERENCES users(id) ON DELETE SET NULL,
    language TEXT NOT NULL,
    package_json TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS intent_signals (
    id TEXT PRIMARY KEY,
    city TEXT NOT NULL,
    category TEXT,
    kind TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    source TEXT,
    url TEXT,
    strength INTEGER NOT NULL DEFAULT 50,
    details_json TEXT NOT NULL,
    detected_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    city TEXT NOT NULL,
    venue TEXT,
    starts_at TEXT NOT NULL,
    expected_attendance INTEGER,
    category TEXT
);

CREATE TABLE IF NOT EXISTS venue_monitors (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    city TEXT NOT NULL,
    category TEXT,
    url TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    last_checked_at TEXT
);

CREATE TABLE IF NOT EXISTS team_invitations (
    id TEXT PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    role TEXT NOT NULL,
    invited_by TEXT REFERENCES users(id) ON DELETE SET NULL,
    expires_at TEXT NOT NULL,
    accepted_at TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS magic_links (
    token TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    used_at TEXT
);

CREATE TABLE IF NOT EXISTS activity_log (
    id TEXT PRIMARY KEY,
    user_id TEXT REFERENCES users(id) ON DELETE SET NULL,
    action TEXT NOT NULL,
    details_json TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_businesses_city_category ON businesses(city, category);
CREATE INDEX IF NOT EXISTS idx_businesses_status ON businesses(outreach_status);
CREATE INDEX IF NOT EXISTS idx_campaigns_business ON outreach_campaigns(business_id);
CREATE INDEX IF NOT EXISTS idx_campaigns_status ON outreach_campaigns(status);
CREATE INDEX IF NOT EXISTS idx_intent_city ON intent_signals(city);
CREATE INDEX IF NOT EXISTS idx_scans_status ON scans(status);
CREATE INDEX IF NOT EXISTS idx_activity_created ON activity_log(created_at);
";
