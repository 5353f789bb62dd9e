pub mod alerts;
pub mod auth;
pub mod domain;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub supabase_url: Option<String>,
        pub supabase_anon_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub report_utc_offset_minutes: Option<i32>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let report_utc_offset_minutes = match std::env::var("REPORT_UTC_OFFSET_MINUTES") {
                Ok(s) => Some(
                    s.parse::<i32>()
                        .context("REPORT_UTC_OFFSET_MINUTES must be an integer")?,
                ),
                Err(_) => None,
            };

            Ok(Self {
                supabase_url: std::env::var("SUPABASE_URL").ok(),
                supabase_anon_key: std::env::var("SUPABASE_ANON_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                report_utc_offset_minutes,
            })
        }

        pub fn require_supabase_url(&self) -> anyhow::Result<&str> {
            self.supabase_url
                .as_deref()
                .context("SUPABASE_URL is required")
        }

        pub fn require_supabase_anon_key(&self) -> anyhow::Result<&str> {
            self.supabase_anon_key
                .as_deref()
                .context("SUPABASE_ANON_KEY is required")
        }
    }
}
