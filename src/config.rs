use std::env;

/// Default token lifetime: 30 days.
const DEFAULT_JWT_EXPIRES_IN_SECS: u64 = 30 * 24 * 60 * 60;
const LOCAL_JWT_SECRET: &str = "eduhub-local-development-secret";

/// AppConfig
///
/// Holds the application's configuration state. Immutable once loaded and pulled into
/// handlers and extractors through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Postgres connection string. `None` runs the API on the in-memory store (local only).
    pub db_url: Option<String>,
    // Port the HTTP server binds on 0.0.0.0.
    pub port: u16,
    // S3-compatible storage endpoint (MinIO locally).
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_key: String,
    pub s3_secret: String,
    // Bucket holding uploaded course thumbnails.
    pub s3_bucket: String,
    // Runtime environment marker. Controls the dev bypass and log format.
    // Unknown values are rejected by `load`.
    pub env: Env,
    // HS256 secret used to sign and verify issued JWTs.
    pub jwt_secret: String,
    // Lifetime of issued tokens, in seconds.
    pub jwt_expires_in_secs: u64,
}

/// Env
///
/// Runtime context: local development conveniences versus hardened production settings.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Non-panicking configuration for test state setup.
    fn default() -> Self {
        Self {
            db_url: None,
            port: 1337,
            s3_endpoint: "http://localhost:9000".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_key: "admin".to_string(),
            s3_secret: "password".to_string(),
            s3_bucket: "eduhub-test".to_string(),
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            jwt_expires_in_secs: DEFAULT_JWT_EXPIRES_IN_SECS,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every parameter from environment variables at startup.
    ///
    /// `APP_ENV` may only be left unset for a throwaway in-memory run. Once `DATABASE_URL`
    /// points at a real database the environment has to be named explicitly.
    ///
    /// # Panics
    /// Panics if a variable required in production is missing, if `APP_ENV` is unknown or
    /// missing while `DATABASE_URL` is set, or if a numeric variable cannot be parsed, so
    /// the server never starts half-configured.
    pub fn load() -> Self {
        let env = match (env::var("APP_ENV").ok().as_deref(), env::var("DATABASE_URL").is_ok()) {
            (Some("production"), _) => Env::Production,
            (Some("local"), _) | (None, false) => Env::Local,
            (None, true) => {
                panic!("FATAL: APP_ENV must be set explicitly when DATABASE_URL is configured")
            }
            (Some(other), _) => panic!("FATAL: unknown APP_ENV '{}'", other),
        };

        let port = env::var("PORT")
            .ok()
            .map(|p| p.parse::<u16>().expect("FATAL: PORT must be a valid port number"))
            .unwrap_or(1337);

        let jwt_expires_in_secs = env::var("JWT_EXPIRES_IN_SECS")
            .ok()
            .map(|v| {
                v.parse::<u64>()
                    .expect("FATAL: JWT_EXPIRES_IN_SECS must be a number of seconds")
            })
            .unwrap_or(DEFAULT_JWT_EXPIRES_IN_SECS);

        match env {
            Env::Local => Self {
                env: Env::Local,
                // Without a database the server falls back to the in-memory store.
                db_url: env::var("DATABASE_URL").ok(),
                port,
                s3_endpoint: env::var("S3_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:9000".to_string()),
                s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                s3_key: env::var("S3_ACCESS_KEY").unwrap_or_else(|_| "admin".to_string()),
                s3_secret: env::var("S3_SECRET_KEY").unwrap_or_else(|_| "password".to_string()),
                s3_bucket: env::var("S3_BUCKET_NAME")
                    .unwrap_or_else(|_| "eduhub-uploads".to_string()),
                jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
                jwt_expires_in_secs,
            },
            Env::Production => Self {
                env: Env::Production,
                db_url: Some(env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in prod")),
                port,
                s3_endpoint: env::var("S3_ENDPOINT").expect("FATAL: S3_ENDPOINT required in prod"),
                s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                s3_key: env::var("S3_ACCESS_KEY").expect("FATAL: S3_ACCESS_KEY required in prod"),
                s3_secret: env::var("S3_SECRET_KEY").expect("FATAL: S3_SECRET_KEY required in prod"),
                s3_bucket: env::var("S3_BUCKET_NAME")
                    .unwrap_or_else(|_| "eduhub-uploads".to_string()),
                jwt_secret: env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production."),
                jwt_expires_in_secs,
            },
        }
    }

    /// dev_bypass_enabled
    ///
    /// The `x-user-id` header is only honoured for a local run on the in-memory store.
    /// Any configured database, even with `APP_ENV=local`, requires a real token.
    pub fn dev_bypass_enabled(&self) -> bool {
        self.env == Env::Local && self.db_url.is_none()
    }
}
