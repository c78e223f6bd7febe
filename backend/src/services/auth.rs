//! Authentication service for user registration, login, and session tokens

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::{validation, FieldError, UserProfile};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// Input for creating an account
#[derive(Debug, Deserialize)]
pub struct SignupInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issued session for a signed-in user
#[derive(Debug, Serialize)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

impl SignupInput {
    /// Check every field, reporting all problems at once
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();

        if let Err(msg) = validation::validate_username(self.username.trim()) {
            errors.push(FieldError::new("username", msg));
        }
        if let Err(msg) = validation::validate_password(&self.password1) {
            errors.push(FieldError::new("password1", msg));
        }
        if let Err(msg) = validation::validate_password_confirmation(&self.password1, &self.password2)
        {
            errors.push(FieldError::new("password2", msg));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidInput(errors))
        }
    }
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Create an account and sign it in
    pub async fn signup(&self, input: SignupInput) -> AppResult<AuthSession> {
        input.validate()?;
        let username = input.username.trim().to_string();

        // Check if username already exists
        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = $1")
            .bind(&username)
            .fetch_one(&self.db)
            .await?;

        if existing > 0 {
            return Err(username_taken());
        }

        // Hash password
        let password_hash = hash(&input.password1, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash, last_login_at)
            VALUES ($1, $2, NOW())
            RETURNING id, username, password_hash, is_active, created_at, last_login_at
            "#,
        )
        .bind(&username)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent signup
            sqlx::Error::Database(db) if db.is_unique_violation() => username_taken(),
            e => AppError::DatabaseError(e),
        })?;

        tracing::info!("Created account {}", user.username);
        self.issue_session(user)
    }

    /// Authenticate user with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthSession> {
        // Find user by username
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, is_active, created_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.trim())
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        // Verify password
        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        // Check if user is active
        if !user.is_active {
            return Err(AppError::Unauthorized("This account is inactive".to_string()));
        }

        // Update last login
        let last_login_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "UPDATE users SET last_login_at = NOW() WHERE id = $1 RETURNING last_login_at",
        )
        .bind(user.id)
        .fetch_one(&self.db)
        .await?;

        self.issue_session(UserRow {
            last_login_at: Some(last_login_at),
            ..user
        })
    }

    /// Validate a session token and return its claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.jwt_secret)
    }

    fn issue_session(&self, user: UserRow) -> AppResult<AuthSession> {
        let access_token = encode_token(
            user.id,
            &user.username,
            &self.jwt_secret,
            self.access_token_expiry,
        )?;

        Ok(AuthSession {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            user: user.into(),
        })
    }
}

fn username_taken() -> AppError {
    AppError::Conflict {
        resource: "username".to_string(),
        message: "A user with that username already exists.".to_string(),
    }
}

/// Sign a session token for `user_id`
pub fn encode_token(user_id: Uuid, username: &str, secret: &str, expiry_secs: i64) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Decode and validate a session token
pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}
