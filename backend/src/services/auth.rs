//! Authentication service for user registration, login and sub-admin management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::User;
use shared::types::UserRole;
use shared::validation::{validate_email, validate_password};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// Input for registering a new user
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Input for login
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Input for creating a sub-admin account
#[derive(Debug, Deserialize)]
pub struct CreateSubAdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Response after successful authentication
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AppResult<User> {
        let role = UserRole::parse(&self.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown user role: {}", self.role)))?;
        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, is_active, created_at, updated_at";

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Register a new user account. The first account ever created becomes
    /// the superadmin; every later self-registration is a subadmin.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthResponse> {
        if input.name.trim().is_empty() {
            return Err(AppError::MissingFields);
        }
        if let Err(message) = validate_email(&input.email) {
            return Err(AppError::Validation {
                field: "email".to_string(),
                message: message.to_string(),
            });
        }
        if let Err(message) = validate_password(&input.password) {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: message.to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
                .fetch_one(&self.db)
                .await?;
        let role = if user_count == 0 {
            UserRole::Superadmin
        } else {
            UserRole::Subadmin
        };

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, LOWER($2), $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(&input.email)
        .bind(&password_hash)
        .bind(role.as_str())
        .fetch_one(&self.db)
        .await?;

        let user = row.into_user()?;
        tracing::info!(email = %user.email, role = user.role.as_str(), "Registered user");

        let access_token = self.generate_token(&user)?;
        Ok(AuthResponse {
            user,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Authenticate a user and issue an access token
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(&input.email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &row.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid || !row.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let user = row.into_user()?;
        let access_token = self.generate_token(&user)?;
        Ok(AuthResponse {
            user,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Fetch a single user
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        row.into_user()
    }

    /// List all sub-admin accounts
    pub async fn list_subadmins(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = 'subadmin' ORDER BY created_at"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Create a sub-admin account
    pub async fn create_subadmin(&self, input: CreateSubAdminInput) -> AppResult<User> {
        if input.name.trim().is_empty() {
            return Err(AppError::MissingFields);
        }
        if let Err(message) = validate_email(&input.email) {
            return Err(AppError::Validation {
                field: "email".to_string(),
                message: message.to_string(),
            });
        }
        if let Err(message) = validate_password(&input.password) {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: message.to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;
        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, LOWER($2), $3, 'subadmin')
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(&input.email)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await?;

        row.into_user()
    }

    /// Delete a sub-admin account. Superadmin accounts cannot be deleted
    /// through this path.
    pub async fn delete_subadmin(&self, user_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'subadmin'")
                .bind(user_id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Sub-admin".to_string()));
        }

        Ok(())
    }

    /// Generate an access token for a user
    fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.as_str().to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }
}
