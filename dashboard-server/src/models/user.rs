//! User model

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl User {
    pub fn create(
        conn: &Connection,
        data: CreateUser,
        password_hash: String,
    ) -> rusqlite::Result<Self> {
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash,
            last_login: None,
            created_at: Utc::now(),
        };
        conn.execute(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            (
                user.id.to_string(),
                &user.username,
                &user.email,
                &user.password_hash,
                user.created_at,
            ),
        )?;
        Ok(user)
    }

    pub fn find_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<Self>> {
        conn.query_row(
            "SELECT id, username, email, password_hash, last_login, created_at
             FROM users WHERE username = ?1",
            [username],
            Self::from_row,
        )
        .optional()
    }

    pub fn find_by_id(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Self>> {
        conn.query_row(
            "SELECT id, username, email, password_hash, last_login, created_at
             FROM users WHERE id = ?1",
            [id.to_string()],
            Self::from_row,
        )
        .optional()
    }

    pub fn update_last_login(conn: &Connection, id: Uuid) -> rusqlite::Result<()> {
        conn.execute(
            "UPDATE users SET last_login = ?1 WHERE id = ?2",
            (Utc::now(), id.to_string()),
        )?;
        Ok(())
    }

    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            last_login: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}
