//! Account and API token database operations.

use rusqlite::{params, OptionalExtension, Row};
use sha2::{Digest, Sha256};

use super::{classify_write_error, Database, DbError, DbResult};
use crate::models::{Account, AccountKind};

/// SHA-256 hex digest of a raw bearer token.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

impl Database {
    /// Insert a new account.
    pub fn insert_account(&self, account: &Account) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO accounts (id, name, email, kind, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    account.id,
                    account.name,
                    account.email,
                    account.kind.as_str(),
                    account.created_at,
                ],
            )
            .map_err(|e| classify_write_error(e, None))?;
        Ok(())
    }

    /// Get an account by ID.
    pub fn get_account(&self, id: &str) -> DbResult<Option<Account>> {
        self.conn
            .query_row(
                "SELECT id, name, email, kind, created_at FROM accounts WHERE id = ?",
                [id],
                account_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get an account by email.
    pub fn get_account_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        self.conn
            .query_row(
                "SELECT id, name, email, kind, created_at FROM accounts WHERE email = ?",
                [email],
                account_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Issue a new bearer token for an account. Only the digest is stored.
    pub fn issue_token(&self, account_id: &str) -> DbResult<String> {
        if self.get_account(account_id)?.is_none() {
            return Err(DbError::NotFound(format!("account {}", account_id)));
        }
        let token = format!("pc_{}", uuid::Uuid::new_v4().simple());
        self.conn.execute(
            "INSERT INTO api_tokens (token_hash, account_id) VALUES (?1, ?2)",
            params![hash_token(&token), account_id],
        )?;
        Ok(token)
    }

    /// Resolve a raw bearer token to its account.
    pub fn account_for_token(&self, token: &str) -> DbResult<Option<Account>> {
        self.conn
            .query_row(
                r#"
                SELECT a.id, a.name, a.email, a.kind, a.created_at
                FROM api_tokens t
                JOIN accounts a ON a.id = t.account_id
                WHERE t.token_hash = ?
                "#,
                [hash_token(token)],
                account_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Revoke a bearer token.
    pub fn revoke_token(&self, token: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM api_tokens WHERE token_hash = ?", [hash_token(token)])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct AccountRow {
    id: String,
    name: String,
    email: String,
    kind: String,
    created_at: String,
}

fn account_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        kind: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl TryFrom<AccountRow> for Account {
    type Error = DbError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let kind = AccountKind::parse(&row.kind)
            .ok_or_else(|| DbError::Constraint(format!("Unknown account kind: {}", row.kind)))?;
        Ok(Account {
            id: row.id,
            name: row.name,
            email: row.email,
            kind,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let vet = Account::new("Dr. Rivera".into(), "rivera@example.com".into(), AccountKind::Vet);
        db.insert_account(&vet).unwrap();

        let retrieved = db.get_account(&vet.id).unwrap().unwrap();
        assert_eq!(retrieved, vet);

        let by_email = db.get_account_by_email("rivera@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, vet.id);
    }

    #[test]
    fn test_duplicate_email_is_constraint_error() {
        let db = setup_db();
        let first = Account::new("A".into(), "same@example.com".into(), AccountKind::Owner);
        let second = Account::new("B".into(), "same@example.com".into(), AccountKind::Owner);
        db.insert_account(&first).unwrap();

        let err = db.insert_account(&second).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn test_token_resolves_to_account() {
        let db = setup_db();
        let owner = Account::new("Sam".into(), "sam@example.com".into(), AccountKind::Owner);
        db.insert_account(&owner).unwrap();

        let token = db.issue_token(&owner.id).unwrap();
        let resolved = db.account_for_token(&token).unwrap().unwrap();
        assert_eq!(resolved.id, owner.id);

        assert!(db.account_for_token("pc_unknown").unwrap().is_none());

        assert!(db.revoke_token(&token).unwrap());
        assert!(db.account_for_token(&token).unwrap().is_none());
    }

    #[test]
    fn test_token_is_stored_hashed() {
        let db = setup_db();
        let owner = Account::new("Sam".into(), "sam@example.com".into(), AccountKind::Owner);
        db.insert_account(&owner).unwrap();
        let token = db.issue_token(&owner.id).unwrap();

        let stored: String = db
            .conn()
            .query_row("SELECT token_hash FROM api_tokens", [], |row| row.get(0))
            .unwrap();
        assert_ne!(stored, token);
        assert_eq!(stored, hash_token(&token));
        assert_eq!(stored.len(), 64);
    }

    #[test]
    fn test_issue_token_for_missing_account() {
        let db = setup_db();
        assert!(matches!(db.issue_token("nope"), Err(DbError::NotFound(_))));
    }
}
