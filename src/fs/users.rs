use std::cell::Cell;
use std::io;
use std::path::PathBuf;

use crate::error::{AuthError, RegisterError};
use crate::fs::backing::{Backing, FileBacking};
use crate::fs::record::{FIELD_SEPARATOR, log_skipped};
use crate::models::Account;
use crate::models::account::{check_password, valid_email};

/// Fixed bcrypt cost, matching the hashes already on disk.
const BCRYPT_COST: u32 = 12;

/// Durable identity records, one line per account:
/// `username | email | password_hash`. Registration is the only mutator and
/// rewrites the whole file.
pub struct CredentialStore<B = FileBacking> {
    backing: B,
    skipped: Cell<usize>,
}

impl CredentialStore<FileBacking> {
    /// Store over the flat file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_backing(FileBacking::new(path))
    }
}

impl<B: Backing> CredentialStore<B> {
    pub fn with_backing(backing: B) -> Self {
        Self {
            backing,
            skipped: Cell::new(0),
        }
    }

    /// All registered accounts in file order. The presentation layer uses
    /// this to resolve the display name for a signed-in email.
    pub fn accounts(&self) -> io::Result<Vec<Account>> {
        let mut accounts = Vec::new();
        let mut skipped = 0;

        if let Some(contents) = self.backing.read()? {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
                if parts.len() != 3 {
                    log_skipped("users", "expected 3 fields", line);
                    skipped += 1;
                    continue;
                }
                accounts.push(Account {
                    username: parts[0].to_string(),
                    email: parts[1].to_string(),
                    password_hash: parts[2].to_string(),
                });
            }
        }

        self.skipped.set(skipped);
        Ok(accounts)
    }

    /// Create an account. Validation order follows the sign-up form: email
    /// shape, password rules, email uniqueness, username uniqueness. The
    /// plaintext password is hashed and discarded; the whole store is
    /// rewritten with the new record added.
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, RegisterError> {
        if !valid_email(email) {
            return Err(RegisterError::InvalidEmail);
        }
        check_password(password)?;

        let mut accounts = self.accounts()?;
        if accounts.iter().any(|a| a.email == email) {
            return Err(RegisterError::EmailTaken);
        }
        if accounts.iter().any(|a| a.username == username) {
            return Err(RegisterError::UsernameTaken);
        }

        let account = Account {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: bcrypt::hash(password, BCRYPT_COST)?,
        };
        accounts.push(account.clone());
        self.rewrite(&accounts)?;
        Ok(account)
    }

    /// Look up the account for `email` and verify `password` against its
    /// hash (constant-time compare inside the bcrypt verify).
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let account = self
            .accounts()?
            .into_iter()
            .find(|a| a.email == email)
            .ok_or(AuthError::UnknownEmail)?;

        if bcrypt::verify(password, &account.password_hash)? {
            Ok(account)
        } else {
            Err(AuthError::WrongPassword)
        }
    }

    /// Lines dropped as malformed during the most recent read.
    pub fn skipped_lines(&self) -> usize {
        self.skipped.get()
    }

    fn rewrite(&self, accounts: &[Account]) -> io::Result<()> {
        let mut contents = String::new();
        for account in accounts {
            contents.push_str(
                &[
                    account.username.as_str(),
                    account.email.as_str(),
                    account.password_hash.as_str(),
                ]
                .join(FIELD_SEPARATOR),
            );
            contents.push('\n');
        }
        self.backing.write(&contents)
    }
}
