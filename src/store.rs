use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::ledger::Account;

/**
 * Flat text store: one JSON object per line, append-only except for
 * `rewrite`. The file is opened, fully read or written, and closed per
 * call; there is no lock file or atomic rename, so the store is only
 * safe for a single process.
 */
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    /**
     * A missing file is an empty store, not an error. Content problems
     * (malformed JSON, unknown account type) drop the offending line
     * with a diagnostic and loading continues; only IO errors are fatal.
     */
    pub fn load(&self) -> Result<Vec<Account>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read store {}", self.path.display()))
            }
        };

        let mut accounts = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line =
                line.with_context(|| format!("cannot read store {}", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Account>(&line) {
                Ok(account) => accounts.push(account),
                Err(e) => eprintln!("Warning: skipped store line {}: {}", index + 1, e),
            }
        }
        Ok(accounts)
    }

    pub fn append(&self, account: &Account) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open store {}", self.path.display()))?;
        write_record(&mut file, account)
            .with_context(|| format!("cannot append to store {}", self.path.display()))
    }

    pub fn rewrite(&self, accounts: &[Account]) -> Result<()> {
        let mut file = File::create(&self.path)
            .with_context(|| format!("cannot open store {}", self.path.display()))?;
        for account in accounts {
            write_record(&mut file, account)
                .with_context(|| format!("cannot rewrite store {}", self.path.display()))?;
        }
        Ok(())
    }
}

fn write_record(file: &mut File, account: &Account) -> Result<()> {
    let record = serde_json::to_string(account)?;
    writeln!(file, "{}", record)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AccountKind;
    use tempfile::tempdir;

    fn account(number: &str, balance: f64) -> Account {
        Account {
            number: number.to_string(),
            kind: AccountKind::Business,
            balance,
            password: "Zz19".to_string(),
        }
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("accounts.txt"));

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("accounts.txt"));

        store.append(&account("1", 12.5)).unwrap();
        store.append(&account("2", 0.0)).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![account("1", 12.5), account("2", 0.0)]);
    }

    #[test]
    fn record_uses_camel_case_key_names() {
        let record = serde_json::to_string(&account("7", 3.0)).unwrap();

        assert_eq!(
            record,
            r#"{"accountNumber":"7","accountType":"Business","balance":3.0,"password":"Zz19"}"#
        );
    }

    #[test]
    fn malformed_line_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        let good = serde_json::to_string(&account("1", 5.0)).unwrap();
        std::fs::write(&path, format!("not a record\n{}\n", good)).unwrap();

        let loaded = Store::new(&path).load().unwrap();
        assert_eq!(loaded, vec![account("1", 5.0)]);
    }

    #[test]
    fn unknown_account_type_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        let bad = r#"{"accountNumber":"1","accountType":"Corporate","balance":0.0,"password":"aaaa"}"#;
        std::fs::write(&path, format!("{}\n", bad)).unwrap();

        assert!(Store::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        let good = serde_json::to_string(&account("1", 5.0)).unwrap();
        std::fs::write(&path, format!("\n{}\n\n", good)).unwrap();

        assert_eq!(Store::new(&path).load().unwrap().len(), 1);
    }

    #[test]
    fn rewrite_replaces_previous_contents() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("accounts.txt"));
        store.append(&account("1", 1.0)).unwrap();
        store.append(&account("2", 2.0)).unwrap();

        store.rewrite(&[account("2", 2.0)]).unwrap();

        assert_eq!(store.load().unwrap(), vec![account("2", 2.0)]);
    }
}
