use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const PASSWORD_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    Business,
    Personal,
}

impl Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountKind::Business => write!(f, "Business"),
            AccountKind::Personal => write!(f, "Personal"),
        }
    }
}

/**
 * One persisted record per account. The field renames pin the on-disk
 * key names, so the store format does not follow internal renames.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "accountNumber")]
    pub number: String,
    #[serde(rename = "accountType")]
    pub kind: AccountKind,
    pub balance: f64,
    pub password: String,
}

impl Account {
    pub fn open(number: String, kind: AccountKind) -> Self {
        Account {
            number,
            kind,
            balance: 0.0,
            password: generate_password(),
        }
    }

    pub fn deposit(&mut self, amount: f64) -> f64 {
        self.balance += amount;
        self.balance
    }

    pub fn withdraw(&mut self, amount: f64) -> Result<f64, &'static str> {
        if amount > self.balance {
            return Err("withdrawal bigger than available balance");
        }
        self.balance -= amount;
        Ok(self.balance)
    }
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/**
 * Owns the flat in-memory account collection, in load/creation order.
 * Callers address accounts by index; indices stay valid until `remove`.
 */
#[derive(Default)]
pub struct Ledger {
    accounts: Vec<Account>,
}

impl Ledger {
    pub fn new(accounts: Vec<Account>) -> Self {
        Ledger { accounts }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, index: usize) -> &Account {
        &self.accounts[index]
    }

    pub fn account_mut(&mut self, index: usize) -> &mut Account {
        &mut self.accounts[index]
    }

    /**
     * Next free number is one past the highest numeric number ever seen
     * in the collection, never its length: after a deletion the freed
     * number must not be handed out again.
     */
    fn next_number(&self) -> String {
        let highest = self
            .accounts
            .iter()
            .filter_map(|account| account.number.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (highest + 1).to_string()
    }

    pub fn open_account(&mut self, kind: AccountKind) -> &Account {
        let account = Account::open(self.next_number(), kind);
        self.accounts.push(account);
        self.accounts.last().expect("pushed on the previous line")
    }

    pub fn find(&self, number: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a.number == number)
    }

    pub fn authenticate(&self, number: &str, password: &str) -> Option<usize> {
        self.accounts
            .iter()
            .position(|a| a.number == number && a.password == password)
    }

    /**
     * Debit-then-credit within the same collection; rejected as a whole
     * when the source balance is short, so the pair total is conserved.
     * A self-transfer debits and credits the same account and is a no-op.
     */
    pub fn transfer(&mut self, from: usize, to: usize, amount: f64) -> Result<f64, &'static str> {
        if amount > self.accounts[from].balance {
            return Err("transfer bigger than available balance");
        }
        self.accounts[from].balance -= amount;
        self.accounts[to].deposit(amount);
        Ok(self.accounts[from].balance)
    }

    pub fn remove(&mut self, index: usize) -> Account {
        self.accounts.remove(index)
    }
}
