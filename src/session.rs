use std::io::{BufRead, Write};

use anyhow::Result;

use crate::ledger::{AccountKind, Ledger};
use crate::store::Store;

/**
 * Interactive menu loop, generic over its input and output streams so
 * the flows can be driven from in-memory buffers in tests.
 *
 * Every operator mistake (bad menu choice, bad credentials, bad amount,
 * insufficient funds) is reported as text and the loop continues; the
 * only errors that escape `run` are store IO failures.
 */
pub struct Session<R, W> {
    ledger: Ledger,
    store: Store,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(ledger: Ledger, store: Store, input: R, output: W) -> Self {
        Session {
            ledger,
            store,
            input,
            output,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\nBanking System")?;
            writeln!(self.output, "1. Open Account")?;
            writeln!(self.output, "2. Login")?;
            writeln!(self.output, "3. Exit")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => self.create_account()?,
                "2" => {
                    if let Some(index) = self.login()? {
                        self.account_menu(index)?;
                    }
                }
                "3" => break,
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }
        Ok(())
    }

    /**
     * An invalid type choice reports and falls back to the top menu
     * rather than re-prompting in place.
     */
    fn create_account(&mut self) -> Result<()> {
        writeln!(self.output, "Enter account type: 1 for Business, 2 for Personal")?;
        let Some(choice) = self.prompt("")? else {
            return Ok(());
        };
        let kind = match choice.as_str() {
            "1" => AccountKind::Business,
            "2" => AccountKind::Personal,
            _ => {
                writeln!(
                    self.output,
                    "Invalid account type. Please enter '1' for Business or '2' for Personal."
                )?;
                return Ok(());
            }
        };
        let account = self.ledger.open_account(kind);
        self.store.append(account)?;
        writeln!(
            self.output,
            "Account created. Your account number is {} and password is {}.",
            account.number, account.password
        )?;
        Ok(())
    }

    fn login(&mut self) -> Result<Option<usize>> {
        let Some(number) = self.prompt("Enter your account number: ")? else {
            return Ok(None);
        };
        let Some(password) = self.prompt("Enter your password: ")? else {
            return Ok(None);
        };
        let index = self.ledger.authenticate(&number, &password);
        if index.is_none() {
            writeln!(self.output, "Invalid account number or password.")?;
        }
        Ok(index)
    }

    fn account_menu(&mut self, index: usize) -> Result<()> {
        loop {
            writeln!(self.output, "\n1. Deposit")?;
            writeln!(self.output, "2. Withdraw")?;
            writeln!(self.output, "3. Check Balance")?;
            writeln!(self.output, "4. Transfer")?;
            writeln!(self.output, "5. Delete Account")?;
            writeln!(self.output, "6. Logout")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => {
                    if let Some(amount) = self.prompt_amount("Enter amount to deposit: ")? {
                        let balance = self.ledger.account_mut(index).deposit(amount);
                        writeln!(
                            self.output,
                            "Deposited {}. New balance is {}.",
                            amount, balance
                        )?;
                        self.store.rewrite(self.ledger.accounts())?;
                    }
                }
                "2" => {
                    if let Some(amount) = self.prompt_amount("Enter amount to withdraw: ")? {
                        match self.ledger.account_mut(index).withdraw(amount) {
                            Ok(balance) => {
                                writeln!(
                                    self.output,
                                    "Withdrew {}. New balance is {}.",
                                    amount, balance
                                )?;
                                self.store.rewrite(self.ledger.accounts())?;
                            }
                            Err(_) => writeln!(self.output, "Insufficient funds.")?,
                        }
                    }
                }
                "3" => {
                    writeln!(
                        self.output,
                        "Account Balance: {}",
                        self.ledger.account(index).balance
                    )?;
                }
                "4" => self.transfer(index)?,
                "5" => {
                    // Drops to the top menu after the delete prompt
                    // whether or not it was confirmed.
                    self.delete_account(index)?;
                    return Ok(());
                }
                "6" => return Ok(()),
                _ => writeln!(self.output, "Invalid option.")?,
            }
        }
    }

    fn transfer(&mut self, index: usize) -> Result<()> {
        let Some(target_number) = self.prompt("Enter target account number: ")? else {
            return Ok(());
        };
        let Some(target) = self.ledger.find(&target_number) else {
            writeln!(self.output, "Target account not found.")?;
            return Ok(());
        };
        let Some(amount) = self.prompt_amount("Enter amount to transfer: ")? else {
            return Ok(());
        };
        match self.ledger.transfer(index, target, amount) {
            Ok(balance) => {
                writeln!(
                    self.output,
                    "Transferred {} to Account {}. New balance is {}.",
                    amount, target_number, balance
                )?;
                self.store.rewrite(self.ledger.accounts())?;
            }
            Err(_) => writeln!(self.output, "Insufficient funds for transfer.")?,
        }
        Ok(())
    }

    /**
     * Only an explicit `y` deletes; any other answer leaves the account
     * untouched with no message.
     */
    fn delete_account(&mut self, index: usize) -> Result<()> {
        let number = self.ledger.account(index).number.clone();
        let question = format!("Are you sure you want to delete account {}? (y/n): ", number);
        let Some(confirmation) = self.prompt(&question)? else {
            return Ok(());
        };
        if confirmation.eq_ignore_ascii_case("y") {
            self.ledger.remove(index);
            self.store.rewrite(self.ledger.accounts())?;
            writeln!(self.output, "Account {} has been deleted.", number)?;
        }
        Ok(())
    }

    /**
     * None means end of input; the caller unwinds to the top menu and
     * the session ends as if the operator chose Exit.
     */
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_amount(&mut self, text: &str) -> Result<Option<f64>> {
        let Some(raw) = self.prompt(text)? else {
            return Ok(None);
        };
        match raw.parse::<f64>() {
            Ok(amount) => Ok(Some(amount)),
            Err(_) => {
                writeln!(self.output, "Invalid amount.")?;
                Ok(None)
            }
        }
    }
}
