mod ledger;
mod session;
mod store;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::ledger::Ledger;
use crate::session::Session;
use crate::store::Store;

#[derive(Parser, Debug)]
struct Args {
    /// Path of the flat text account store
    #[clap(default_value = "accounts.txt")]
    store_path: PathBuf,
}

fn main() -> Result<()> {
    let store = Store::new(Args::parse().store_path);
    let ledger = Ledger::new(store.load()?);

    let stdin = io::stdin();
    let mut session = Session::new(ledger, store, stdin.lock(), io::stdout());
    session.run()
}
