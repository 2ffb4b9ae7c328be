//! Interactive console client.
//!
//! Reads commands from stdin, one per line:
//!
//! ```text
//! connect <address> <port> <name>
//! set <x> <y>
//! ```
//!
//! and prints what the server reports. Exits when the connection drops
//! or stdin closes.

mod command;

use std::sync::Arc;

use gridwire::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;

fn print_events(events: &mut ClientEvents, done: Arc<Notify>) {
    events.connected.subscribe(|_| println!("connected"));
    events.connect_failed.subscribe(|f| {
        println!("connect to {} failed: {}", f.addr, f.reason);
    });
    events.logged_in.subscribe(|_| println!("logged in"));
    events.game_started.subscribe(|g| {
        println!("game started\nsymbol: {}\nmap: {}x{}", g.symbol, g.width, g.height);
    });
    events.field_set.subscribe(|f| println!("[{}][{}]={}", f.x, f.y, f.field));
    events.game_ended.subscribe(|e| println!("game ended; result: {}", e.result));
    events.disconnected.subscribe(move |_| {
        println!("disconnected");
        done.notify_one();
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), GridwireError> {
    init_logging()?;

    let done = Arc::new(Notify::new());
    let mut client = Client::new(ClientConfig::default());
    print_events(client.events(), Arc::clone(&done));
    let (handle, task) = client.spawn();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = done.notified() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some(command) = command::parse(&line) {
                        handle.send(command).await?;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            },
        }
    }

    handle.close().await?;
    drop(handle);
    if let Err(e) = task.await {
        tracing::warn!(error = %e, "client task failed");
    }
    Ok(())
}
