use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::pins::switch_in;
use crate::Params;
use crate::utils::create_session;

pub async fn shell(params: &Params) -> Result<()> {
    let session = create_session(params).await?;
    println!("Commands: list, on <n>, off <n>, refresh, quit");
    session.print_buttons();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        match (words.next(), words.next().map(str::parse::<usize>)) {
            (Some("quit" | "q"), _) => break,
            (Some("list" | "l"), _) => session.print_buttons(),
            (Some("refresh" | "r"), _) => {
                println!("Refresh: {:?}", session.panel.synchronizer().refresh().await);
                session.print_buttons();
            }
            (Some(cmd @ ("on" | "off")), Some(Ok(index))) => {
                match switch_in(&session, index, cmd == "on").await {
                    Ok(()) => session.print_buttons(),
                    Err(e) => println!("{e}"),
                }
            }
            (None, _) => {}
            _ => println!("Unknown command: {line}"),
        }
    }
    Ok(())
}
