use anyhow::{Result, bail};

use crate::Params;
use crate::utils::{Session, create_session};

pub async fn list(params: &Params) -> Result<()> {
    create_session(params).await?.print_buttons();
    Ok(())
}

pub async fn switch(params: &Params, index: usize, on: bool) -> Result<()> {
    let session = create_session(params).await?;
    switch_in(&session, index, on).await?;
    session.print_buttons();
    Ok(())
}

pub(crate) async fn switch_in(session: &Session, index: usize, on: bool) -> Result<()> {
    let outcome = if on {
        session.panel.turn_on(index).await
    } else {
        session.panel.turn_off(index).await
    };
    if outcome.is_none() {
        bail!("GPIO {index} could not be turned {}", if on { "on" } else { "off" });
    }
    Ok(())
}

pub async fn boards(params: &Params) -> Result<()> {
    let session = create_session(params).await?;
    for board in session.panel.boards() {
        println!("{} - {} (pins {:?})", board.id, board.name, board.pins);
    }
    Ok(())
}
