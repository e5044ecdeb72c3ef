use anyhow::{Context, Result};
use gpio_control_rs::{ActiveMode, DefaultState};

use crate::Params;
use crate::utils::create_session;

pub async fn add(
    params: &Params,
    pin: u32,
    name: String,
    icon: String,
    active_low: bool,
    default_on: bool,
) -> Result<()> {
    let session = create_session(params).await?;
    session.panel.on_settings_shown().await;
    let id = session.panel.add_configuration();
    session.panel.store().update(id, |c| {
        c.pin = pin;
        c.name = name;
        c.icon = icon;
        if active_low {
            c.active_mode = ActiveMode::ActiveLow;
        }
        if default_on {
            c.default_state = DefaultState::DefaultOn;
        }
    })?;
    let duplicates = session.panel.store().duplicate_pins();
    if duplicates.contains(&pin) {
        println!("Warning: pin {pin} is configured more than once");
    }
    session.commit().await?;
    session.print_buttons();
    Ok(())
}

pub async fn remove(params: &Params, index: usize) -> Result<()> {
    let session = create_session(params).await?;
    session.panel.on_settings_shown().await;
    let configuration = session
        .panel
        .store()
        .get(index)
        .with_context(|| format!("no GPIO configured at position {index}"))?;
    session.panel.remove_configuration(configuration.id);
    session.commit().await?;
    session.print_buttons();
    Ok(())
}
