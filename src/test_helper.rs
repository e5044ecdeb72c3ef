use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::pin::PinConfiguration;
use crate::config::store::ConfigurationStore;
use crate::error::GpioControlError;
use crate::protocol::api::HostCommandApi;
use crate::protocol::messages::{BoardDescriptor, CommandAck, CommandParams, HostCommand};
use crate::sync::state::PinState;

struct ScriptedReply {
    delay: Duration,
    states: Result<Vec<PinState>, String>,
}

/// Host whose state replies are queued up front by the test.
#[derive(Default)]
pub struct MockHost {
    replies: Mutex<VecDeque<ScriptedReply>>,
    commands: Mutex<Vec<(HostCommand, CommandParams)>>,
    fail_commands: AtomicBool,
    command_delay: Mutex<Duration>,
    fetches: AtomicUsize,
    boards: Option<Vec<BoardDescriptor>>,
}

impl MockHost {
    pub fn with_boards(boards: Vec<BoardDescriptor>) -> Self {
        Self {
            boards: Some(boards),
            ..Default::default()
        }
    }

    pub fn reply_states(&self, states: Vec<PinState>) {
        self.reply_states_after(states, Duration::ZERO);
    }

    pub fn reply_states_after(&self, states: Vec<PinState>, delay: Duration) {
        self.replies.lock().push_back(ScriptedReply {
            delay,
            states: Ok(states),
        });
    }

    pub fn fail_states(&self, reason: &str) {
        self.replies.lock().push_back(ScriptedReply {
            delay: Duration::ZERO,
            states: Err(reason.to_string()),
        });
    }

    pub fn fail_commands(&self, fail: bool) {
        self.fail_commands.store(fail, Ordering::SeqCst);
    }

    pub fn delay_commands(&self, delay: Duration) {
        *self.command_delay.lock() = delay;
    }

    pub fn commands(&self) -> Vec<(HostCommand, CommandParams)> {
        self.commands.lock().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostCommandApi for MockHost {
    async fn fetch_states(&self) -> Result<Vec<PinState>, GpioControlError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().pop_front();
        let Some(reply) = reply else {
            return Err(GpioControlError::Transport("no scripted reply".to_string()));
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.states.map_err(GpioControlError::Transport)
    }

    async fn send_command(
        &self,
        command: HostCommand,
        params: CommandParams,
    ) -> Result<CommandAck, GpioControlError> {
        let delay = *self.command_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_commands.load(Ordering::SeqCst) {
            return Err(GpioControlError::Transport("command rejected".to_string()));
        }
        self.commands.lock().push((command, params));
        Ok(CommandAck::default())
    }

    async fn fetch_boards(&self) -> Result<Vec<BoardDescriptor>, GpioControlError> {
        self.boards
            .clone()
            .ok_or_else(|| GpioControlError::Transport("boards unavailable".to_string()))
    }
}

pub fn fan_and_light() -> ConfigurationStore {
    ConfigurationStore::with_configurations(vec![
        PinConfiguration::new(17, "Fan"),
        PinConfiguration::new(27, "Light"),
    ])
}
