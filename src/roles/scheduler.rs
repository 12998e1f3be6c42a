//! Role scheduling
//!
//! Process-local state machine over the two roles, evaluated on a fixed
//! tick. A clean role return flips the state; an error keeps it, so the
//! same role is retried on the next tick.

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::error;

use crate::error::Result;
use crate::roles::{generator::run_generator, reader::run_reader, PoolContext};

/// Which half of the protocol this process is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Sole leased producer
    Generator,
    /// Consumer and lease contender
    Reader,
}

/// Fixed-tick role loop for one process
pub struct RoleScheduler {
    ctx: PoolContext,
    role: Role,
}

impl RoleScheduler {
    /// Every process starts as a reader and races for the lease
    pub fn new(ctx: PoolContext) -> Self {
        Self {
            ctx,
            role: Role::Reader,
        }
    }

    /// Current role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Run one role invocation and apply the transition rule
    pub async fn step(&mut self) {
        let outcome: Result<()> = match self.role {
            Role::Generator => run_generator(&self.ctx).await,
            Role::Reader => run_reader(&self.ctx).await,
        };

        match outcome {
            Ok(()) => {
                self.role = match self.role {
                    Role::Generator => Role::Reader,
                    Role::Reader => Role::Generator,
                };
            }
            Err(e) => {
                error!("{:?} role failed: {}", self.role, e);
            }
        }
    }

    /// Run the loop indefinitely on the configured tick
    pub async fn run(mut self) {
        let period = self.ctx.config.tick_interval;
        let mut tick = interval_at(Instant::now() + period, period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tick.tick().await;
            self.step().await;
        }
    }
}
