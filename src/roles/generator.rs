//! Generator role
//!
//! The leased producer. Emits a strictly increasing sequence onto the queue
//! as fast as the store round-trip allows; every push is guarded by the
//! lease value, so a demoted leader cannot keep producing after a takeover.
//! Lease renewal is a separate, unconditional liveness tick.

use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::Result;
use crate::metrics::standard::{IS_LEADER, ITEMS_PRODUCED};
use crate::roles::PoolContext;
use crate::store::PushOutcome;
use crate::{LEASE_KEY, QUEUE_KEY};

/// Produce until the lease is observed under another identity.
///
/// The sequence starts at 1 and never resets within one invocation. A
/// contested push is the normal way out and returns `Ok`; a store failure
/// is a hard error surfaced to the scheduler.
pub async fn run_generator(ctx: &PoolContext) -> Result<()> {
    info!("entering generator role");

    let mut seq: u64 = 0;
    let mut next_renew = Instant::now() + ctx.config.renew_interval;

    loop {
        if Instant::now() >= next_renew {
            ctx.lease.renew().await?;
            next_renew = Instant::now() + ctx.config.renew_interval;
            debug!("lease renewed");
        }

        let item = (seq + 1).to_string();
        match ctx
            .store
            .guarded_rpush(LEASE_KEY, &ctx.identity, QUEUE_KEY, &item)
            .await?
        {
            PushOutcome::Pushed => {
                seq += 1;
                ITEMS_PRODUCED.inc();
            }
            PushOutcome::Contested => {
                info!("lease now held by another process, stepping down");
                IS_LEADER.set(0);
                return Ok(());
            }
        }
    }
}
