//! Reader role
//!
//! Drains the queue while contesting the lease. Consumption keeps going
//! while leadership is undetermined so the queue cannot grow unbounded
//! behind a still-live leader.

use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::Result;
use crate::handler::handle_item;
use crate::metrics::standard::{IS_LEADER, ITEMS_CONSUMED, LEASES_ACQUIRED};
use crate::roles::PoolContext;
use crate::QUEUE_KEY;

/// Consume until this process wins the lease.
///
/// Returns `Ok` on acquisition, which tells the scheduler to flip this
/// process into the generator role. An empty-queue poll timeout is not an
/// error and just loops; dispatched handlers are never awaited.
pub async fn run_reader(ctx: &PoolContext) -> Result<()> {
    info!("entering reader role");

    let mut next_check = Instant::now() + ctx.config.acquire_interval;

    loop {
        if Instant::now() >= next_check {
            next_check = Instant::now() + ctx.config.acquire_interval;
            if ctx.lease.try_acquire().await? {
                info!("producer lease acquired");
                LEASES_ACQUIRED.inc();
                IS_LEADER.set(1);
                return Ok(());
            }
            debug!("lease still held elsewhere");
        }

        if let Some(item) = ctx.store.blpop(QUEUE_KEY, ctx.config.poll_timeout).await? {
            ITEMS_CONSUMED.inc();
            tokio::spawn(handle_item(
                ctx.store.clone(),
                ctx.judge.clone(),
                item,
                ctx.config.handler_latency,
            ));
        }
    }
}
