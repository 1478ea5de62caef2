use std::{io::Write, thread::scope, time::Instant};

use anyhow::Context;
use snowgen::{SnowflakeGenerator, SnowflakeId};
use tracing::{info, instrument};

use crate::config::{Config, DecodeConfig, GenerateConfig};

pub fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    match config {
        Config::Generate(config) => generate(config, out),
        Config::Decode(config) => decode(config, out),
    }
}

#[instrument(level = "debug", skip_all, fields(worker_id = %config.worker_id, threads = config.threads))]
fn generate(config: &GenerateConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let generator =
        SnowflakeGenerator::new(config.worker_id)?.with_clock_tolerance(config.clock_tolerance);

    let start = Instant::now();
    let ids = if config.threads == 1 {
        (0..config.count)
            .map(|_| generator.next_id())
            .collect::<snowgen::Result<Vec<_>>>()?
    } else {
        issue_concurrently(&generator, config.count, config.threads)?
    };
    let elapsed = start.elapsed();

    info!(
        count = ids.len(),
        elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        "issued IDs"
    );

    for id in &ids {
        if config.padded {
            writeln!(out, "{}", id.to_padded_string())?;
        } else {
            writeln!(out, "{id}")?;
        }
    }
    out.flush()?;

    Ok(())
}

/// Spreads `count` calls over `threads` callers sharing `generator`, then
/// returns the IDs in issuance order.
fn issue_concurrently(
    generator: &SnowflakeGenerator,
    count: usize,
    threads: usize,
) -> anyhow::Result<Vec<SnowflakeId>> {
    let per_thread = count / threads;
    let remainder = count % threads;

    let batches = scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let quota = per_thread + usize::from(i < remainder);
                s.spawn(move || {
                    (0..quota)
                        .map(|_| generator.next_id())
                        .collect::<snowgen::Result<Vec<_>>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow::anyhow!("generator thread panicked"))
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    let mut ids = Vec::with_capacity(count);
    for batch in batches {
        ids.extend(batch?);
    }
    ids.sort_unstable();
    Ok(ids)
}

fn decode(config: &DecodeConfig, out: &mut impl Write) -> anyhow::Result<()> {
    for id in &config.ids {
        let unix_ms = id
            .unix_millis(config.epoch)
            .with_context(|| format!("timestamp of {id} overflows with the given epoch"))?;
        writeln!(
            out,
            "{id}\ttimestamp={}\tunix_ms={}\tworker_id={}\tsequence={}",
            id.timestamp(),
            unix_ms,
            id.worker_id(),
            id.sequence()
        )?;
    }
    out.flush()?;
    Ok(())
}
