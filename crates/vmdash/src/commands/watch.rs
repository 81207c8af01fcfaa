//! Foreground dashboard: re-render the projected VM table every poll
//! cycle until Ctrl-C.

use std::time::Duration;

use owo_colors::OwoColorize;

use vmdash_core::Monitor;

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::vms::VmRow;

pub async fn handle(
    monitor: &Monitor,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interval = args
        .interval
        .map_or(monitor.config().poll_interval, Duration::from_secs);
    let color = output::should_color(&global.color);

    loop {
        // Catch up after a host sleep: if the cache outlived the poll
        // cadence, force a refresh instead of rendering stale rows.
        if monitor.store().is_stale(interval) {
            let _ = monitor.resume().await;
        }

        let rows = monitor.snapshot();
        let age = monitor
            .store()
            .data_age()
            .map_or(0, |d| d.num_seconds().max(0));
        let header = format!(
            "vmdash — {} VM(s), refreshed {age}s ago (Ctrl-C to quit)",
            rows.len()
        );
        if color {
            println!("{}", header.bold());
        } else {
            println!("{header}");
        }

        let out = output::render_list(&global.output, &rows, |r| VmRow::from(r), |r| r.vm.id.to_string());
        output::print_output(&out, global.quiet);

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            () = tokio::time::sleep(interval) => {}
        }
        println!();
    }

    Ok(())
}
