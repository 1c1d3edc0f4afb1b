use std::time::Duration;

use anyhow::Result;
use process_supervisor::{OutputBuffer, ProcessBuilder};
use tokio::time::timeout;

/// Caller-composed deadline: ask nicely, give the process a grace window,
/// then escalate to a kill if it is still around.
#[tokio::main]
async fn main() -> Result<()> {
    let buffer = OutputBuffer::new();
    let handle = ProcessBuilder::new("sh")
        .with_label("stubborn")
        .with_args(["-c", "trap '' INT; exec sleep 30"])
        .with_output(buffer.clone())
        .spawn()?;
    println!("spawned {} (pid {})", handle.label(), handle.pid());

    handle.stop(false).await?;
    let outcome = match timeout(Duration::from_secs(2), handle.wait()).await {
        Ok(outcome) => outcome,
        Err(_) => {
            println!("no exit within 2s, escalating to kill");
            handle.stop(true).await?;
            handle.wait().await
        }
    };

    println!("outcome: {outcome}");
    println!("runtime: {:?}", handle.runtime());
    Ok(())
}
