use anyhow::Result;
use process_supervisor::run;

#[tokio::main]
async fn main() -> Result<()> {
    let result = run(".", "echo", ["hello", "from", "a", "supervised", "process"]).await?;
    println!("succeeded: {}", result.succeeded);
    print!("{}", result.output);
    Ok(())
}
