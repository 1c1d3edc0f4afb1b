use process_supervisor::{OutputBuffer, ProcessBuilder, ProcessHandle};

/// Spawns `sleep <secs>` with a capture buffer attached.
#[allow(unused)]
pub fn spawn_sleeper(secs: &str) -> (ProcessHandle, OutputBuffer) {
    let buffer = OutputBuffer::new();
    let handle = ProcessBuilder::new("sleep")
        .with_arg(secs)
        .with_output(buffer.clone())
        .spawn()
        .unwrap();
    (handle, buffer)
}

/// Spawns `sh -c <script>` with a capture buffer attached.
#[allow(unused)]
pub fn spawn_shell(script: &str) -> (ProcessHandle, OutputBuffer) {
    let buffer = OutputBuffer::new();
    let handle = ProcessBuilder::new("sh")
        .with_args(["-c", script])
        .with_output(buffer.clone())
        .spawn()
        .unwrap();
    (handle, buffer)
}
