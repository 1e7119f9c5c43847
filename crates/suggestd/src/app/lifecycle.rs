//! Daemon lifecycle management (stop, status).

use suggest_config_and_utils::Paths;
use suggest_ipc::{IpcClient, Method};

/// Stop the daemon.
pub async fn stop_daemon(paths: &Paths) -> Result<(), Box<dyn std::error::Error>> {
    let socket_path = paths.socket_file();
    let pid_path = paths.pid_file();

    if !socket_path.exists() {
        println!("Daemon is not running (socket not found)");
        if pid_path.exists() {
            let _ = std::fs::remove_file(&pid_path);
        }
        return Ok(());
    }

    let client = IpcClient::new(&socket_path);

    match client.call_method(Method::Shutdown).await {
        Ok(response) => {
            if response.is_success() {
                println!("Daemon shutdown initiated");
            } else {
                println!("Shutdown failed: {:?}", response.error);
            }
        }
        Err(e) => {
            println!("Failed to connect to daemon: {}", e);
        }
    }

    // The socket disappears once queued suggestions are applied.
    for _ in 0..50 {
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        if !socket_path.exists() {
            println!("Daemon stopped");
            return Ok(());
        }
    }

    if let Some(pid) = read_pid(paths) {
        println!(
            "Daemon did not stop gracefully, sending SIGKILL to PID {}",
            pid
        );
        unsafe {
            libc::kill(pid, libc::SIGKILL);
        }
        let _ = std::fs::remove_file(&socket_path);
        let _ = std::fs::remove_file(&pid_path);
        println!("Daemon killed");
        return Ok(());
    }

    if socket_path.exists() {
        let _ = std::fs::remove_file(&socket_path);
        println!("Cleaned up stale socket file");
    }

    Ok(())
}

/// Check daemon status.
pub async fn check_status(paths: &Paths) -> Result<(), Box<dyn std::error::Error>> {
    let socket_path = paths.socket_file();

    if !socket_path.exists() {
        println!("Daemon is not running (socket not found)");
        return Ok(());
    }

    let client = IpcClient::new(&socket_path);

    match client.call_method(Method::Health).await {
        Ok(response) => match response.into_result() {
            Ok(result) => {
                let field = |name: &str| {
                    result
                        .get(name)
                        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                        .unwrap_or_else(|| "unknown".to_string())
                };

                println!("Daemon is running");
                println!("  Status:      {}", field("status"));
                println!("  Version:     {}", field("version"));
                if let Some(pid) = read_pid(paths) {
                    println!("  PID:         {}", pid);
                }
                println!("  Socket:      {}", socket_path.display());
                println!("  Base dir:    {}", field("base_dir"));
                println!("  Queue depth: {}", field("queue_depth"));
                if let Some(indices) = result.get("indices").and_then(|v| v.as_object()) {
                    println!("  Indices:");
                    for (name, count) in indices {
                        println!("    {:<20} {} suggestions", name, count);
                    }
                }
            }
            Err(e) => println!("Daemon returned error: {}", e),
        },
        Err(e) => {
            println!("Failed to connect to daemon: {}", e);
            println!("Daemon may not be running or socket may be stale");
        }
    }

    Ok(())
}

fn read_pid(paths: &Paths) -> Option<i32> {
    std::fs::read_to_string(paths.pid_file())
        .ok()?
        .trim()
        .parse()
        .ok()
}
