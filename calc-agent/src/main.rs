//! calc-agent — connects to the orchestrator's gRPC dispatcher (§6.2),
//! streams ready Tasks, and computes each one under a bounded pool of
//! concurrent workers. Grounded on the original `internal/agent/agent.go`:
//! same dial-stream-semaphore-spawn shape, reexpressed as a Tokio stream
//! consumer instead of a goroutine-per-task loop over a buffered channel.
//!
//! Config from env vars:
//!   ORCH_ADDR       — orchestrator gRPC address (default: http://localhost:50051)
//!   COMPUTING_POWER — max concurrent in-flight tasks (default: 10)

use std::sync::Arc;
use std::time::Duration;

use calc_proto::proto::orchestrator_client::OrchestratorClient;
use calc_proto::proto::{Empty, SolvedTask, Task};
use tokio::sync::Semaphore;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

fn getenv(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn compute(task: &Task) -> f64 {
    match task.operation.as_str() {
        "+" => task.arg1 + task.arg2,
        "-" => task.arg1 - task.arg2,
        "*" => task.arg1 * task.arg2,
        "/" => task.arg1 / task.arg2,
        other => {
            tracing::error!(operation = other, "unknown operation, returning NaN");
            f64::NAN
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let addr = getenv("ORCH_ADDR", "http://localhost:50051");
    let computing_power: usize = getenv("COMPUTING_POWER", "10").parse().unwrap_or(10);

    let mut client = OrchestratorClient::connect(addr.clone()).await?;
    tracing::info!(%addr, "connected to orchestrator");

    let mut stream = client.get_tasks(Empty {}).await?.into_inner();
    let semaphore = Arc::new(Semaphore::new(computing_power));

    loop {
        let task = match stream.next().await {
            Some(Ok(task)) => task,
            Some(Err(status)) => {
                tracing::error!(%status, "stream error, reconnecting");
                tokio::time::sleep(Duration::from_secs(1)).await;
                let mut reconnected = OrchestratorClient::connect(addr.clone()).await?;
                stream = reconnected.get_tasks(Empty {}).await?.into_inner();
                client = reconnected;
                continue;
            }
            None => {
                tracing::warn!("task stream closed, reconnecting");
                tokio::time::sleep(Duration::from_secs(1)).await;
                let mut reconnected = OrchestratorClient::connect(addr.clone()).await?;
                stream = reconnected.get_tasks(Empty {}).await?.into_inner();
                client = reconnected;
                continue;
            }
        };

        let permit = semaphore.clone().acquire_owned().await?;
        let mut client = client.clone();
        tokio::spawn(async move {
            let _permit = permit;
            tokio::time::sleep(Duration::from_millis(task.operation_time_ms)).await;
            let result = compute(&task);
            if let Err(status) = client
                .send_result(SolvedTask {
                    id: task.id.clone(),
                    result,
                })
                .await
            {
                tracing::error!(task_id = %task.id, %status, "send_result failed");
            }
        });
    }
}
