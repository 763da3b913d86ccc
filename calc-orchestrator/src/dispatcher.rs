//! gRPC agent protocol (§6.2): `GetTasks` server-streams ready Tasks as
//! they become available, `SendResult` feeds a posted result back into
//! the Task Registry. Same 100ms poll-and-stream shape as the teacher's
//! `BpmnLiteService::subscribe_events`, applied here to the ready queue
//! instead of an event log.

use calc_core::registry::TaskRegistry;
use calc_proto::proto::orchestrator_server::Orchestrator;
use calc_proto::proto::{Empty, SolvedTask as ProtoSolvedTask, Task as ProtoTask};
use tonic::{Request, Response, Status};

pub struct DispatcherService {
    pub registry: TaskRegistry,
}

fn to_proto(t: calc_core::types::Task) -> ProtoTask {
    ProtoTask {
        id: t.id,
        arg1: t.arg1,
        arg2: t.arg2,
        operation: t.operator.as_char().to_string(),
        operation_time_ms: t.delay_ms,
    }
}

#[tonic::async_trait]
impl Orchestrator for DispatcherService {
    type GetTasksStream = tokio_stream::wrappers::ReceiverStream<Result<ProtoTask, Status>>;

    async fn get_tasks(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<Self::GetTasksStream>, Status> {
        let (tx, rx) = tokio::sync::mpsc::channel(16);
        let registry = self.registry.clone();

        tokio::spawn(async move {
            loop {
                match registry.take_one().await {
                    Some(task) => {
                        let proto = to_proto(task.clone());
                        if tx.send(Ok(proto)).await.is_err() {
                            registry.put_back(task).await;
                            return;
                        }
                    }
                    None => tokio::time::sleep(std::time::Duration::from_millis(100)).await,
                }
            }
        });

        Ok(Response::new(tokio_stream::wrappers::ReceiverStream::new(
            rx,
        )))
    }

    async fn send_result(
        &self,
        request: Request<ProtoSolvedTask>,
    ) -> Result<Response<Empty>, Status> {
        let req = request.into_inner();
        self.registry.resolve(&req.id, req.result).await;
        Ok(Response::new(Empty {}))
    }
}
