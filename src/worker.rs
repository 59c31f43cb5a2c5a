//! 后台任务
//!
//! 探测与包管理命令各自在一次性线程中阻塞执行，在线查询走有上限的
//! tokio 任务池。所有结果都以 `AppEvent` 投递回 UI 循环。

use crate::controller::ProbeTicket;
use crate::pip::{CommandOutcome, PipOperation, PipRunner};
use crate::probe::{self, ProbeResult};
use crate::pypi::PypiClient;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

#[derive(Debug)]
pub enum AppEvent {
    ProbeFinished {
        generation: u64,
        result: ProbeResult,
    },
    CommandFinished {
        operation: PipOperation,
        outcome: CommandOutcome,
    },
    DetailLoaded {
        seq: u64,
        name: String,
        text: String,
    },
}

/// 启动探测线程
pub fn spawn_probe(tx: &mpsc::Sender<AppEvent>, ticket: ProbeTicket) -> std::thread::JoinHandle<()> {
    let tx = tx.clone();
    std::thread::spawn(move || {
        let result = probe::probe(&ticket.interpreter);
        if let Err(e) = &result {
            log::warn!("探测失败 ({}): {}", ticket.interpreter.display(), e);
        }
        let _ = tx.blocking_send(AppEvent::ProbeFinished {
            generation: ticket.generation,
            result,
        });
    })
}

/// 启动包管理命令线程
pub fn spawn_command(
    tx: &mpsc::Sender<AppEvent>,
    runner: PipRunner,
    operation: PipOperation,
) -> std::thread::JoinHandle<()> {
    let tx = tx.clone();
    std::thread::spawn(move || {
        let outcome = runner.execute(&operation);
        let _ = tx.blocking_send(AppEvent::CommandFinished { operation, outcome });
    })
}

/// 在线简介查询池，同时进行的请求数受 `Semaphore` 限制
#[derive(Clone)]
pub struct LookupPool {
    client: PypiClient,
    permits: Arc<Semaphore>,
}

impl LookupPool {
    pub fn new(client: PypiClient, workers: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    pub fn spawn(&self, tx: &mpsc::Sender<AppEvent>, name: String, seq: u64) -> tokio::task::JoinHandle<()> {
        let tx = tx.clone();
        let client = self.client.clone();
        let permits = Arc::clone(&self.permits);
        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let text = client.describe(&name).await;
            let _ = tx.send(AppEvent::DetailLoaded { seq, name, text }).await;
        })
    }
}
