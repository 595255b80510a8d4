// src/services/work_locks.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>;

// Um mutex assíncrono por trabalho voluntário.
// Inscrição, desinscrição, avaliação e feedback do mesmo trabalho rodam em fila.
#[derive(Clone, Default)]
pub struct WorkLocks {
    locks: LockMap,
}

impl WorkLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, work_id: i64) -> WorkLockGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(work_id).or_default().clone()
        };
        let guard = lock.lock_owned().await;

        WorkLockGuard { guard: Some(guard), work_id, locks: self.locks.clone() }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

// Ao soltar, remove a entrada do mapa se ninguém mais espera pelo mesmo trabalho
pub struct WorkLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    work_id: i64,
    locks: LockMap,
}

impl Drop for WorkLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Só o mapa segura o Arc: nenhuma tarefa na fila
        if locks.get(&self.work_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.work_id);
        }
    }
}
